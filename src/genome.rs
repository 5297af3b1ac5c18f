//! 基因组大小与 GC 含量汇总。

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::io::fasta::{read_fasta, FastaRecord};
use crate::report;
use crate::util::seq::gc_fraction;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenomeStats {
    pub label: String,
    pub path: String,
    pub genome_size_bp: u64,
    pub gc_content_pct: f64,
}

/// 所有记录的残基总数与合并 GC 百分比
pub fn genome_stats(label: &str, path: &str, records: &[FastaRecord]) -> GenomeStats {
    let size: usize = records.iter().map(|r| r.seq.len()).sum();
    GenomeStats {
        label: label.to_string(),
        path: path.to_string(),
        genome_size_bp: size as u64,
        gc_content_pct: gc_fraction(records.iter().map(|r| r.seq.as_slice())) * 100.0,
    }
}

/// `genome-stats` 子命令参数
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenomeStatsOpt {
    pub files: Vec<PathBuf>,
    pub labels: Option<Vec<String>>,
    pub tsv: PathBuf,
    pub md: PathBuf,
}

impl Default for GenomeStatsOpt {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            labels: None,
            tsv: PathBuf::from("genome_stats.tsv"),
            md: PathBuf::from("genome_stats.md"),
        }
    }
}

fn default_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 逐个读取 FASTA 并汇总；读取失败或无序列的文件记录日志后跳过。
/// 返回 Markdown 表格文本。
pub fn run_genome_stats(opt: &GenomeStatsOpt) -> Result<String> {
    if let Some(labels) = &opt.labels {
        if labels.len() != opt.files.len() {
            anyhow::bail!(
                "--labels must have the same length as the FASTA file list ({} vs {})",
                labels.len(),
                opt.files.len()
            );
        }
    }

    let mut rows = Vec::with_capacity(opt.files.len());
    for (i, path) in opt.files.iter().enumerate() {
        let label = match &opt.labels {
            Some(l) => l[i].clone(),
            None => default_label(path),
        };
        let records = match read_fasta(path) {
            Ok(r) => r,
            Err(e) => {
                log::error!("{:#}", e);
                continue;
            }
        };
        if records.iter().all(|r| r.seq.is_empty()) {
            log::error!("no sequence data in '{}'", path.display());
            continue;
        }
        let stats = genome_stats(&label, &path.display().to_string(), &records);
        log::info!(
            "{}: {} records, {} bp, GC {:.2}%",
            label,
            records.len(),
            stats.genome_size_bp,
            stats.gc_content_pct
        );
        rows.push(stats);
    }

    if rows.is_empty() {
        anyhow::bail!("no valid FASTA inputs parsed; nothing to write");
    }

    report::tables::write_genome_tsv(report::create_output(&opt.tsv)?, &rows)
        .with_context(|| format!("cannot write '{}'", opt.tsv.display()))?;
    let md = report::tables::genome_markdown(&rows);
    let mut out = report::create_output(&opt.md)?;
    writeln!(out, "{}", md)
        .and_then(|()| out.flush())
        .with_context(|| format!("cannot write '{}'", opt.md.display()))?;
    Ok(md)
}
