//! 根据 `compare` 与 `genome-stats` 的输出表绘图：
//! 每个比较对一张叠加长度直方图，外加一张基因组大小对中位基因长度的散点图。

pub mod chart;

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::stats::summarize;

/// 长度列的首选列名
pub const LENGTH_COLUMN: &str = "length_bp";

/// 散点图文件名
pub const SCATTER_FILE: &str = "genome_size_vs_median_gene_length.svg";

/// `plot` 子命令参数
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlotOpt {
    pub results_dir: PathBuf,
    pub stats: PathBuf,
    pub outdir: PathBuf,
    pub bins: usize,
    /// 为空时从 `results_dir` 中的 `*.stats.txt` 推断
    pub pairs: Vec<PlotPair>,
}

impl Default for PlotOpt {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("results"),
            stats: PathBuf::from("genome_stats.tsv"),
            outdir: PathBuf::from("figures"),
            bins: 60,
            pairs: Vec::new(),
        }
    }
}

/// 一次 `compare` 运行：输出前缀与两个标签
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlotPair {
    pub prefix: String,
    pub label1: String,
    pub label2: String,
}

impl PlotPair {
    pub fn lengths_path(&self, dir: &Path, label: &str) -> PathBuf {
        dir.join(format!("{}.{}.lengths.tsv", self.prefix, label))
    }
}

/// `PREFIX:LABEL1:LABEL2`
impl FromStr for PlotPair {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [prefix, label1, label2] if !prefix.is_empty() && !label1.is_empty() && !label2.is_empty() => {
                Ok(PlotPair {
                    prefix: prefix.to_string(),
                    label1: label1.to_string(),
                    label2: label2.to_string(),
                })
            }
            _ => Err(format!("expected PREFIX:LABEL1:LABEL2, got '{}'", s)),
        }
    }
}

fn report_label(line: &str, idx: usize) -> Option<String> {
    let rest = line.strip_prefix(&format!("Genome {} (", idx))?;
    let (label, _) = rest.rsplit_once("): n=")?;
    Some(label.to_string())
}

/// 从 `<prefix>.stats.txt` 的 `Genome 1 (...)` / `Genome 2 (...)` 行取回两个标签
pub fn labels_from_report(text: &str) -> Option<(String, String)> {
    let label1 = text.lines().find_map(|l| report_label(l, 1))?;
    let label2 = text.lines().find_map(|l| report_label(l, 2))?;
    Some((label1, label2))
}

/// 扫描目录中的 `*.stats.txt`，按前缀排序返回比较对
pub fn discover_pairs(results_dir: &Path) -> Result<Vec<PlotPair>> {
    let entries = fs::read_dir(results_dir)
        .with_context(|| format!("cannot list '{}'", results_dir.display()))?;
    let mut pairs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let prefix = match path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(".stats.txt"))
        {
            Some(p) => p.to_string(),
            None => continue,
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("cannot read '{}'", path.display()))?;
        match labels_from_report(&text) {
            Some((label1, label2)) => pairs.push(PlotPair {
                prefix,
                label1,
                label2,
            }),
            None => log::warn!("{}: no genome labels found; skipped", path.display()),
        }
    }
    pairs.sort_by(|a, b| a.prefix.cmp(&b.prefix));
    Ok(pairs)
}

fn tsv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().delimiter(b'\t').from_reader(reader)
}

fn length_column(headers: &csv::StringRecord) -> Option<usize> {
    headers.iter().position(|h| h == LENGTH_COLUMN).or_else(|| {
        headers
            .iter()
            .position(|h| h.to_lowercase().contains("length"))
    })
}

/// 读取 `length_bp` 列（缺失时退回第一个列名含 "length" 的列），跳过空值
pub fn load_lengths<R: Read>(reader: R) -> Result<Vec<f64>> {
    let mut rdr = tsv_reader(reader);
    let col = length_column(rdr.headers()?)
        .with_context(|| format!("no '{}' column", LENGTH_COLUMN))?;
    let mut lengths = Vec::new();
    for (i, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let field = rec.get(col).unwrap_or("").trim();
        if field.is_empty() || field.eq_ignore_ascii_case("nan") {
            continue;
        }
        let v: f64 = field
            .parse()
            .with_context(|| format!("row {}: '{}' is not a length", i + 2, field))?;
        lengths.push(v);
    }
    Ok(lengths)
}

pub fn read_lengths(path: &Path) -> Result<Vec<f64>> {
    let fh = fs::File::open(path).with_context(|| format!("cannot open '{}'", path.display()))?;
    load_lengths(fh).with_context(|| format!("cannot read lengths from '{}'", path.display()))
}

/// `genome_stats.tsv` 中散点图用到的两列
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenomeSize {
    pub label: String,
    pub genome_size_bp: u64,
}

pub fn load_genome_sizes<R: Read>(reader: R) -> Result<Vec<GenomeSize>> {
    let mut rdr = tsv_reader(reader);
    let headers = rdr.headers()?;
    if !["label", "genome_size_bp"]
        .iter()
        .all(|c| headers.iter().any(|h| h == *c))
    {
        anyhow::bail!("genome stats table must contain columns: label, genome_size_bp");
    }
    let rows = rdr.deserialize().collect::<std::result::Result<Vec<GenomeSize>, _>>()?;
    Ok(rows)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub label: String,
    pub genome_size_bp: u64,
    pub median_length: f64,
}

/// 按标签内连接基因组大小与中位长度，保持统计表的行顺序
pub fn join_medians(sizes: &[GenomeSize], medians: &HashMap<String, f64>) -> Vec<ScatterPoint> {
    sizes
        .iter()
        .filter_map(|s| {
            medians.get(&s.label).map(|&m| ScatterPoint {
                label: s.label.clone(),
                genome_size_bp: s.genome_size_bp,
                median_length: m,
            })
        })
        .collect()
}

/// 绘制全部图像，返回写出的文件路径
pub fn run_plot(opt: &PlotOpt) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&opt.outdir)
        .with_context(|| format!("cannot create directory '{}'", opt.outdir.display()))?;

    let pairs = if opt.pairs.is_empty() {
        discover_pairs(&opt.results_dir)?
    } else {
        opt.pairs.clone()
    };
    if pairs.is_empty() {
        log::warn!("no comparisons found in '{}'", opt.results_dir.display());
    }

    let mut written = Vec::new();
    let mut medians: HashMap<String, f64> = HashMap::new();
    for pair in &pairs {
        let f1 = pair.lengths_path(&opt.results_dir, &pair.label1);
        let f2 = pair.lengths_path(&opt.results_dir, &pair.label2);
        if !f1.exists() || !f2.exists() {
            log::warn!("missing lengths file(s) for pair {}; histogram skipped", pair.prefix);
            continue;
        }
        let len1 = read_lengths(&f1)?;
        let len2 = read_lengths(&f2)?;
        if len1.is_empty() && len2.is_empty() {
            log::warn!("pair {} has no lengths; histogram skipped", pair.prefix);
            continue;
        }

        let out = opt.outdir.join(format!("{}.hist.svg", pair.prefix));
        chart::pair_histogram(
            &out,
            [(pair.label1.as_str(), len1.as_slice()), (pair.label2.as_str(), len2.as_slice())],
            opt.bins,
        )?;
        log::info!("{}: {} vs {} lengths", out.display(), len1.len(), len2.len());
        written.push(out);

        for (label, lengths) in [(&pair.label1, &len1), (&pair.label2, &len2)] {
            let median = summarize(lengths).median;
            if !median.is_nan() {
                medians.insert(label.clone(), median);
            }
        }
    }

    if opt.stats.exists() {
        let fh = fs::File::open(&opt.stats)
            .with_context(|| format!("cannot open '{}'", opt.stats.display()))?;
        let sizes = load_genome_sizes(fh)
            .with_context(|| format!("cannot read '{}'", opt.stats.display()))?;
        let points = join_medians(&sizes, &medians);
        if points.is_empty() {
            anyhow::bail!("no overlap between genome stats labels and computed medians");
        }
        let out = opt.outdir.join(SCATTER_FILE);
        chart::size_vs_median(&out, &points)?;
        written.push(out);
    } else {
        log::warn!(
            "stats file not found: {}; genome size scatter skipped",
            opt.stats.display()
        );
    }

    Ok(written)
}
