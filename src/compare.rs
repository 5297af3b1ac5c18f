//! 两个基因组之间的基因/CDS 长度比较。

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::io::gff::{id_key_priority, read_gff_lengths, FeatureKind, FeatureLengths};
use crate::report;
use crate::stats::{mann_whitney_u, summarize, wilcoxon_signed_rank, Summary, TestResult};

/// `compare` 子命令参数
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompareOpt {
    pub gff1: PathBuf,
    pub gff2: PathBuf,
    pub label1: String,
    pub label2: String,
    pub feature: FeatureKind,
    pub pair_key: String,
    pub out_prefix: String,
}

impl Default for CompareOpt {
    fn default() -> Self {
        Self {
            gff1: PathBuf::new(),
            gff2: PathBuf::new(),
            label1: "genome1".to_string(),
            label2: "genome2".to_string(),
            feature: FeatureKind::Cds,
            pair_key: "locus_tag".to_string(),
            out_prefix: "comparison".to_string(),
        }
    }
}

/// 基于共享 ID 的配对检验
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairedTest {
    pub shared_ids: usize,
    pub result: TestResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LengthComparison {
    pub feature: FeatureKind,
    pub summary1: Summary,
    pub summary2: Summary,
    /// 任一基因组没有该类特征时为 None
    pub unpaired: Option<TestResult>,
    /// 没有共享 ID 时为 None
    pub paired: Option<PairedTest>,
}

/// 共享 ID 按字典序排列后的配对长度
pub fn shared_lengths(g1: &FeatureLengths, g2: &FeatureLengths) -> (Vec<f64>, Vec<f64>) {
    let mut ids: Vec<&String> = g1.by_id.keys().filter(|k| g2.by_id.contains_key(*k)).collect();
    ids.sort();
    ids.iter()
        .map(|id| (g1.by_id[*id] as f64, g2.by_id[*id] as f64))
        .unzip()
}

pub fn compare_lengths(g1: &FeatureLengths, g2: &FeatureLengths, feature: FeatureKind) -> LengthComparison {
    let x = g1.as_f64();
    let y = g2.as_f64();

    let unpaired = match mann_whitney_u(&x, &y) {
        Ok(t) => Some(t),
        Err(e) => {
            log::warn!("unpaired comparison skipped: {}", e);
            None
        }
    };

    let (p1, p2) = shared_lengths(g1, g2);
    let paired = if p1.is_empty() {
        None
    } else {
        // 两侧等长，由 shared_lengths 保证
        wilcoxon_signed_rank(&p1, &p2).ok().map(|result| PairedTest {
            shared_ids: p1.len(),
            result,
        })
    };

    LengthComparison {
        feature,
        summary1: summarize(&x),
        summary2: summarize(&y),
        unpaired,
        paired,
    }
}

/// 读取两份 GFF3、执行检验并写出长度表与统计报告；返回写出的文件路径
pub fn run_compare(opt: &CompareOpt) -> Result<(LengthComparison, Vec<PathBuf>)> {
    let keys = id_key_priority(Some(&opt.pair_key));
    let g1 = read_gff_lengths(&opt.gff1, opt.feature, &keys)
        .with_context(|| format!("cannot read GFF3 '{}'", opt.gff1.display()))?;
    let g2 = read_gff_lengths(&opt.gff2, opt.feature, &keys)
        .with_context(|| format!("cannot read GFF3 '{}'", opt.gff2.display()))?;

    let mut written = Vec::new();
    for (label, g) in [(&opt.label1, &g1), (&opt.label2, &g2)] {
        let path = PathBuf::from(format!("{}.{}.lengths.tsv", opt.out_prefix, label));
        report::tables::write_lengths_tsv(report::create_output(&path)?, &g.lengths)
            .with_context(|| format!("cannot write '{}'", path.display()))?;
        written.push(path);
    }

    let cmp = compare_lengths(&g1, &g2, opt.feature);
    match &cmp.paired {
        Some(pt) => log::info!("paired {} shared IDs", pt.shared_ids),
        None => log::info!("no shared IDs between the two annotations"),
    }

    let stats_path = PathBuf::from(format!("{}.stats.txt", opt.out_prefix));
    let text = report::text::render_comparison(&cmp, &opt.label1, &opt.label2);
    let mut out = report::create_output(&stats_path)?;
    out.write_all(text.as_bytes())
        .and_then(|()| out.flush())
        .with_context(|| format!("cannot write '{}'", stats_path.display()))?;
    written.push(stats_path);

    Ok((cmp, written))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lengths(rows: &[(&str, u64)]) -> FeatureLengths {
        let mut by_id = HashMap::new();
        for (id, l) in rows {
            by_id.insert(id.to_string(), *l);
        }
        FeatureLengths {
            lengths: rows.iter().map(|r| r.1).collect(),
            by_id,
            skipped: 0,
        }
    }

    #[test]
    fn shared_ids_are_sorted() {
        let g1 = lengths(&[("c", 3), ("a", 1), ("only1", 9)]);
        let g2 = lengths(&[("a", 10), ("c", 30), ("only2", 90)]);
        let (x, y) = shared_lengths(&g1, &g2);
        assert_eq!(x, vec![1.0, 3.0]);
        assert_eq!(y, vec![10.0, 30.0]);
    }

    #[test]
    fn both_tests_run_with_shared_ids() {
        let g1 = lengths(&[("a", 300), ("b", 450), ("c", 600), ("d", 900)]);
        let g2 = lengths(&[("a", 330), ("b", 480), ("c", 660), ("d", 990), ("e", 1200)]);
        let cmp = compare_lengths(&g1, &g2, FeatureKind::Cds);
        assert_eq!(cmp.summary1.n, 4);
        assert_eq!(cmp.summary2.n, 5);
        assert!(cmp.unpaired.is_some());
        let paired = cmp.paired.unwrap();
        assert_eq!(paired.shared_ids, 4);
        // 全部差值为负 -> W = 0
        assert_eq!(paired.result.statistic, 0.0);
    }

    #[test]
    fn no_shared_ids_skips_paired_test() {
        let g1 = lengths(&[("a", 300)]);
        let g2 = lengths(&[("b", 330)]);
        let cmp = compare_lengths(&g1, &g2, FeatureKind::Gene);
        assert!(cmp.paired.is_none());
        assert!(cmp.unpaired.is_some());
    }

    #[test]
    fn empty_genome_skips_unpaired_test() {
        let g1 = FeatureLengths::default();
        let g2 = lengths(&[("b", 330)]);
        let cmp = compare_lengths(&g1, &g2, FeatureKind::Cds);
        assert!(cmp.unpaired.is_none());
        assert_eq!(cmp.summary1.n, 0);
    }
}
