pub mod global;
pub mod loss;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::io::fasta::{read_fasta, FastaRecord};
use crate::report;

pub use global::{global_align, global_align_with_buf, AlignedPair, GlobalBuffer, Scoring, GAP};
pub use loss::{extract_losses, extract_losses_from_rows, total_loss, LossSegment};

/// 蛋白缺失映射的运行参数
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlignOpt {
    pub scoring: Scoring,
    pub threads: usize,
    /// 按记录顺序而非 ID 配对
    pub by_order: bool,
}

impl Default for AlignOpt {
    fn default() -> Self {
        Self {
            scoring: Scoring::default(),
            threads: 1,
            by_order: false,
        }
    }
}

/// 输出路径；`table` 为空时写到 stdout
#[derive(Clone, Debug, Default)]
pub struct AlignOutputs {
    pub table: Option<PathBuf>,
    pub segments: Option<PathBuf>,
    pub alignments: Option<PathBuf>,
}

/// 待比对的一对序列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeqPair {
    pub id: String,
    pub query: Vec<u8>,
    pub reference: Vec<u8>,
}

/// 配对结果与两侧未配对记录的 ID
#[derive(Debug, Default)]
pub struct Pairing {
    pub pairs: Vec<SeqPair>,
    pub unmatched_query: Vec<String>,
    pub unmatched_reference: Vec<String>,
}

/// 按 ID 配对：输出顺序跟随 reference；同一 ID 重复出现时取第一条
pub fn pair_by_id(query: Vec<FastaRecord>, reference: Vec<FastaRecord>) -> Pairing {
    let mut by_id: HashMap<String, Vec<u8>> = HashMap::with_capacity(query.len());
    for rec in query {
        if by_id.contains_key(&rec.id) {
            log::debug!("duplicate query id '{}' ignored", rec.id);
            continue;
        }
        by_id.insert(rec.id, rec.seq);
    }

    let mut out = Pairing::default();
    for rec in reference {
        match by_id.remove(&rec.id) {
            Some(q) => out.pairs.push(SeqPair {
                id: rec.id,
                query: q,
                reference: rec.seq,
            }),
            None => out.unmatched_reference.push(rec.id),
        }
    }
    out.unmatched_query = by_id.into_keys().collect();
    out.unmatched_query.sort();
    out
}

/// 按位置配对；两侧 ID 不同时以 `query/reference` 命名
pub fn pair_by_order(query: Vec<FastaRecord>, reference: Vec<FastaRecord>) -> Pairing {
    let mut out = Pairing::default();
    let mut q_iter = query.into_iter();
    let mut r_iter = reference.into_iter();
    loop {
        match (q_iter.next(), r_iter.next()) {
            (Some(q), Some(r)) => {
                let id = if q.id == r.id {
                    q.id
                } else {
                    format!("{}/{}", q.id, r.id)
                };
                out.pairs.push(SeqPair {
                    id,
                    query: q.seq,
                    reference: r.seq,
                });
            }
            (Some(q), None) => out.unmatched_query.push(q.id),
            (None, Some(r)) => out.unmatched_reference.push(r.id),
            (None, None) => break,
        }
    }
    out
}

/// 单对序列的比对与缺失区段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairOutcome {
    pub id: String,
    pub query_len: usize,
    pub reference_len: usize,
    pub alignment: AlignedPair,
    pub losses: Vec<LossSegment>,
}

impl PairOutcome {
    pub fn lost_residues(&self) -> usize {
        total_loss(&self.losses)
    }
}

pub fn align_pair(pair: &SeqPair, scoring: Scoring, buf: &mut GlobalBuffer) -> PairOutcome {
    let alignment = global_align_with_buf(&pair.query, &pair.reference, scoring, buf);
    let losses = extract_losses(&alignment);
    PairOutcome {
        id: pair.id.clone(),
        query_len: pair.query.len(),
        reference_len: pair.reference.len(),
        alignment,
        losses,
    }
}

/// 并行比对所有配对（每个工作线程复用一个 DP 缓冲区），结果保持输入顺序
pub fn align_pairs(pairs: &[SeqPair], scoring: Scoring) -> Vec<PairOutcome> {
    pairs
        .par_iter()
        .map_init(GlobalBuffer::new, |buf, pair| align_pair(pair, scoring, buf))
        .collect()
}

/// `align` 子命令的汇总信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignSummary {
    pub pairs: usize,
    pub unmatched_query: usize,
    pub unmatched_reference: usize,
    pub pairs_with_loss: usize,
    pub lost_residues: usize,
}

pub fn align_fasta_pairs(
    query_path: &Path,
    reference_path: &Path,
    outputs: &AlignOutputs,
    opt: AlignOpt,
) -> Result<AlignSummary> {
    let query = read_fasta(query_path)?;
    let reference = read_fasta(reference_path)?;
    log::info!(
        "loaded {} query and {} reference records",
        query.len(),
        reference.len()
    );

    let pairing = if opt.by_order {
        pair_by_order(query, reference)
    } else {
        pair_by_id(query, reference)
    };
    if !pairing.unmatched_query.is_empty() || !pairing.unmatched_reference.is_empty() {
        log::warn!(
            "{} query and {} reference records have no partner and were skipped",
            pairing.unmatched_query.len(),
            pairing.unmatched_reference.len()
        );
        for id in pairing.unmatched_query.iter().chain(&pairing.unmatched_reference) {
            log::debug!("unpaired: {}", id);
        }
    }
    if pairing.pairs.is_empty() {
        anyhow::bail!(
            "no record pairs between '{}' and '{}'",
            query_path.display(),
            reference_path.display()
        );
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads.max(1))
        .build()
        .context("cannot start alignment thread pool")?;
    log::info!(
        "aligning {} pairs on {} threads",
        pairing.pairs.len(),
        pool.current_num_threads()
    );
    let outcomes = pool.install(|| align_pairs(&pairing.pairs, opt.scoring));

    report::alignment::write_pair_table(
        report::output_or_stdout(outputs.table.as_deref())?,
        &outcomes,
    )
    .context("cannot write loss table")?;
    if let Some(p) = &outputs.segments {
        report::alignment::write_segment_table(report::create_output(p)?, &outcomes)
            .with_context(|| format!("cannot write '{}'", p.display()))?;
    }
    if let Some(p) = &outputs.alignments {
        report::alignment::write_alignments(report::create_output(p)?, &outcomes, opt.scoring)
            .with_context(|| format!("cannot write '{}'", p.display()))?;
    }

    Ok(AlignSummary {
        pairs: outcomes.len(),
        unmatched_query: pairing.unmatched_query.len(),
        unmatched_reference: pairing.unmatched_reference.len(),
        pairs_with_loss: outcomes.iter().filter(|o| !o.losses.is_empty()).count(),
        lost_residues: outcomes.iter().map(PairOutcome::lost_residues).sum(),
    })
}
