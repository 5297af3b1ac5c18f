use serde::Serialize;

use super::global::{AlignedPair, GAP};

/// 参考序列（去空位）坐标系中的缺失区段，0-based 闭区间 [start, end]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LossSegment {
    pub start: usize,
    pub end: usize,
}

// 区段至少包含一个残基，没有“空区段”
#[allow(clippy::len_without_is_empty)]
impl LossSegment {
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// 从全局比对中提取 query 相对 reference 的缺失区段
pub fn extract_losses(aln: &AlignedPair) -> Vec<LossSegment> {
    extract_losses_from_rows(aln.query(), aln.reference())
}

/// 同 [`extract_losses`]，直接作用于两行等长的比对串
pub fn extract_losses_from_rows(query: &[u8], reference: &[u8]) -> Vec<LossSegment> {
    let mut segments = Vec::new();
    // 已消耗的参考残基数；当前参考位置 = ref_seen - 1
    let mut ref_seen = 0usize;
    let mut open: Option<usize> = None;

    for (&q, &r) in query.iter().zip(reference) {
        if r == GAP {
            // query 插入：不推进坐标，也不影响缺失区段
            continue;
        }
        let pos = ref_seen;
        ref_seen += 1;
        if q == GAP {
            if open.is_none() {
                open = Some(pos);
            }
        } else if let Some(start) = open.take() {
            segments.push(LossSegment { start, end: pos - 1 });
        }
    }

    if let Some(start) = open {
        segments.push(LossSegment { start, end: ref_seen - 1 });
    }
    segments
}

/// 缺失残基总数
pub fn total_loss(segments: &[LossSegment]) -> usize {
    segments.iter().map(LossSegment::len).sum()
}
