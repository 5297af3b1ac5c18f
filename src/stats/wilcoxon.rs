use crate::error::{Error, Result};

use super::normal::two_sided_p;
use super::rank::rank_with_ties;
use super::TestResult;

/// Wilcoxon 符号秩检验（配对，双侧，正态近似）。
///
/// 差值恰为 0 的配对直接丢弃；若全部为 0，返回 `W = 0, p = 1, z = None`。
/// 两个样本长度不同返回 [`Error::LengthMismatch`]。
pub fn wilcoxon_signed_rank(x: &[f64], y: &[f64]) -> Result<TestResult> {
    if x.len() != y.len() {
        return Err(Error::LengthMismatch {
            left: x.len(),
            right: y.len(),
        });
    }

    let diffs: Vec<f64> = x
        .iter()
        .zip(y)
        .map(|(a, b)| a - b)
        .filter(|&d| d != 0.0)
        .collect();
    if diffs.is_empty() {
        return Ok(TestResult::degenerate(0.0));
    }

    let magnitudes: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let ranking = rank_with_ties(&magnitudes);

    let mut w_pos = 0.0;
    let mut w_neg = 0.0;
    for (d, r) in diffs.iter().zip(&ranking.ranks) {
        if *d > 0.0 {
            w_pos += r;
        } else {
            w_neg += r;
        }
    }
    let w = w_pos.min(w_neg);

    let n = diffs.len() as f64;
    let mu = n * (n + 1.0) / 4.0;
    let var = n * (n + 1.0) * (2.0 * n + 1.0) / 24.0 - ranking.tie_term / 48.0;
    let sigma = var.sqrt();
    if sigma.is_nan() || sigma <= 0.0 {
        return Ok(TestResult::degenerate(w));
    }

    // 校正方向与 rank-sum 检验相反：W < mu 时向远离 mu 的方向移动
    let z = if w < mu {
        (w - mu - 0.5) / sigma
    } else {
        (w - mu + 0.5) / sigma
    };
    Ok(TestResult {
        statistic: w,
        z: Some(z),
        p: two_sided_p(z),
    })
}
