use crate::error::{Error, Result};

use super::normal::two_sided_p;
use super::rank::rank_with_ties;
use super::TestResult;

/// Mann–Whitney U 检验（双侧，正态近似 + 并列修正 + 连续性校正）。
///
/// 统计量取 `U = min(U1, U2)`。方差为零（例如两组全部取同一个值）时返回
/// `p = 1`、`z = None`，这不是错误。任一样本为空时返回 [`Error::EmptySample`]。
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<TestResult> {
    if x.is_empty() {
        return Err(Error::EmptySample { which: "x" });
    }
    if y.is_empty() {
        return Err(Error::EmptySample { which: "y" });
    }

    let n1 = x.len() as f64;
    let n2 = y.len() as f64;
    let n = n1 + n2;

    let pooled: Vec<f64> = x.iter().chain(y).copied().collect();
    let ranking = rank_with_ties(&pooled);
    let r1: f64 = ranking.ranks[..x.len()].iter().sum();

    let u1 = r1 - n1 * (n1 + 1.0) / 2.0;
    let u2 = n1 * n2 - u1;
    let u = u1.min(u2);

    let mu = n1 * n2 / 2.0;
    let var = n1 * n2 * (n + 1.0 - ranking.tie_term / (n * (n - 1.0))) / 12.0;
    let sigma = var.sqrt();
    // 同时覆盖 0 与舍入误差产生的负方差（sqrt 为 NaN）
    if sigma.is_nan() || sigma <= 0.0 {
        return Ok(TestResult::degenerate(u));
    }

    let z = if u < mu {
        (u - mu + 0.5) / sigma
    } else {
        (u - mu - 0.5) / sigma
    };
    Ok(TestResult {
        statistic: u,
        z: Some(z),
        p: two_sided_p(z),
    })
}
