//! 标准正态分布尾概率。

use std::f64::consts::SQRT_2;

/// 互补误差函数 erfc(x)，Chebyshev 拟合（Numerical Recipes `erfcc`），
/// 全实轴相对误差 < 1.2e-7
pub fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let tau = t
        * (-z * z - 1.26551223
            + t * (1.00002368
                + t * (0.37409196
                    + t * (0.09678418
                        + t * (-0.18628806
                            + t * (0.27886807
                                + t * (-1.13520398
                                    + t * (1.48851587 + t * (-0.82215223 + t * 0.17087277)))))))))
            .exp();
    if x >= 0.0 {
        tau
    } else {
        2.0 - tau
    }
}

/// 误差函数 erf(x) = 1 - erfc(x)
pub fn erf(x: f64) -> f64 {
    1.0 - erfc(x)
}

/// 双侧 p 值：P(|Z| >= |z|) = 1 - erf(|z| / √2)
pub fn two_sided_p(z: f64) -> f64 {
    erfc(z.abs() / SQRT_2).clamp(0.0, 1.0)
}
