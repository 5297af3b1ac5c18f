//! 非参数秩检验与描述统计。

pub mod mann_whitney;
pub mod normal;
pub mod rank;
pub mod summary;
pub mod wilcoxon;

use serde::Serialize;

pub use mann_whitney::mann_whitney_u;
pub use normal::two_sided_p;
pub use rank::{rank_with_ties, Ranking};
pub use summary::{summarize, Summary};
pub use wilcoxon::wilcoxon_signed_rank;

/// 单次检验结果；`z = None` 表示方差退化、z 无定义
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TestResult {
    pub statistic: f64,
    pub z: Option<f64>,
    pub p: f64,
}

impl TestResult {
    /// 零方差等退化情形：p = 1，z 无定义
    pub fn degenerate(statistic: f64) -> Self {
        Self {
            statistic,
            z: None,
            p: 1.0,
        }
    }

    /// z 无定义时返回 NaN，便于格式化输出
    pub fn z_or_nan(&self) -> f64 {
        self.z.unwrap_or(f64::NAN)
    }
}
