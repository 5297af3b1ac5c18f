//! 统一错误类型（基于 `thiserror`）。
//!
//! 统计检验的退化情形（零方差、全部差值为零）不是错误，而是返回 `p = 1` 的哨兵结果；
//! 这里只收录真正的前置条件违规与输入层错误。

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Paired test invoked with samples of different length
    #[error("paired samples differ in length: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Rank-sum test needs at least one observation per sample
    #[error("sample '{which}' is empty")]
    EmptySample { which: &'static str },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("table write error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
