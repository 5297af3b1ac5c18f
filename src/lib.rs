//! # symcomp
//!
//! 成对基因组比较工具：通常是高度退化的内共生菌基因组与其自由生活近缘种之间，
//! 量化基因长度差异与序列缺失。
//!
//! - **全局比对**：线性空位罚分的 Needleman-Wunsch，固定的回溯优先级（diag > up > left）
//! - **缺失区段**：在参考序列自身坐标中提取 query 的缺失片段
//! - **秩检验**：Mann–Whitney U 与 Wilcoxon 符号秩检验（并列修正 + 连续性校正的正态近似）
//!
//! ## 快速示例
//!
//! ```rust
//! use symcomp::align::{extract_losses, global_align, LossSegment, Scoring};
//! use symcomp::stats::mann_whitney_u;
//!
//! let aln = global_align(b"MKVLAAGIVG", b"MKVAGIVGLLW", Scoring::default());
//! assert_eq!(aln.query().len(), aln.reference().len());
//! assert_eq!(extract_losses(&aln), vec![LossSegment { start: 8, end: 10 }]);
//!
//! let res = mann_whitney_u(&[1.0, 2.0, 3.0, 4.0, 5.0], &[6.0, 7.0, 8.0, 9.0, 10.0]).unwrap();
//! assert_eq!(res.statistic, 0.0);
//! assert!(res.p < 0.05);
//! ```
//!
//! ## 模块说明
//!
//! - [`align`]：全局比对、缺失区段提取、批量配对比对
//! - [`stats`]：秩、正态尾概率、两种秩检验与描述统计
//! - [`io`]：FASTA / GFF3 解析
//! - [`report`]：TSV / 文本 / Markdown 输出
//! - [`plot`]：长度直方图与基因组大小散点图（SVG）
//! - [`compare`] / [`genome`]：命令行子命令背后的流程

pub mod align;
pub mod compare;
pub mod error;
pub mod genome;
pub mod io;
pub mod plot;
pub mod report;
pub mod stats;
pub mod util;

pub use error::{Error, Result};
