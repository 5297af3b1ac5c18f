use std::fmt::Write as _;

use super::{format_fixed, format_general};
use crate::compare::LengthComparison;
use crate::stats::Summary;

fn summary_line(idx: usize, label: &str, s: &Summary) -> String {
    format!(
        "Genome {} ({}): n={}, mean={}, median={}, IQR=({},{})",
        idx,
        label,
        s.n,
        format_fixed(s.mean, 2),
        format_fixed(s.median, 2),
        format_fixed(s.q1, 2),
        format_fixed(s.q3, 2)
    )
}

/// Plain-text body of `<prefix>.stats.txt`.
pub fn render_comparison(cmp: &LengthComparison, label1: &str, label2: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Feature: {}", cmp.feature);
    let _ = writeln!(out, "{}", summary_line(1, label1, &cmp.summary1));
    let _ = writeln!(out, "{}", summary_line(2, label2, &cmp.summary2));
    out.push('\n');

    match &cmp.unpaired {
        Some(t) => {
            let _ = writeln!(out, "Unpaired comparison (Mann-Whitney U, two-sided normal approx):");
            let _ = writeln!(
                out,
                "U={}, z={}, p={}",
                format_fixed(t.statistic, 2),
                format_fixed(t.z_or_nan(), 3),
                format_general(t.p, 3)
            );
        }
        None => {
            let _ = writeln!(
                out,
                "Unpaired comparison: at least one genome has no {} features; skipped.",
                cmp.feature
            );
        }
    }
    out.push('\n');

    match &cmp.paired {
        Some(pt) => {
            let _ = writeln!(
                out,
                "Paired comparison over {} shared IDs (Wilcoxon signed-rank, two-sided normal approx):",
                pt.shared_ids
            );
            let _ = writeln!(
                out,
                "W={}, z={}, p={}",
                format_fixed(pt.result.statistic, 2),
                format_fixed(pt.result.z_or_nan(), 3),
                format_general(pt.result.p, 3)
            );
        }
        None => {
            let _ = writeln!(
                out,
                "Paired comparison: no shared IDs found across chosen attributes; skipped."
            );
        }
    }
    out
}
