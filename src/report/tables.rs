use std::io::Write;

use serde::Serialize;

use super::{format_fixed, tsv_writer};
use crate::error::Result;
use crate::genome::GenomeStats;

#[derive(Serialize)]
struct LengthRow {
    index: usize,
    length_bp: u64,
}

/// `index  length_bp` table, 1-based index in input order.
pub fn write_lengths_tsv<W: Write>(w: W, lengths: &[u64]) -> Result<()> {
    let mut wtr = tsv_writer(w);
    for (i, &length_bp) in lengths.iter().enumerate() {
        wtr.serialize(LengthRow { index: i + 1, length_bp })?;
    }
    // 空表也要有表头
    if lengths.is_empty() {
        wtr.write_record(["index", "length_bp"])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_genome_tsv<W: Write>(w: W, rows: &[GenomeStats]) -> Result<()> {
    let mut wtr = tsv_writer(w);
    wtr.write_record(["label", "path", "genome_size_bp", "gc_content_pct"])?;
    for r in rows {
        wtr.write_record([
            r.label.clone(),
            r.path.clone(),
            r.genome_size_bp.to_string(),
            format_fixed(r.gc_content_pct, 4),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn genome_markdown(rows: &[GenomeStats]) -> String {
    let mut lines = vec![
        "| Bacterium | FASTA Path | Genome Size (bp) | GC Content (%) |".to_string(),
        "|---|---|---:|---:|".to_string(),
    ];
    for r in rows {
        lines.push(format!(
            "| {} | `{}` | {} | {} |",
            r.label,
            r.path,
            r.genome_size_bp,
            format_fixed(r.gc_content_pct, 2)
        ));
    }
    lines.join("\n")
}
