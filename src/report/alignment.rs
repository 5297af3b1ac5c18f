use std::io::Write;

use serde::Serialize;

use super::{format_fixed, tsv_writer};
use crate::align::{LossSegment, PairOutcome, Scoring};
use crate::error::Result;

/// `start-end` items joined by `,`; `.` when nothing was lost.
pub fn format_segments(segments: &[LossSegment]) -> String {
    if segments.is_empty() {
        return ".".to_string();
    }
    segments
        .iter()
        .map(|s| format!("{}-{}", s.start, s.end))
        .collect::<Vec<_>>()
        .join(",")
}

/// One row per aligned pair.
pub fn write_pair_table<W: Write>(w: W, outcomes: &[PairOutcome]) -> Result<()> {
    let mut wtr = tsv_writer(w);
    wtr.write_record([
        "id",
        "query_len",
        "reference_len",
        "score",
        "aligned_len",
        "identity",
        "cigar",
        "lost_residues",
        "segments",
    ])?;
    for o in outcomes {
        wtr.write_record([
            o.id.clone(),
            o.query_len.to_string(),
            o.reference_len.to_string(),
            o.alignment.score().to_string(),
            o.alignment.len().to_string(),
            format_fixed(o.alignment.identity(), 4),
            o.alignment.cigar(),
            o.lost_residues().to_string(),
            format_segments(&o.losses),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct SegmentRow<'a> {
    id: &'a str,
    start: usize,
    end: usize,
    length: usize,
}

/// One row per loss segment (0-based, inclusive reference coordinates).
pub fn write_segment_table<W: Write>(w: W, outcomes: &[PairOutcome]) -> Result<()> {
    let mut wtr = tsv_writer(w);
    let mut rows = 0usize;
    for o in outcomes {
        for s in &o.losses {
            wtr.serialize(SegmentRow {
                id: &o.id,
                start: s.start,
                end: s.end,
                length: s.len(),
            })?;
            rows += 1;
        }
    }
    if rows == 0 {
        wtr.write_record(["id", "start", "end", "length"])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Pairwise text dump: `>id score=S cigar=C` then query row, match line, reference row.
pub fn write_alignments<W: Write>(mut w: W, outcomes: &[PairOutcome], scoring: Scoring) -> Result<()> {
    writeln!(
        w,
        "# global alignment (match={}, mismatch={}, gap={})",
        scoring.match_score, scoring.mismatch, scoring.gap
    )?;
    writeln!(w, "# Generated: {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"))?;
    for o in outcomes {
        writeln!(w, ">{} score={} cigar={}", o.id, o.alignment.score(), o.alignment.cigar())?;
        writeln!(w, "{}", String::from_utf8_lossy(o.alignment.query()))?;
        writeln!(w, "{}", o.alignment.match_line())?;
        writeln!(w, "{}", String::from_utf8_lossy(o.alignment.reference()))?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::{align_pair, GlobalBuffer, SeqPair};

    fn outcomes() -> Vec<PairOutcome> {
        let mut buf = GlobalBuffer::new();
        let pairs = [
            SeqPair { id: "p1".into(), query: b"ACGT".to_vec(), reference: b"ACGGT".to_vec() },
            SeqPair { id: "p2".into(), query: b"ACGT".to_vec(), reference: b"ACGT".to_vec() },
        ];
        pairs
            .iter()
            .map(|p| align_pair(p, Scoring::default(), &mut buf))
            .collect()
    }

    #[test]
    fn pair_table_rows() {
        let mut out = Vec::new();
        write_pair_table(&mut out, &outcomes()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "id\tquery_len\treference_len\tscore\taligned_len\tidentity\tcigar\tlost_residues\tsegments"
        );
        assert_eq!(lines[1], "p1\t4\t5\t6\t5\t0.8000\t2M1D2M\t1\t2-2");
        assert_eq!(lines[2], "p2\t4\t4\t8\t4\t1.0000\t4M\t0\t.");
    }

    #[test]
    fn segment_table_rows() {
        let mut out = Vec::new();
        write_segment_table(&mut out, &outcomes()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "id\tstart\tend\tlength\np1\t2\t2\t1\n");
    }

    #[test]
    fn empty_segment_table_keeps_header() {
        let mut out = Vec::new();
        write_segment_table(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "id\tstart\tend\tlength\n");
    }

    #[test]
    fn alignment_dump() {
        let mut out = Vec::new();
        write_alignments(&mut out, &outcomes(), Scoring::default()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let body: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(body, vec![
                ">p1 score=6 cigar=2M1D2M",
                "AC-GT",
                "|| ||",
                "ACGGT",
                ">p2 score=8 cigar=4M",
                "ACGT",
                "||||",
                "ACGT"
            ]);
    }

    #[test]
    fn segments_formatting() {
        assert_eq!(format_segments(&[]), ".");
        assert_eq!(
            format_segments(&[LossSegment { start: 0, end: 0 }, LossSegment { start: 5, end: 9 }]),
            "0-0,5-9"
        );
    }
}
