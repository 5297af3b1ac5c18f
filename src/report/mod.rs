//! Output formatters: TSV tables, the comparison report and the alignment dump.

pub mod alignment;
pub mod tables;
pub mod text;

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Create `path` for writing, making its parent directory first.
pub fn create_output(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent)
            .with_context(|| format!("cannot create directory '{}'", parent.display()))?;
    }
    let fh = File::create(path).with_context(|| format!("cannot create '{}'", path.display()))?;
    Ok(BufWriter::new(fh))
}

/// File when a path is given, stdout otherwise.
pub fn output_or_stdout(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => Box::new(create_output(p)?),
        None => Box::new(BufWriter::new(std::io::stdout())),
    })
}

/// Tab-delimited csv writer.
pub fn tsv_writer<W: Write>(w: W) -> csv::Writer<W> {
    csv::WriterBuilder::new().delimiter(b'\t').from_writer(w)
}

/// Fixed-point formatting that prints NaN as `nan`.
pub fn format_fixed(v: f64, decimals: usize) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    format!("{:.*}", decimals, v)
}

/// `%g`-style formatting with `precision` significant digits: scientific notation
/// (two-digit signed exponent) when the exponent is below -4 or at least `precision`,
/// fixed otherwise, trailing zeros trimmed.
pub fn format_general(v: f64, precision: usize) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == 0.0 {
        return "0".to_string();
    }
    let p = precision.max(1);
    let sci = format!("{:.*e}", p - 1, v);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };
    if exp < -4 || exp >= p as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(&mantissa), sign, exp.abs())
    } else {
        let decimals = (p as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, v))
    }
}

fn trim_fraction(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}
