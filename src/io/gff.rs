use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;
use std::path::Path;

use clap::ValueEnum;

use crate::error::Result;

/// Identifier attributes tried, in order, when no explicit pairing key is given.
pub const DEFAULT_ID_KEYS: [&str; 5] = ["ID", "locus_tag", "gene", "Name", "protein_id"];

/// GFF3 feature type whose lengths are measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FeatureKind {
    #[value(name = "CDS")]
    Cds,
    #[value(name = "gene")]
    Gene,
}

impl FeatureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::Cds => "CDS",
            FeatureKind::Gene => "gene",
        }
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-genome feature lengths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureLengths {
    /// Lengths in file order, one per matching row.
    pub lengths: Vec<u64>,
    /// First length seen for each identifier.
    pub by_id: HashMap<String, u64>,
    /// Data rows dropped for having fewer than 9 columns or non-integer coordinates.
    pub skipped: usize,
}

impl FeatureLengths {
    pub fn as_f64(&self) -> Vec<f64> {
        self.lengths.iter().map(|&l| l as f64).collect()
    }
}

/// Parse the 9th GFF column. Items are `;`-separated; each splits on the first `=`,
/// falling back to the first space, else it is a bare key with an empty value.
pub fn parse_attributes(field: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let field = field.trim();
    if field.is_empty() || field == "." {
        return out;
    }
    for item in field.split(';').filter(|s| !s.is_empty()) {
        let (k, v) = item
            .split_once('=')
            .or_else(|| item.split_once(' '))
            .unwrap_or((item, ""));
        out.insert(k.trim().to_string(), v.trim().to_string());
    }
    out
}

/// Key priority list: the user's pairing key first, then the defaults.
pub fn id_key_priority(pair_key: Option<&str>) -> Vec<String> {
    let mut keys: Vec<String> = Vec::with_capacity(DEFAULT_ID_KEYS.len() + 1);
    if let Some(k) = pair_key.filter(|k| !k.is_empty()) {
        keys.push(k.to_string());
    }
    for k in DEFAULT_ID_KEYS {
        if !keys.iter().any(|have| have == k) {
            keys.push(k.to_string());
        }
    }
    keys
}

fn pick_id(attrs: &HashMap<String, String>, id_keys: &[String]) -> Option<String> {
    id_keys
        .iter()
        .filter_map(|k| attrs.get(k))
        .find(|v| !v.is_empty() && v.as_str() != ".")
        .cloned()
}

pub fn read_feature_lengths<R: BufRead>(
    mut reader: R,
    feature: FeatureKind,
    id_keys: &[String],
) -> Result<FeatureLengths> {
    let mut out = FeatureLengths::default();
    let mut raw: Vec<u8> = Vec::new();

    loop {
        raw.clear();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&raw);
        let line = line.trim_end_matches(['\n', '\r']);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 9 {
            out.skipped += 1;
            continue;
        }
        if cols[2] != feature.as_str() {
            continue;
        }
        let (start, end) = match (cols[3].trim().parse::<i64>(), cols[4].trim().parse::<i64>()) {
            (Ok(s), Ok(e)) => (s, e),
            _ => {
                out.skipped += 1;
                continue;
            }
        };

        let length = end.abs_diff(start) + 1;
        out.lengths.push(length);
        if let Some(id) = pick_id(&parse_attributes(cols[8]), id_keys) {
            out.by_id.entry(id).or_insert(length);
        }
    }

    Ok(out)
}

pub fn read_gff_lengths(path: &Path, feature: FeatureKind, id_keys: &[String]) -> Result<FeatureLengths> {
    let fh = std::fs::File::open(path)?;
    let lengths = read_feature_lengths(std::io::BufReader::new(fh), feature, id_keys)?;
    log::info!(
        "{}: {} {} features, {} with identifiers, {} malformed rows skipped",
        path.display(),
        lengths.lengths.len(),
        feature,
        lengths.by_id.len(),
        lengths.skipped
    );
    Ok(lengths)
}
