/// G/C 计数（大小写不敏感）
#[inline]
pub fn gc_count(seq: &[u8]) -> usize {
    seq.iter()
        .filter(|&&b| matches!(b.to_ascii_uppercase(), b'G' | b'C'))
        .count()
}

/// 多条序列拼接后的 GC 比例；总长为 0 时返回 0
pub fn gc_fraction<'a, I>(seqs: I) -> f64
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut total = 0usize;
    let mut gc = 0usize;
    for s in seqs {
        total += s.len();
        gc += gc_count(s);
    }
    if total == 0 {
        return 0.0;
    }
    gc as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gc_counts_both_cases() {
        assert_eq!(gc_count(b"ACGTgcNn"), 4);
        assert_eq!(gc_count(b""), 0);
    }

    #[test]
    fn gc_fraction_over_records() {
        let recs: [&[u8]; 2] = [b"GGCC", b"AATT"];
        assert!((gc_fraction(recs) - 0.5).abs() < 1e-12);
        let none: [&[u8]; 0] = [];
        assert_eq!(gc_fraction(none), 0.0);
    }
}
