use criterion::{black_box, criterion_group, criterion_main, Criterion};

use symcomp::align::{self, GlobalBuffer, Scoring, SeqPair};
use symcomp::stats;

const AMINO: &[u8] = b"ACDEFGHIKLMNPQRSTVWY";

fn make_protein(len: usize, seed: u32) -> Vec<u8> {
    let mut seq = Vec::with_capacity(len);
    let mut x: u32 = seed;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(AMINO[(x >> 16) as usize % AMINO.len()]);
    }
    seq
}

/// 模拟退化：删除若干片段并引入点突变
fn degrade(seq: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = seq
        .iter()
        .enumerate()
        .filter(|(i, _)| !(100..130).contains(i) && !(300..310).contains(i))
        .map(|(_, &b)| b)
        .collect();
    for i in (0..out.len()).step_by(17) {
        out[i] = b'W';
    }
    out
}

fn make_lengths(n: usize, seed: u32, scale: f64) -> Vec<f64> {
    let mut x = seed;
    (0..n)
        .map(|_| {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            ((x >> 16) % 3000) as f64 * scale
        })
        .collect()
}

fn bench_global_align(c: &mut Criterion) {
    let reference = make_protein(500, 42);
    let query = degrade(&reference);
    let mut buf = GlobalBuffer::new();

    c.bench_function("global_align_500aa", |b| {
        b.iter(|| {
            black_box(align::global_align_with_buf(
                black_box(&query),
                black_box(&reference),
                Scoring::default(),
                &mut buf,
            ));
        })
    });
}

fn bench_align_pairs(c: &mut Criterion) {
    let pairs: Vec<SeqPair> = (0..32)
        .map(|i| {
            let reference = make_protein(300, i + 1);
            SeqPair {
                id: format!("p{}", i),
                query: degrade(&reference),
                reference,
            }
        })
        .collect();

    c.bench_function("align_pairs_32x300aa", |b| {
        b.iter(|| {
            black_box(align::align_pairs(black_box(&pairs), Scoring::default()));
        })
    });
}

fn bench_rank_tests(c: &mut Criterion) {
    let x = make_lengths(4_000, 7, 1.0);
    let y = make_lengths(4_000, 11, 1.1);

    c.bench_function("mann_whitney_4k", |b| {
        b.iter(|| {
            black_box(stats::mann_whitney_u(black_box(&x), black_box(&y)).ok());
        })
    });
    c.bench_function("wilcoxon_4k", |b| {
        b.iter(|| {
            black_box(stats::wilcoxon_signed_rank(black_box(&x), black_box(&y)).ok());
        })
    });
}

criterion_group!(benches, bench_global_align, bench_align_pairs, bench_rank_tests);
criterion_main!(benches);
