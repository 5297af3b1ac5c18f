use std::fmt::Write as _;

/// 比对结果中的空位符号
pub const GAP: u8 = b'-';

/// 超过该格点数的 DP 网格会打印内存警告（仍然照常计算）
pub const LARGE_GRID_CELLS: usize = 100_000_000;

/// 线性空位罚分的打分参数
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scoring {
    pub match_score: i32,
    pub mismatch: i32,
    pub gap: i32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            match_score: 2,
            mismatch: -1,
            gap: -2,
        }
    }
}

impl Scoring {
    #[inline]
    fn subst(&self, a: u8, b: u8) -> i32 {
        if a == b {
            self.match_score
        } else {
            self.mismatch
        }
    }
}

/// 回溯方向
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Diag,
    Up,
    Left,
}

/// 全局比对结果。两行等长，且不存在上下同时为空位的列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedPair {
    query: Vec<u8>,
    reference: Vec<u8>,
    score: i32,
}

impl AlignedPair {
    pub fn query(&self) -> &[u8] {
        &self.query
    }

    pub fn reference(&self) -> &[u8] {
        &self.reference
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn len(&self) -> usize {
        self.query.len()
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// 逐列迭代 (query, reference)
    pub fn columns(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.query.iter().copied().zip(self.reference.iter().copied())
    }

    /// 相同残基列数 / 比对长度；空比对返回 0
    pub fn identity(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let same = self.columns().filter(|&(q, r)| q != GAP && q == r).count();
        same as f64 / self.len() as f64
    }

    /// 以 query 为读段、reference 为参考生成 CIGAR（M/I/D），相邻同类列合并计数
    pub fn cigar(&self) -> String {
        let mut cigar = String::new();
        let mut run: Option<(char, usize)> = None;
        for (q, r) in self.columns() {
            let op = if q == GAP {
                'D'
            } else if r == GAP {
                'I'
            } else {
                'M'
            };
            run = match run {
                Some((cur, n)) if cur == op => Some((cur, n + 1)),
                Some((cur, n)) => {
                    let _ = write!(cigar, "{}{}", n, cur);
                    Some((op, 1))
                }
                None => Some((op, 1)),
            };
        }
        if let Some((cur, n)) = run {
            let _ = write!(cigar, "{}{}", n, cur);
        }
        cigar
    }

    /// 比对中间的匹配标记行：`|` 相同，`.` 错配，空格为空位
    pub fn match_line(&self) -> String {
        self.columns()
            .map(|(q, r)| {
                if q == GAP || r == GAP {
                    ' '
                } else if q == r {
                    '|'
                } else {
                    '.'
                }
            })
            .collect()
    }
}

/// DP 工作缓冲区，可跨调用复用
#[derive(Default)]
pub struct GlobalBuffer {
    score: Vec<i32>,
    trace: Vec<Step>,
}

impl GlobalBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn resize(&mut self, size: usize) {
        self.score.clear();
        self.score.resize(size, 0);
        self.trace.clear();
        self.trace.resize(size, Step::Diag);
    }
}

/// Needleman-Wunsch 全局比对（线性空位罚分）
pub fn global_align(query: &[u8], reference: &[u8], p: Scoring) -> AlignedPair {
    global_align_with_buf(query, reference, p, &mut GlobalBuffer::new())
}

pub fn global_align_with_buf(
    query: &[u8],
    reference: &[u8],
    p: Scoring,
    buf: &mut GlobalBuffer,
) -> AlignedPair {
    let n = query.len();
    let m = reference.len();
    let cols = m + 1;
    let size = (n + 1) * cols;

    if size > LARGE_GRID_CELLS {
        log::warn!(
            "global alignment of {}x{} residues needs {} DP cells; memory use may be high",
            n,
            m,
            size
        );
    }

    buf.resize(size);
    let score = &mut buf.score;
    let trace = &mut buf.trace;

    // 边界：第 0 行只能向左走，第 0 列只能向上走
    for j in 1..=m {
        score[j] = j as i32 * p.gap;
        trace[j] = Step::Left;
    }
    for i in 1..=n {
        score[i * cols] = i as i32 * p.gap;
        trace[i * cols] = Step::Up;
    }

    for i in 1..=n {
        for j in 1..=m {
            let idx = i * cols + j;
            let diag = score[(i - 1) * cols + (j - 1)] + p.subst(query[i - 1], reference[j - 1]);
            let up = score[(i - 1) * cols + j] + p.gap;
            let left = score[idx - 1] + p.gap;

            // 平分时优先级固定为 diag > up > left
            let (best, step) = if diag >= up && diag >= left {
                (diag, Step::Diag)
            } else if up >= left {
                (up, Step::Up)
            } else {
                (left, Step::Left)
            };
            score[idx] = best;
            trace[idx] = step;
        }
    }

    // backtrack from (n, m)
    let mut q_row: Vec<u8> = Vec::with_capacity(n + m);
    let mut r_row: Vec<u8> = Vec::with_capacity(n + m);
    let mut i = n;
    let mut j = m;
    while i > 0 || j > 0 {
        match trace[i * cols + j] {
            Step::Diag => {
                q_row.push(query[i - 1]);
                r_row.push(reference[j - 1]);
                i -= 1;
                j -= 1;
            }
            Step::Up => {
                q_row.push(query[i - 1]);
                r_row.push(GAP);
                i -= 1;
            }
            Step::Left => {
                q_row.push(GAP);
                r_row.push(reference[j - 1]);
                j -= 1;
            }
        }
    }
    q_row.reverse();
    r_row.reverse();

    AlignedPair {
        query: q_row,
        reference: r_row,
        score: score[n * cols + m],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 独立的二维表实现，只求最优得分
    fn naive_score(a: &[u8], b: &[u8], p: Scoring) -> i32 {
        let mut grid = vec![vec![0i32; b.len() + 1]; a.len() + 1];
        for (i, row) in grid.iter_mut().enumerate() {
            row[0] = i as i32 * p.gap;
        }
        for j in 0..=b.len() {
            grid[0][j] = j as i32 * p.gap;
        }
        for i in 1..=a.len() {
            for j in 1..=b.len() {
                let s = if a[i - 1] == b[j - 1] { p.match_score } else { p.mismatch };
                grid[i][j] = (grid[i - 1][j - 1] + s)
                    .max(grid[i - 1][j] + p.gap)
                    .max(grid[i][j - 1] + p.gap);
            }
        }
        grid[a.len()][b.len()]
    }

    /// 按列重新计算比对得分
    fn rescore(aln: &AlignedPair, p: Scoring) -> i32 {
        aln.columns()
            .map(|(q, r)| {
                if q == GAP || r == GAP {
                    p.gap
                } else {
                    p.subst(q, r)
                }
            })
            .sum()
    }

    fn strip(row: &[u8]) -> Vec<u8> {
        row.iter().copied().filter(|&b| b != GAP).collect()
    }

    fn make_seq(len: usize, seed: u32, alphabet: &[u8]) -> Vec<u8> {
        let mut x = seed;
        let mut v = Vec::with_capacity(len);
        for _ in 0..len {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            v.push(alphabet[(x >> 16) as usize % alphabet.len()]);
        }
        v
    }

    #[test]
    fn gattaca_matches_recomputed_grid() {
        let p = Scoring::default();
        let aln = global_align(b"GATTACA", b"GCATGCU", p);
        assert_eq!(aln.score(), naive_score(b"GATTACA", b"GCATGCU", p));
        assert_eq!(aln.score(), 2);
        assert_eq!(aln.query(), b"GATTACA");
        assert_eq!(aln.reference(), b"GCATGCU");
    }

    #[test]
    fn identical_sequences() {
        let aln = global_align(b"ACGT", b"ACGT", Scoring::default());
        assert_eq!(aln.score(), 8);
        assert_eq!(aln.cigar(), "4M");
        assert_eq!(aln.match_line(), "||||");
        assert!((aln.identity() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn deletion_in_query() {
        let aln = global_align(b"ACGT", b"ACGGT", Scoring::default());
        assert_eq!(aln.score(), 6);
        assert_eq!(aln.query(), b"AC-GT");
        assert_eq!(aln.reference(), b"ACGGT");
        assert_eq!(aln.cigar(), "2M1D2M");
    }

    #[test]
    fn tie_break_prefers_up_over_left() {
        // 多条最优路径，固定的优先级决定空位位置
        let aln = global_align(b"ACGTACGT", b"ACGTTTTACGT", Scoring::default());
        assert_eq!(aln.score(), 10);
        assert_eq!(aln.query(), b"ACG---TACGT");

        let aln = global_align(b"AAGT", b"AAAAGT", Scoring::default());
        assert_eq!(aln.query(), b"--AAGT");

        let aln = global_align(b"ACGTTTTACGT", b"ACGTACGT", Scoring::default());
        assert_eq!(aln.reference(), b"ACG---TACGT");
        assert_eq!(aln.cigar(), "3M3I5M");
    }

    #[test]
    fn empty_inputs_fall_out_of_recurrence() {
        let p = Scoring::default();
        let aln = global_align(b"", b"ACG", p);
        assert_eq!(aln.query(), b"---");
        assert_eq!(aln.reference(), b"ACG");
        assert_eq!(aln.score(), -6);

        let aln = global_align(b"ACG", b"", p);
        assert_eq!(aln.query(), b"ACG");
        assert_eq!(aln.reference(), b"---");

        let aln = global_align(b"", b"", p);
        assert!(aln.is_empty());
        assert_eq!(aln.score(), 0);
        assert_eq!(aln.identity(), 0.0);
    }

    #[test]
    fn random_pairs_are_valid_and_optimal() {
        let p = Scoring::default();
        let mut buf = GlobalBuffer::new();
        for k in 0..40u32 {
            let a = make_seq((k as usize * 7) % 23, k + 1, b"ACGT");
            let b = make_seq((k as usize * 5) % 19, k + 101, b"ACGT");
            let aln = global_align_with_buf(&a, &b, p, &mut buf);
            assert_eq!(aln.query().len(), aln.reference().len());
            assert!(aln.len() >= a.len().max(b.len()));
            assert!(aln.columns().all(|(q, r)| !(q == GAP && r == GAP)));
            assert_eq!(strip(aln.query()), a);
            assert_eq!(strip(aln.reference()), b);
            assert_eq!(aln.score(), naive_score(&a, &b, p), "k={}", k);
            assert_eq!(aln.score(), rescore(&aln, p), "k={}", k);
        }
    }

    #[test]
    fn deterministic_on_repeat() {
        let p = Scoring { match_score: 1, mismatch: -1, gap: -1 };
        let a = make_seq(30, 7, b"ACDEFGHIKLMNPQRSTVWY");
        let b = make_seq(25, 8, b"ACDEFGHIKLMNPQRSTVWY");
        assert_eq!(global_align(&a, &b, p), global_align(&a, &b, p));
    }

    #[test]
    fn buffer_reuse_across_sizes() {
        let p = Scoring::default();
        let mut buf = GlobalBuffer::new();
        let big = global_align_with_buf(b"ACGTACGTAC", b"ACGTTCGTAC", p, &mut buf);
        let small = global_align_with_buf(b"AC", b"AC", p, &mut buf);
        assert_eq!(big, global_align(b"ACGTACGTAC", b"ACGTTCGTAC", p));
        assert_eq!(small.score(), 4);
    }

    #[test]
    fn cigar_merges_runs() {
        let aln = AlignedPair {
            query: b"ACG--T".to_vec(),
            reference: b"A-GCCT".to_vec(),
            score: 0,
        };
        assert_eq!(aln.cigar(), "1M1I1M2D1M");
        assert_eq!(global_align(b"", b"", Scoring::default()).cigar(), "");
    }
}
