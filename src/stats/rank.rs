/// 合并样本的秩次结果
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    /// 与输入顺序一一对应的（平均）秩，1-based
    pub ranks: Vec<f64>,
    /// 并列修正项 Σ(c³ - c)，c 为每个取值的出现次数
    pub tie_term: f64,
}

/// 升序排序后分配平均秩：同一并列组内的每个值都获得该组所占位置的平均秩。
///
/// 并列计数只在本次调用内按排序后的连续段统计，不依赖任何全局状态。
/// 输入应为有限值；NaN 自成一组并排在末尾。
pub fn rank_with_ties(values: &[f64]) -> Ranking {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut tie_term = 0.0;
    let mut i = 0usize;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // 位置 i+1 ..= j 的平均
        let avg = (i + 1 + j) as f64 / 2.0;
        for &k in &order[i..j] {
            ranks[k] = avg;
        }
        let c = (j - i) as f64;
        tie_term += c * c * c - c;
        i = j;
    }

    Ranking { ranks, tie_term }
}
