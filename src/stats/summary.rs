use serde::Serialize;

/// 描述性统计：样本量、均值、中位数与四分位数
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
}

/// 空样本返回 `n = 0` 且其余字段为 NaN。四分位数采用 inclusive 方法：
/// 在排序后位置 (n-1)·k/4 处线性插值。
pub fn summarize(values: &[f64]) -> Summary {
    if values.is_empty() {
        return Summary {
            n: 0,
            mean: f64::NAN,
            median: f64::NAN,
            q1: f64::NAN,
            q3: f64::NAN,
        };
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    Summary {
        n,
        mean,
        median: quartile(&sorted, 2),
        q1: quartile(&sorted, 1),
        q3: quartile(&sorted, 3),
    }
}

/// 第 k 个四分位（k = 1..=3），sorted 非空
fn quartile(sorted: &[f64], k: usize) -> f64 {
    let m = sorted.len() - 1;
    let j = k * m / 4;
    let delta = (k * m % 4) as f64;
    if delta == 0.0 {
        return sorted[j];
    }
    (sorted[j] * (4.0 - delta) + sorted[j + 1] * delta) / 4.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_nan() {
        let s = summarize(&[]);
        assert_eq!(s.n, 0);
        assert!(s.mean.is_nan() && s.median.is_nan() && s.q1.is_nan() && s.q3.is_nan());
    }

    #[test]
    fn single_value() {
        let s = summarize(&[42.0]);
        assert_eq!(s, Summary { n: 1, mean: 42.0, median: 42.0, q1: 42.0, q3: 42.0 });
    }

    #[test]
    fn odd_count() {
        let s = summarize(&[5.0, 1.0, 3.0, 2.0, 4.0]);
        assert_eq!(s.n, 5);
        assert_eq!(s.mean, 3.0);
        assert_eq!(s.median, 3.0);
        assert_eq!(s.q1, 2.0);
        assert_eq!(s.q3, 4.0);
    }

    #[test]
    fn even_count_interpolates() {
        let s = summarize(&[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.median, 2.5);
        assert_eq!(s.q1, 1.75);
        assert_eq!(s.q3, 3.25);

        let s = summarize(&[300.0, 900.0, 1200.0, 600.0, 1500.0, 450.0]);
        // 排序: 300 450 600 900 1200 1500
        assert_eq!(s.median, 750.0);
        assert_eq!(s.q1, 487.5);
        assert_eq!(s.q3, 1125.0);
    }
}
