//! Exponential Moving Average.
//!
//! k = 2/(n+1), EMA[0] = C[0], EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) rows are `None`; the recursion still runs through them.

pub fn calculate_ema(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }
    let values: Vec<Option<f64>> = closes.iter().copied().map(Some).collect();
    ewm(&values, 2.0 / (period as f64 + 1.0), period)
}

/// Exponentially weighted mean without bias adjustment.
///
/// Absent inputs are skipped: the recursion is seeded with the first present
/// value and an absent row repeats the previous mean. A row is reported only
/// once `min_periods` present values have been seen.
pub(crate) fn ewm(values: &[Option<f64>], alpha: f64, min_periods: usize) -> Vec<Option<f64>> {
    let min_periods = min_periods.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut mean: Option<f64> = None;
    let mut seen = 0usize;

    for value in values {
        if let Some(x) = *value {
            mean = Some(match mean {
                None => x,
                Some(prev) => alpha * x + (1.0 - alpha) * prev,
            });
            seen += 1;
        }
        out.push(if seen >= min_periods { mean } else { None });
    }

    out
}
