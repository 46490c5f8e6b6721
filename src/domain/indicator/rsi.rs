//! RSI (Relative Strength Index) indicator.
//!
//! Gains and losses are smoothed with Wilder's exponential average
//! (alpha = 1/n), starting from a zero change on the first row:
//! avg = prev_avg * (n-1)/n + current/n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first (n-1) rows are `None`.

use crate::domain::indicator::ema::ewm;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || closes.is_empty() {
        return vec![None; closes.len()];
    }

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    gains.push(Some(0.0));
    losses.push(Some(0.0));
    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(Some(if change > 0.0 { change } else { 0.0 }));
        losses.push(Some(if change < 0.0 { -change } else { 0.0 }));
    }

    let alpha = 1.0 / period as f64;
    let avg_gain = ewm(&gains, alpha, period);
    let avg_loss = ewm(&losses, alpha, period);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(g, l)| match (g, l) {
            (Some(_), Some(l)) if *l == 0.0 => Some(100.0),
            (Some(g), Some(l)) => Some(100.0 - 100.0 / (1.0 + g / l)),
            _ => None,
        })
        .collect()
}
