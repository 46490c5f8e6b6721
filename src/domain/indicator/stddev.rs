//! Rolling standard deviation.
//!
//! Population standard deviation over n closing prices.
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n-1) / n)
//! Warmup: first (n-1) rows are `None`.

pub fn calculate_stddev(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let warmup = period - 1;
    (0..closes.len())
        .map(|i| {
            if i < warmup {
                return None;
            }
            let window = &closes[i + 1 - period..=i];
            let mean: f64 = window.iter().sum::<f64>() / period as f64;
            let variance: f64 = window
                .iter()
                .map(|c| {
                    let diff = c - mean;
                    diff * diff
                })
                .sum::<f64>()
                / period as f64;
            Some(variance.sqrt())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn stddev_warmup() {
        let series = calculate_stddev(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        assert!(series[0].is_none());
        assert!(series[1].is_none());
        assert!(series[2].is_some());
        assert!(series[3].is_some());
        assert!(series[4].is_some());
    }

    #[test]
    fn stddev_constant_values() {
        let series = calculate_stddev(&[100.0; 5], 3);
        assert_relative_eq!(series[2].unwrap(), 0.0);
    }

    #[test]
    fn stddev_basic_calculation() {
        let series = calculate_stddev(&[10.0, 20.0, 30.0], 3);

        let mean: f64 = 20.0;
        let expected = (((10.0 - mean).powi(2) + (20.0 - mean).powi(2) + (30.0 - mean).powi(2))
            / 3.0_f64)
            .sqrt();
        assert_relative_eq!(series[2].unwrap(), expected, epsilon = 1e-10);
    }

    #[test]
    fn stddev_known_values() {
        let series = calculate_stddev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8);
        assert_relative_eq!(series[7].unwrap(), 2.0, epsilon = 1e-10);
    }
}
