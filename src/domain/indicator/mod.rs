//! Technical indicator formulas over closing prices.
//!
//! Every function takes the closing prices of a series (oldest first) and
//! returns one `Option<f64>` per input row. `None` marks warmup rows where
//! the indicator is not yet defined.
//!
//! - [`sma`]: trailing simple mean
//! - [`ema`]: exponential mean, `adjust=false` recursion seeded with the first price
//! - [`stddev`]: trailing population standard deviation
//! - [`bollinger`]: SMA ± k·stddev
//! - [`rsi`]: Wilder relative strength index
//! - [`macd`]: EMA(fast) − EMA(slow) and its EMA signal line

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stddev;

pub use bollinger::{calculate_bollinger, BollingerBands};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, calculate_macd_default, MacdLines};
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stddev::calculate_stddev;

use std::fmt;

/// Indicator identity plus parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

impl IndicatorType {
    /// Row count the series must exceed before the indicator is computed.
    pub fn required_window(&self) -> usize {
        match self {
            IndicatorType::Sma(period)
            | IndicatorType::Ema(period)
            | IndicatorType::Rsi(period) => *period,
            IndicatorType::Bollinger { period, .. } => *period,
            IndicatorType::Macd { slow, .. } => *slow,
        }
    }

    /// Names of the columns this indicator appends to a series.
    pub fn column_names(&self) -> Vec<String> {
        match self {
            IndicatorType::Sma(period) => vec![format!("SMA_{period}")],
            IndicatorType::Ema(period) => vec![format!("EMA_{period}")],
            IndicatorType::Rsi(_) => vec!["RSI".to_string()],
            IndicatorType::Macd { .. } => vec!["MACD".to_string(), "MACD_signal".to_string()],
            IndicatorType::Bollinger { .. } => vec!["BB_high".to_string(), "BB_low".to_string()],
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}
