//! Per-interaction request parameters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Period bounds offered by the dashboard widgets.
pub const MIN_PERIOD: usize = 5;
pub const MAX_PERIOD: usize = 100;

pub const DEFAULT_PERIOD: usize = 20;

/// Which indicators to derive and plot, with their window sizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorOptions {
    pub show_sma: bool,
    pub sma_period: usize,
    pub show_ema: bool,
    pub ema_period: usize,
    pub show_bollinger: bool,
    pub show_rsi: bool,
    pub show_macd: bool,
}

impl IndicatorOptions {
    /// Every indicator switched off.
    pub fn none() -> Self {
        Self {
            show_sma: false,
            show_ema: false,
            ..Self::default()
        }
    }
}

impl Default for IndicatorOptions {
    fn default() -> Self {
        Self {
            show_sma: true,
            sma_period: DEFAULT_PERIOD,
            show_ema: false,
            ema_period: DEFAULT_PERIOD,
            show_bollinger: false,
            show_rsi: false,
            show_macd: false,
        }
    }
}

/// Everything one fetch → derive → render cycle needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub indicators: IndicatorOptions,
}

impl DashboardRequest {
    pub fn new(ticker: &str, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            ticker: normalize_ticker(ticker),
            start_date,
            end_date,
            indicators: IndicatorOptions::default(),
        }
    }

    pub fn with_indicators(mut self, indicators: IndicatorOptions) -> Self {
        self.indicators = indicators;
        self
    }
}

pub const MAX_TICKER_LEN: usize = 15;

pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

/// True when `symbol` is 1 to 15 letters, digits or `.^=-`.
pub fn is_valid_symbol(symbol: &str) -> bool {
    (1..=MAX_TICKER_LEN).contains(&symbol.len())
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '^' | '=' | '-'))
}

/// Normalizes `ticker` and rejects anything that is not a plain symbol.
pub fn validate_ticker(ticker: &str) -> Result<String, String> {
    let symbol = normalize_ticker(ticker);
    if is_valid_symbol(&symbol) {
        Ok(symbol)
    } else {
        Err(format!(
            "invalid ticker {:?}: expected 1 to {MAX_TICKER_LEN} letters, digits or .^=-",
            ticker.trim()
        ))
    }
}

/// Checks a window size against the widget bounds.
pub fn validate_period(period: usize) -> Result<usize, String> {
    if (MIN_PERIOD..=MAX_PERIOD).contains(&period) {
        Ok(period)
    } else {
        Err(format!(
            "period must be between {MIN_PERIOD} and {MAX_PERIOD}, got {period}"
        ))
    }
}
