//! Indicator derivation stage: appends indicator columns to a series.
//!
//! Each enabled indicator is computed only when the series has more rows than
//! the indicator's window. Otherwise it is skipped without error.

use crate::domain::indicator::{
    bollinger, calculate_bollinger, calculate_ema, calculate_macd, calculate_rsi, calculate_sma,
    macd, rsi, IndicatorType,
};
use crate::domain::options::IndicatorOptions;
use crate::domain::series::TimeSeries;
use tracing::debug;

pub const BOLLINGER: IndicatorType = IndicatorType::Bollinger {
    period: bollinger::DEFAULT_PERIOD,
    stddev_mult_x100: bollinger::DEFAULT_STDDEV_MULT_X100,
};
pub const RSI: IndicatorType = IndicatorType::Rsi(rsi::DEFAULT_PERIOD);
pub const MACD: IndicatorType = IndicatorType::Macd {
    fast: macd::DEFAULT_FAST,
    slow: macd::DEFAULT_SLOW,
    signal: macd::DEFAULT_SIGNAL,
};

/// Indicators requested by `options`, in plotting order.
pub fn requested_indicators(options: &IndicatorOptions) -> Vec<IndicatorType> {
    let mut out = Vec::new();
    if options.show_sma {
        out.push(IndicatorType::Sma(options.sma_period));
    }
    if options.show_ema {
        out.push(IndicatorType::Ema(options.ema_period));
    }
    if options.show_bollinger {
        out.push(BOLLINGER);
    }
    if options.show_rsi {
        out.push(RSI);
    }
    if options.show_macd {
        out.push(MACD);
    }
    out
}

/// Returns the series with indicator columns appended, or `None` when there
/// is nothing to derive from.
pub fn derive(series: Option<TimeSeries>, options: &IndicatorOptions) -> Option<TimeSeries> {
    let series = series.filter(|s| !s.is_empty())?;
    let mut series = series.drop_missing_close();
    if series.is_empty() {
        return None;
    }

    let closes = series.close_values();
    let rows = closes.len();

    for indicator in requested_indicators(options) {
        if rows <= indicator.required_window() {
            debug!(%indicator, rows, "not enough rows, skipping");
            continue;
        }
        append(&mut series, &closes, &indicator);
    }

    Some(series)
}

fn append(series: &mut TimeSeries, closes: &[f64], indicator: &IndicatorType) {
    let names = indicator.column_names();
    match indicator {
        IndicatorType::Sma(period) => {
            series.set_column(&names[0], calculate_sma(closes, *period));
        }
        IndicatorType::Ema(period) => {
            series.set_column(&names[0], calculate_ema(closes, *period));
        }
        IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        } => {
            let bands = calculate_bollinger(closes, *period, *stddev_mult_x100);
            series.set_column(&names[0], bands.upper);
            series.set_column(&names[1], bands.lower);
        }
        IndicatorType::Rsi(period) => {
            series.set_column(&names[0], calculate_rsi(closes, *period));
        }
        IndicatorType::Macd { fast, slow, signal } => {
            let lines = calculate_macd(closes, *fast, *slow, *signal);
            series.set_column(&names[0], lines.line);
            series.set_column(&names[1], lines.signal);
        }
    }
    debug!(%indicator, "derived");
}
