//! Presentation stage: builds chart specifications from a derived series.

use crate::domain::derivation::{BOLLINGER, MACD, RSI};
use crate::domain::error::DashboardError;
use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::CLOSE;
use crate::domain::options::IndicatorOptions;
use crate::domain::series::TimeSeries;
use crate::ports::chart_port::ChartPort;
use chrono::NaiveDate;
use serde::Serialize;

pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

pub const RSI_SECTION: &str = "Relative Strength Index (RSI)";
pub const MACD_SECTION: &str = "MACD Indicator";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDash {
    Solid,
    Dot,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub color: &'static str,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

/// Horizontal line at a fixed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub y: f64,
    pub color: &'static str,
    pub dash: LineDash,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Heading shown above the chart, if any.
    pub section: Option<String>,
    pub title: Option<String>,
    pub x_axis_title: Option<String>,
    pub y_axis_title: Option<String>,
    pub theme: Theme,
    pub traces: Vec<Trace>,
    pub reference_lines: Vec<ReferenceLine>,
}

impl ChartSpec {
    fn new(section: Option<&str>, title: Option<String>) -> Self {
        Self {
            section: section.map(str::to_string),
            title,
            x_axis_title: None,
            y_axis_title: None,
            theme: Theme::Dark,
            traces: Vec::new(),
            reference_lines: Vec::new(),
        }
    }

    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|t| t.name == name)
    }
}

/// All charts produced by one interaction, primary chart first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub ticker: String,
    pub charts: Vec<ChartSpec>,
}

impl DashboardView {
    pub fn primary(&self) -> &ChartSpec {
        &self.charts[0]
    }

    pub fn chart(&self, section: &str) -> Option<&ChartSpec> {
        self.charts
            .iter()
            .find(|c| c.section.as_deref() == Some(section))
    }

    pub fn to_json(&self) -> Result<String, DashboardError> {
        serde_json::to_string(self).map_err(|e| DashboardError::Render {
            reason: e.to_string(),
        })
    }
}

/// Builds the price chart plus the RSI and MACD charts that apply.
///
/// An indicator is drawn only when it is enabled in `options` and its
/// columns are present in `series`.
pub fn build_dashboard(series: &TimeSeries, ticker: &str, options: &IndicatorOptions) -> DashboardView {
    let dates = series.dates();
    let line = |name: String, column: &str, color: &'static str| -> Option<Trace> {
        series.column(column).map(|values| Trace {
            name,
            color,
            dates: dates.to_vec(),
            values: values.to_vec(),
        })
    };
    let present = |indicator: &IndicatorType| -> bool {
        indicator
            .column_names()
            .iter()
            .all(|c| series.has_column(c))
    };

    let mut price = ChartSpec::new(None, Some(format!("{ticker} Stock Price")));
    price.x_axis_title = Some("Date".to_string());
    price.y_axis_title = Some("Price".to_string());
    price
        .traces
        .extend(line("Close Price".to_string(), CLOSE, "blue"));

    if options.show_sma {
        let period = options.sma_period;
        price.traces.extend(line(
            format!("SMA {period}"),
            &format!("SMA_{period}"),
            "orange",
        ));
    }
    if options.show_ema {
        let period = options.ema_period;
        price.traces.extend(line(
            format!("EMA {period}"),
            &format!("EMA_{period}"),
            "green",
        ));
    }
    if options.show_bollinger && present(&BOLLINGER) {
        price
            .traces
            .extend(line("Bollinger High".to_string(), "BB_high", "red"));
        price
            .traces
            .extend(line("Bollinger Low".to_string(), "BB_low", "purple"));
    }

    let mut charts = vec![price];

    if options.show_rsi && present(&RSI) {
        let mut chart = ChartSpec::new(Some(RSI_SECTION), None);
        chart.traces.extend(line("RSI".to_string(), "RSI", "yellow"));
        chart.reference_lines = vec![
            ReferenceLine {
                y: RSI_OVERBOUGHT,
                color: "red",
                dash: LineDash::Dot,
            },
            ReferenceLine {
                y: RSI_OVERSOLD,
                color: "green",
                dash: LineDash::Dot,
            },
        ];
        charts.push(chart);
    }

    if options.show_macd && present(&MACD) {
        let mut chart = ChartSpec::new(Some(MACD_SECTION), None);
        chart.traces.extend(line("MACD".to_string(), "MACD", "cyan"));
        chart
            .traces
            .extend(line("Signal Line".to_string(), "MACD_signal", "magenta"));
        charts.push(chart);
    }

    DashboardView {
        ticker: ticker.to_string(),
        charts,
    }
}

/// Builds the charts and pushes them to `sink`.
pub fn render(
    sink: &mut dyn ChartPort,
    series: &TimeSeries,
    ticker: &str,
    options: &IndicatorOptions,
) -> Result<(), DashboardError> {
    sink.show_charts(&build_dashboard(series, ticker, options))
}
