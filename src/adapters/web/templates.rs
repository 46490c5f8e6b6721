//! HTML templates using Askama.

use askama::Template;

use crate::adapters::html_report_adapter::ChartPanel;
use crate::domain::catalog::STOCKS;
use crate::domain::options::{IndicatorOptions, MAX_PERIOD, MIN_PERIOD};

/// One entry of the stock selector.
pub struct StockOption {
    pub label: &'static str,
    pub ticker: &'static str,
    pub selected: bool,
}

/// Selector entries with `ticker` marked as selected.
pub fn stock_options(ticker: &str) -> Vec<StockOption> {
    STOCKS
        .iter()
        .map(|s| StockOption {
            label: s.label,
            ticker: s.ticker,
            selected: s.ticker.eq_ignore_ascii_case(ticker),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub title: &'a str,
    pub stocks: Vec<StockOption>,
    pub start_date: String,
    pub end_date: String,
    pub options: &'a IndicatorOptions,
    pub min_period: usize,
    pub max_period: usize,
    pub panels: &'a [ChartPanel],
    pub errors: &'a [String],
}

impl<'a> DashboardTemplate<'a> {
    pub fn new(
        ticker: &str,
        start_date: String,
        end_date: String,
        options: &'a IndicatorOptions,
        panels: &'a [ChartPanel],
        errors: &'a [String],
    ) -> Self {
        Self {
            title: "Stock Dashboard",
            stocks: stock_options(ticker),
            start_date,
            end_date,
            options,
            min_period: MIN_PERIOD,
            max_period: MAX_PERIOD,
            panels,
            errors,
        }
    }

    /// The chart area only, for HTMX swaps.
    pub fn fragment(&self) -> Result<String, askama::Error> {
        ChartsTemplate {
            panels: self.panels,
            errors: self.errors,
        }
        .render()
    }
}

#[derive(Template)]
#[template(path = "charts.html")]
pub struct ChartsTemplate<'a> {
    pub panels: &'a [ChartPanel],
    pub errors: &'a [String],
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub status: u16,
}
