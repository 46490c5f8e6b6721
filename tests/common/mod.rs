#![allow(dead_code)]

use chrono::NaiveDate;
use stockdash::domain::error::{DashboardError, ProviderError};
use stockdash::domain::ohlcv::{ColumnLabel, RawTable};
use stockdash::domain::presentation::DashboardView;
use stockdash::ports::chart_port::ChartPort;
use stockdash::ports::data_port::DataPort;
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory provider keyed by ticker, filtering rows to the requested window.
pub struct MockDataPort {
    pub data: HashMap<String, RawTable>,
    pub errors: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_table(mut self, ticker: &str, table: RawTable) -> Self {
        self.data.insert(ticker.to_string(), table);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl DataPort for MockDataPort {
    fn fetch_daily(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RawTable, ProviderError> {
        self.calls.lock().unwrap().push(ticker.to_string());
        if let Some(reason) = self.errors.get(ticker) {
            return Err(ProviderError::Http(reason.clone()));
        }
        let Some(table) = self.data.get(ticker) else {
            return Ok(RawTable::empty());
        };

        let keep: Vec<usize> = table
            .index
            .iter()
            .enumerate()
            .filter(|(_, d)| **d >= start_date && **d < end_date)
            .map(|(i, _)| i)
            .collect();
        Ok(RawTable {
            index: keep.iter().map(|&i| table.index[i]).collect(),
            columns: table.columns.clone(),
            values: table
                .values
                .iter()
                .map(|col| keep.iter().map(|&i| col[i]).collect())
                .collect(),
        })
    }
}

/// Sink that records everything it is shown.
#[derive(Default)]
pub struct RecordingSink {
    pub views: Vec<DashboardView>,
    pub errors: Vec<String>,
    pub flushes: usize,
}

impl ChartPort for RecordingSink {
    fn show_charts(&mut self, view: &DashboardView) -> Result<(), DashboardError> {
        self.views.push(view.clone());
        Ok(())
    }

    fn show_error(&mut self, message: &str) -> Result<(), DashboardError> {
        self.errors.push(message.to_string());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), DashboardError> {
        self.flushes += 1;
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Deterministic wavy close series starting at `start_price`.
pub fn wavy_closes(count: usize, start_price: f64) -> Vec<f64> {
    (0..count)
        .map(|i| start_price + i as f64 * 0.3 + (i as f64 * 0.45).sin() * 4.0)
        .collect()
}

/// One row per calendar day from `start_date`, columns labeled
/// `[field, ticker]` the way the live provider returns them.
pub fn generate_table(ticker: &str, start_date: &str, count: usize, start_price: f64) -> RawTable {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    let closes = wavy_closes(count, start_price);
    table_from_closes(ticker, start, &closes)
}

pub fn table_from_closes(ticker: &str, start: NaiveDate, closes: &[f64]) -> RawTable {
    let mut table = RawTable {
        index: (0..closes.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect(),
        ..RawTable::default()
    };
    let column = |f: fn(f64) -> f64| -> Vec<Option<f64>> {
        closes.iter().map(|&c| Some(f(c))).collect()
    };
    table.push_column(ColumnLabel::nested(["Open", ticker]), column(|c| c - 0.5));
    table.push_column(ColumnLabel::nested(["High", ticker]), column(|c| c + 1.0));
    table.push_column(ColumnLabel::nested(["Low", ticker]), column(|c| c - 1.0));
    table.push_column(ColumnLabel::nested(["Close", ticker]), column(|c| c));
    table.push_column(ColumnLabel::nested(["Volume", ticker]), column(|_| 1_000_000.0));
    table
}

/// A table without any `Close` column.
pub fn table_without_close(ticker: &str, start: NaiveDate, count: usize) -> RawTable {
    let mut table = RawTable {
        index: (0..count)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect(),
        ..RawTable::default()
    };
    table.push_column(
        ColumnLabel::nested(["Open", ticker]),
        vec![Some(10.0); count],
    );
    table
}
