//! CSV file market-data adapter.
//!
//! Reads `<base_path>/<TICKER>.csv`. The first column holds the date; every
//! other column is a price field. Two header layouts are accepted:
//!
//! ```text
//! Date,Open,High,Low,Close,Volume
//! ```
//!
//! and the multi-row export header, where a `Ticker` row adds a second label
//! level and a `Date` row precedes the data:
//!
//! ```text
//! Price,Close,High,Low,Open,Volume
//! Ticker,AAPL,AAPL,AAPL,AAPL,AAPL
//! Date,,,,,
//! ```

use crate::domain::error::ProviderError;
use crate::domain::ohlcv::{ColumnLabel, RawTable};
use crate::domain::options::is_valid_symbol;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// File for `ticker`, which must be a plain symbol so the path stays
    /// inside `base_path`.
    fn csv_path(&self, ticker: &str) -> Result<PathBuf, ProviderError> {
        if !is_valid_symbol(ticker) {
            return Err(ProviderError::InvalidTicker(ticker.to_string()));
        }
        Ok(self.base_path.join(format!("{}.csv", ticker)))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_daily(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RawTable, ProviderError> {
        let path = self.csv_path(ticker)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no CSV file for ticker");
                return Ok(RawTable::empty());
            }
            Err(e) => return Err(ProviderError::Io(e)),
        };

        parse_table(&content, &path.display().to_string(), start_date, end_date)
    }
}

/// First cells of the extra header rows in the multi-row export.
const HEADER_LABELS: &[&str] = &["Ticker", "Date", "Price"];

fn csv_error(file: &str, reason: impl Into<String>) -> ProviderError {
    ProviderError::Csv {
        file: file.to_string(),
        reason: reason.into(),
    }
}

fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    let day = cell.get(..10).unwrap_or(cell);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_value(cell: &str) -> Result<Option<f64>, String> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") || cell.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|e| format!("invalid value {:?}: {}", cell, e))
}

/// Parses CSV text, keeping rows with `start_date <= date < end_date`.
pub fn parse_table(
    content: &str,
    file: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<RawTable, ProviderError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = Vec::new();
    for result in rdr.records() {
        records.push(result.map_err(|e| csv_error(file, e.to_string()))?);
    }

    let mut rows = records.into_iter().peekable();
    let Some(header) = rows.next() else {
        return Ok(RawTable::empty());
    };

    let width = header.len();
    let mut levels: Vec<Vec<String>> = (1..width)
        .map(|j| vec![header.get(j).unwrap_or("").trim().to_string()])
        .collect();

    while let Some(record) = rows.peek() {
        let first = record.get(0).unwrap_or("").trim();
        if first.eq_ignore_ascii_case("ticker") {
            for (j, level) in levels.iter_mut().enumerate() {
                let extra = record.get(j + 1).unwrap_or("").trim();
                if !extra.is_empty() {
                    level.push(extra.to_string());
                }
            }
        } else if !HEADER_LABELS.iter().any(|l| first.eq_ignore_ascii_case(l)) {
            break;
        }
        rows.next();
    }

    let mut index = Vec::new();
    let mut values: Vec<Vec<Option<f64>>> = vec![Vec::new(); levels.len()];

    for (line, record) in rows.enumerate() {
        let date_cell = record.get(0).unwrap_or("");
        let date = parse_date(date_cell)
            .ok_or_else(|| csv_error(file, format!("invalid date {:?} in data row {}", date_cell, line + 1)))?;

        if date < start_date || date >= end_date {
            continue;
        }

        index.push(date);
        for (j, column) in values.iter_mut().enumerate() {
            let cell = record.get(j + 1).unwrap_or("");
            column.push(parse_value(cell).map_err(|reason| csv_error(file, reason))?);
        }
    }

    debug!(file, rows = index.len(), "parsed CSV");

    Ok(RawTable {
        index,
        columns: levels.into_iter().map(ColumnLabel::nested).collect(),
        values,
    })
}
