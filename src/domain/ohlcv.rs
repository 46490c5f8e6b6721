//! Daily OHLCV table as returned by a market-data provider.
//!
//! Column labels may be hierarchical: a provider that returns several
//! tickers at once labels each column `[field, ticker]`. Values are
//! `Option<f64>`; `None` stands for a missing provider value.

use chrono::NaiveDate;

pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";
pub const ADJ_CLOSE: &str = "Adj Close";
pub const VOLUME: &str = "Volume";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLabel {
    pub levels: Vec<String>,
}

impl ColumnLabel {
    pub fn flat(name: impl Into<String>) -> Self {
        Self {
            levels: vec![name.into()],
        }
    }

    pub fn nested<I, S>(levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            levels: levels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_nested(&self) -> bool {
        self.levels.len() > 1
    }

    /// First level of the label, or an empty string for an empty label.
    pub fn first_level(&self) -> &str {
        self.levels.first().map(String::as_str).unwrap_or("")
    }
}

/// Column-major table of daily rows.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub index: Vec<NaiveDate>,
    pub columns: Vec<ColumnLabel>,
    /// `values[c][r]` is the value of column `c` on `index[r]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl RawTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty() || self.columns.is_empty()
    }

    pub fn has_nested_columns(&self) -> bool {
        self.columns.iter().any(ColumnLabel::is_nested)
    }

    /// Appends a column; the value vector must match the index length.
    pub fn push_column(&mut self, label: ColumnLabel, values: Vec<Option<f64>>) {
        debug_assert_eq!(values.len(), self.index.len());
        self.columns.push(label);
        self.values.push(values);
    }
}
