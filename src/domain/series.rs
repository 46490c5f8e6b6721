//! Date-ordered time series with named numeric columns.

use crate::domain::ohlcv::CLOSE;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Daily rows keyed by strictly increasing dates.
///
/// Every column holds exactly one value slot per date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    dates: Vec<NaiveDate>,
    columns: Vec<Column>,
}

impl TimeSeries {
    /// Builds a series from rows that may be unordered or repeat dates.
    ///
    /// Rows are sorted by date; a repeated date keeps its first row.
    pub fn from_rows(dates: Vec<NaiveDate>, columns: Vec<Column>) -> Self {
        let mut order: Vec<usize> = (0..dates.len()).collect();
        order.sort_by_key(|&i| dates[i]);
        order.dedup_by_key(|i| dates[*i]);

        let sorted_dates = order.iter().map(|&i| dates[i]).collect();
        let columns = columns
            .into_iter()
            .map(|c| Column {
                values: order
                    .iter()
                    .map(|&i| c.values.get(i).copied().flatten())
                    .collect(),
                name: c.name,
            })
            .collect();

        Self {
            dates: sorted_dates,
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub fn close(&self) -> Option<&[Option<f64>]> {
        self.column(CLOSE)
    }

    /// Closing prices with absent values skipped.
    pub fn close_values(&self) -> Vec<f64> {
        self.close()
            .map(|c| c.iter().flatten().copied().collect())
            .unwrap_or_default()
    }

    /// Adds or replaces a column. `values` must have one slot per date.
    pub fn set_column(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) {
        let name = name.into();
        debug_assert_eq!(values.len(), self.dates.len(), "column {name} length");
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.values = values,
            None => self.columns.push(Column { name, values }),
        }
    }

    /// Drops every row whose closing price is absent.
    pub fn drop_missing_close(self) -> Self {
        let Some(close) = self.close() else {
            return Self {
                dates: Vec::new(),
                columns: self
                    .columns
                    .into_iter()
                    .map(|c| Column {
                        name: c.name,
                        values: Vec::new(),
                    })
                    .collect(),
            };
        };

        let keep: Vec<bool> = close.iter().map(Option::is_some).collect();
        if keep.iter().all(|&k| k) {
            return self;
        }

        let dates = self
            .dates
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(d, _)| *d)
            .collect();
        let columns = self
            .columns
            .into_iter()
            .map(|c| Column {
                values: c
                    .values
                    .into_iter()
                    .zip(&keep)
                    .filter(|(_, k)| **k)
                    .map(|(v, _)| v)
                    .collect(),
                name: c.name,
            })
            .collect();

        Self { dates, columns }
    }
}
