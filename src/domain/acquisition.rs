//! Data acquisition stage: provider table → validated time series.

use crate::domain::error::DashboardError;
use crate::domain::ohlcv::{RawTable, CLOSE};
use crate::domain::series::{Column, TimeSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// Fetches daily rows for `ticker` and normalizes them into a [`TimeSeries`].
///
/// Provider errors are not retried; they are reported as
/// [`DashboardError::Fetch`] with the provider's message.
pub fn fetch(
    port: &dyn DataPort,
    ticker: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<TimeSeries, DashboardError> {
    info!(%ticker, %start_date, %end_date, "fetching daily prices");

    let table = port
        .fetch_daily(ticker, start_date, end_date)
        .map_err(|e| {
            warn!(%ticker, error = %e, "provider request failed");
            DashboardError::Fetch {
                ticker: ticker.to_string(),
                reason: e.to_string(),
            }
        })?;

    if table.is_empty() {
        warn!(%ticker, "provider returned no rows");
        return Err(DashboardError::NoData {
            ticker: ticker.to_string(),
        });
    }

    let series = normalize(table);
    if !series.has_column(CLOSE) {
        warn!(%ticker, columns = ?series.column_names(), "no close column");
        return Err(DashboardError::MissingClose {
            ticker: ticker.to_string(),
        });
    }

    debug!(%ticker, rows = series.len(), "acquired series");
    Ok(series)
}

/// Flattens hierarchical labels and orders rows by date.
///
/// A nested label keeps only its first level. When flattening makes two
/// columns share a name, the first one wins.
pub fn normalize(table: RawTable) -> TimeSeries {
    let flatten = table.has_nested_columns();
    let mut columns: Vec<Column> = Vec::with_capacity(table.columns.len());

    for (label, values) in table.columns.into_iter().zip(table.values) {
        let name = if flatten {
            label.first_level().to_string()
        } else {
            label.levels.join(" ")
        };
        if columns.iter().any(|c| c.name == name) {
            continue;
        }
        columns.push(Column { name, values });
    }

    TimeSeries::from_rows(table.index, columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ProviderError;
    use crate::domain::ohlcv::ColumnLabel;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    struct FixedPort(Result<RawTable, String>);

    impl DataPort for FixedPort {
        fn fetch_daily(
            &self,
            _ticker: &str,
            _start_date: NaiveDate,
            _end_date: NaiveDate,
        ) -> Result<RawTable, ProviderError> {
            match &self.0 {
                Ok(t) => Ok(t.clone()),
                Err(e) => Err(ProviderError::Http(e.clone())),
            }
        }
    }

    fn table(labels: Vec<ColumnLabel>) -> RawTable {
        let mut t = RawTable {
            index: vec![d(2), d(3)],
            ..RawTable::default()
        };
        for (i, label) in labels.into_iter().enumerate() {
            t.push_column(label, vec![Some(i as f64), Some(i as f64 + 1.0)]);
        }
        t
    }

    #[test]
    fn flattens_nested_columns_to_first_level() {
        let t = table(vec![
            ColumnLabel::nested(["Close", "AAPL"]),
            ColumnLabel::nested(["Volume", "AAPL"]),
        ]);
        let series = normalize(t);
        assert_eq!(series.column_names(), vec!["Close", "Volume"]);
    }

    #[test]
    fn flat_columns_keep_their_names() {
        let series = normalize(table(vec![ColumnLabel::flat("Adj Close")]));
        assert_eq!(series.column_names(), vec!["Adj Close"]);
    }

    #[test]
    fn fetch_success() {
        let port = FixedPort(Ok(table(vec![ColumnLabel::nested(["Close", "AAPL"])])));
        let series = fetch(&port, "AAPL", d(1), d(31)).unwrap();
        assert_eq!(series.len(), 2);
        assert!(series.close().is_some());
    }

    #[test]
    fn fetch_empty_is_no_data() {
        let port = FixedPort(Ok(RawTable::empty()));
        let err = fetch(&port, "ZZZINVALID", d(1), d(31)).unwrap_err();
        assert!(matches!(err, DashboardError::NoData { ref ticker } if ticker == "ZZZINVALID"));
    }

    #[test]
    fn fetch_without_close_is_missing_field() {
        let port = FixedPort(Ok(table(vec![ColumnLabel::nested(["Open", "AAPL"])])));
        let err = fetch(&port, "AAPL", d(1), d(31)).unwrap_err();
        assert!(matches!(err, DashboardError::MissingClose { .. }));
    }

    #[test]
    fn provider_error_becomes_fetch_failure() {
        let port = FixedPort(Err("dns lookup failed".into()));
        let err = fetch(&port, "MSFT", d(1), d(31)).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("MSFT"));
        assert!(msg.contains("dns lookup failed"));
    }
}
