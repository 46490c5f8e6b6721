//! Market-data provider port.

use crate::domain::error::ProviderError;
use crate::domain::ohlcv::RawTable;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily rows for `ticker` with `start_date <= date < end_date`.
    ///
    /// An unknown symbol or an empty window yields an empty table rather
    /// than an error.
    fn fetch_daily(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RawTable, ProviderError>;
}
