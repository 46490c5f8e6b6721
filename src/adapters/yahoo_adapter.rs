//! Yahoo Finance chart API market-data adapter.
//!
//! Issues one blocking `GET <base_url>/v8/finance/chart/<TICKER>` per fetch
//! and labels every column `[field, TICKER]`.

use crate::domain::error::ProviderError;
use crate::domain::ohlcv::{ADJ_CLOSE, CLOSE, ColumnLabel, HIGH, LOW, OPEN, RawTable, VOLUME};
use crate::domain::options::is_valid_symbol;
use crate::ports::data_port::DataPort;
use chrono::{DateTime, NaiveDate, NaiveTime};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = concat!("stockdash/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartFault>,
}

#[derive(Debug, Deserialize)]
struct ChartFault {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    #[serde(default)]
    adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

pub struct YahooAdapter {
    base_url: Url,
    client: Client,
}

impl YahooAdapter {
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Builds an adapter against another chart API host, e.g. a local mock.
    pub fn with_base_url(base_url: impl AsRef<str>) -> Result<Self, ProviderError> {
        let base_url = base_url.as_ref();
        let parsed = Url::parse(base_url)
            .map_err(|e| ProviderError::Http(format!("invalid base url {base_url:?}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ProviderError::Http(format!(
                "invalid base url {base_url:?}: not a hierarchical URL"
            )));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        Ok(Self {
            base_url: parsed,
            client,
        })
    }

    /// Chart endpoint for `ticker`; the symbol is percent-encoded as a single
    /// path segment.
    fn chart_url(&self, ticker: &str, start_date: NaiveDate, end_date: NaiveDate) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v8", "finance", "chart", ticker]);
        }
        url.query_pairs_mut()
            .append_pair("period1", &midnight_utc(start_date).to_string())
            .append_pair("period2", &midnight_utc(end_date).to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "history");
        url
    }
}

impl DataPort for YahooAdapter {
    #[instrument(skip(self), name = "yahoo::fetch_daily")]
    fn fetch_daily(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RawTable, ProviderError> {
        if !is_valid_symbol(ticker) {
            return Err(ProviderError::InvalidTicker(ticker.to_string()));
        }
        if start_date >= end_date {
            return Ok(RawTable::empty());
        }

        let url = self.chart_url(ticker, start_date, end_date);
        debug!(%url, "requesting chart");

        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ProviderError::Http(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| ProviderError::Http(e.to_string()))?;

        match parse_chart(&body, ticker, start_date, end_date) {
            Ok(table) => Ok(table),
            Err(_) if !status.is_success() => {
                warn!(status = status.as_u16(), "chart request rejected");
                Err(ProviderError::Status {
                    status: status.as_u16(),
                    body,
                })
            }
            Err(e) => Err(e),
        }
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Decodes a chart API response body into a table with
/// `start_date <= date < end_date`.
pub fn parse_chart(
    body: &str,
    ticker: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<RawTable, ProviderError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;

    if let Some(fault) = envelope.chart.error {
        if fault.code == "Not Found" {
            debug!(ticker, description = %fault.description, "unknown symbol");
            return Ok(RawTable::empty());
        }
        return Err(ProviderError::Decode(format!(
            "{}: {}",
            fault.code, fault.description
        )));
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(RawTable::empty());
    };

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose);

    let mut fields: Vec<(&str, Vec<Option<f64>>)> = vec![
        (OPEN, quote.open),
        (HIGH, quote.high),
        (LOW, quote.low),
        (CLOSE, quote.close),
    ];
    if let Some(adj) = adjclose {
        fields.push((ADJ_CLOSE, adj));
    }
    fields.push((VOLUME, quote.volume));

    let mut table = RawTable::empty();
    let mut keep = Vec::with_capacity(result.timestamp.len());
    for (row, ts) in result.timestamp.iter().enumerate() {
        let date = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0)
            .ok_or_else(|| ProviderError::Decode(format!("timestamp {} out of range", ts)))?
            .date_naive();
        if date >= start_date && date < end_date {
            table.index.push(date);
            keep.push(row);
        }
    }

    for (field, values) in fields {
        let column = keep
            .iter()
            .map(|&row| values.get(row).copied().flatten())
            .collect();
        table.push_column(ColumnLabel::nested([field, ticker]), column);
    }

    debug!(ticker, rows = table.row_count(), "decoded chart");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // 2024-01-02 and 2024-01-03, 09:30 New York time.
    const BODY: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL", "gmtoffset": -18000},
                "timestamp": [1704205800, 1704292200],
                "indicators": {
                    "quote": [{
                        "open": [187.15, 184.22],
                        "high": [188.44, 185.88],
                        "low": [183.89, 183.43],
                        "close": [185.64, null],
                        "volume": [82488700, 58414500]
                    }],
                    "adjclose": [{"adjclose": [184.93, 183.55]}]
                }
            }],
            "error": null
        }
    }"#;

    #[test]
    fn decodes_quote_columns_with_ticker_level() {
        let table = parse_chart(BODY, "AAPL", date(2024, 1, 1), date(2024, 2, 1)).unwrap();

        assert_eq!(table.index, vec![date(2024, 1, 2), date(2024, 1, 3)]);
        assert!(table.has_nested_columns());
        let names: Vec<&str> = table.columns.iter().map(|c| c.first_level()).collect();
        assert_eq!(names, vec!["Open", "High", "Low", "Close", "Adj Close", "Volume"]);
        assert_eq!(table.columns[3].levels[1], "AAPL");
        assert_eq!(table.values[3], vec![Some(185.64), None]);
    }

    #[test]
    fn rows_on_end_date_are_excluded() {
        let table = parse_chart(BODY, "AAPL", date(2024, 1, 1), date(2024, 1, 3)).unwrap();
        assert_eq!(table.index, vec![date(2024, 1, 2)]);
        assert_eq!(table.values[0].len(), 1);
    }

    #[test]
    fn not_found_is_empty_table() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let table = parse_chart(body, "ZZZINVALID", date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn other_fault_is_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input"}}}"#;
        let err = parse_chart(body, "AAPL", date(2024, 1, 1), date(2024, 2, 1)).unwrap_err();
        assert!(err.to_string().contains("Bad Request"));
    }

    #[test]
    fn empty_result_without_timestamps_is_empty_table() {
        let body = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let table = parse_chart(body, "AAPL", date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn garbage_body_is_decode_error() {
        let err = parse_chart("<html>", "AAPL", date(2024, 1, 1), date(2024, 2, 1)).unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[test]
    fn chart_url_uses_midnight_bounds() {
        let adapter = YahooAdapter::with_base_url("http://localhost:9000/").unwrap();
        let url = adapter.chart_url("MSFT", date(2024, 1, 1), date(2024, 1, 2));
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/v8/finance/chart/MSFT?period1=1704067200&period2=1704153600&interval=1d&events=history"
        );
    }

    #[test]
    fn chart_url_keeps_base_path_prefix() {
        let adapter = YahooAdapter::with_base_url("http://localhost:9000/mock").unwrap();
        let url = adapter.chart_url("MSFT", date(2024, 1, 1), date(2024, 1, 2));
        assert_eq!(url.path(), "/mock/v8/finance/chart/MSFT");
    }

    #[test]
    fn chart_url_encodes_ticker_as_one_segment() {
        let adapter = YahooAdapter::with_base_url(DEFAULT_BASE_URL).unwrap();
        let url = adapter.chart_url("A/B?C#D", date(2024, 1, 1), date(2024, 1, 2));

        assert_eq!(url.path(), "/v8/finance/chart/A%2FB%3FC%23D");
        assert_eq!(url.fragment(), None);
        let keys: Vec<String> = url.query_pairs().map(|(k, _)| k.into_owned()).collect();
        assert_eq!(keys, vec!["period1", "period2", "interval", "events"]);
    }

    #[test]
    fn unsafe_ticker_is_rejected_before_request() {
        let adapter = YahooAdapter::with_base_url("http://127.0.0.1:9").unwrap();
        let err = adapter
            .fetch_daily("../v7/quote", date(2024, 1, 1), date(2024, 1, 2))
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidTicker(_)));
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        assert!(YahooAdapter::with_base_url("not a url").is_err());
        assert!(YahooAdapter::with_base_url("mailto:someone@example.com").is_err());
    }
}
