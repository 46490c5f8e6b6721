//! HTTP request handlers for web adapter.

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::adapters::html_report_adapter::{ChartPanel, chart_panels};
use crate::domain::error::DashboardError;
use crate::domain::options::{DashboardRequest, IndicatorOptions, validate_period, validate_ticker};
use crate::domain::pipeline::{self, failure_messages};
use crate::domain::presentation::DashboardView;

use super::templates::DashboardTemplate;
use super::{AppState, WebError, is_htmx_request};

/// Query string of every dashboard endpoint.
///
/// A request carrying `ticker` is treated as a form submission: unchecked
/// indicator boxes are simply absent, so a missing flag means off. Without
/// `ticker`, missing flags fall back to the server defaults.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    pub ticker: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub sma: Option<bool>,
    pub sma_period: Option<usize>,
    pub ema: Option<bool>,
    pub ema_period: Option<usize>,
    pub bollinger: Option<bool>,
    pub rsi: Option<bool>,
    pub macd: Option<bool>,
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, WebError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| WebError::bad_request(format!("Invalid {field} date: {value}")))
}

impl DashboardQuery {
    pub fn into_request(self, defaults: &DashboardRequest) -> Result<DashboardRequest, WebError> {
        let submitted = self.ticker.is_some();
        let ticker = match self.ticker.as_deref() {
            Some(t) => validate_ticker(t).map_err(WebError::bad_request)?,
            None => defaults.ticker.clone(),
        };

        let start_date = match &self.start {
            Some(s) => parse_date(s, "start")?,
            None => defaults.start_date,
        };
        let end_date = match &self.end {
            Some(s) => parse_date(s, "end")?,
            None => defaults.end_date,
        };

        let base = &defaults.indicators;
        let flag = |value: Option<bool>, default: bool| value.unwrap_or(!submitted && default);
        let period = |value: Option<usize>, default: usize| match value {
            Some(p) => validate_period(p).map_err(WebError::bad_request),
            None => Ok(default),
        };

        let indicators = IndicatorOptions {
            show_sma: flag(self.sma, base.show_sma),
            sma_period: period(self.sma_period, base.sma_period)?,
            show_ema: flag(self.ema, base.show_ema),
            ema_period: period(self.ema_period, base.ema_period)?,
            show_bollinger: flag(self.bollinger, base.show_bollinger),
            show_rsi: flag(self.rsi, base.show_rsi),
            show_macd: flag(self.macd, base.show_macd),
        };

        Ok(DashboardRequest::new(&ticker, start_date, end_date).with_indicators(indicators))
    }
}

async fn run_pipeline(
    state: &AppState,
    request: DashboardRequest,
) -> Result<Result<DashboardView, DashboardError>, WebError> {
    let port = Arc::clone(&state.data_port);
    tokio::task::spawn_blocking(move || pipeline::run(port.as_ref(), &request))
        .await
        .map_err(|e| WebError::internal(format!("dashboard task failed: {e}")))
}

struct Outcome {
    panels: Vec<ChartPanel>,
    errors: Vec<String>,
}

async fn build_outcome(state: &AppState, request: DashboardRequest) -> Result<Outcome, WebError> {
    let outcome = match run_pipeline(state, request).await? {
        Ok(view) => Outcome {
            panels: chart_panels(&view),
            errors: Vec::new(),
        },
        Err(err) => Outcome {
            panels: Vec::new(),
            errors: failure_messages(&err),
        },
    };
    Ok(outcome)
}

fn render_page(
    request: &DashboardRequest,
    outcome: &Outcome,
    fragment_only: bool,
) -> Result<Response, WebError> {
    let template = DashboardTemplate::new(
        &request.ticker,
        request.start_date.to_string(),
        request.end_date.to_string(),
        &request.indicators,
        &outcome.panels,
        &outcome.errors,
    );
    let rendered = if fragment_only {
        template.fragment()
    } else {
        askama::Template::render(&template)
    };
    let html = rendered.map_err(|e| WebError::internal(e.to_string()))?;
    Ok(Html(html).into_response())
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, WebError> {
    let request = query.into_request(&state.defaults)?;
    debug!(ticker = %request.ticker, "dashboard requested");
    let outcome = build_outcome(&state, request.clone()).await?;
    render_page(&request, &outcome, is_htmx_request(&headers))
}

pub async fn charts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, WebError> {
    let request = query.into_request(&state.defaults)?;
    let outcome = build_outcome(&state, request.clone()).await?;
    render_page(&request, &outcome, true)
}

pub async fn api_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, WebError> {
    let request = query.into_request(&state.defaults)?;
    match run_pipeline(&state, request).await? {
        Ok(view) => Ok(Json(view).into_response()),
        Err(err) => {
            let status = super::error::status_from_error(&err);
            let body = serde_json::json!({ "errors": failure_messages(&err) });
            Ok((status, Json(body)).into_response())
        }
    }
}

pub async fn not_found() -> Response {
    WebError::new(StatusCode::NOT_FOUND, "Page not found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> DashboardRequest {
        DashboardRequest::new(
            "AAPL",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
    }

    #[test]
    fn empty_query_uses_defaults() {
        let request = DashboardQuery::default().into_request(&defaults()).unwrap();
        assert_eq!(request, defaults());
    }

    #[test]
    fn submitted_form_treats_missing_boxes_as_off() {
        let query = DashboardQuery {
            ticker: Some("tsla".into()),
            rsi: Some(true),
            ..DashboardQuery::default()
        };
        let request = query.into_request(&defaults()).unwrap();
        assert_eq!(request.ticker, "TSLA");
        assert!(!request.indicators.show_sma);
        assert!(request.indicators.show_rsi);
    }

    #[test]
    fn out_of_range_period_is_rejected() {
        let query = DashboardQuery {
            sma_period: Some(2),
            ..DashboardQuery::default()
        };
        let err = query.into_request(&defaults()).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn path_like_ticker_is_rejected() {
        for ticker in ["../secret", "/etc/passwd", "AAPL?interval=1m", ""] {
            let query = DashboardQuery {
                ticker: Some(ticker.into()),
                ..DashboardQuery::default()
            };
            let err = query.into_request(&defaults()).unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST, "{ticker:?}");
        }
    }

    #[test]
    fn malformed_date_is_rejected() {
        let query = DashboardQuery {
            start: Some("01/02/2024".into()),
            ..DashboardQuery::default()
        };
        let err = query.into_request(&defaults()).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("start"));
    }
}
