//! Web dashboard adapter.
//!
//! Axum server with an HTMX-driven page: the sidebar form re-requests the
//! chart fragment on every change, and each request runs the whole
//! fetch → derive → render cycle from scratch.

mod error;
mod handlers;
mod templates;

pub use error::WebError;
pub use handlers::*;
pub use templates::*;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::domain::options::DashboardRequest;
use crate::ports::data_port::DataPort;

pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    /// Selection used for any parameter a request leaves out.
    pub defaults: DashboardRequest,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::dashboard))
        .route("/charts", get(handlers::charts))
        .route("/api/dashboard", get(handlers::api_dashboard))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

fn is_htmx_request(headers: &axum::http::HeaderMap) -> bool {
    headers.get("HX-Request").is_some()
}
