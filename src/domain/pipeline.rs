//! fetch → derive → render, one full pass per interaction.

use crate::domain::acquisition;
use crate::domain::derivation::derive;
use crate::domain::error::DashboardError;
use crate::domain::options::DashboardRequest;
use crate::domain::presentation::{build_dashboard, DashboardView};
use crate::ports::chart_port::ChartPort;
use crate::ports::data_port::DataPort;
use tracing::{info, warn};

/// Shown after any acquisition failure.
pub const FETCH_FAILED_HINT: &str =
    "Failed to fetch stock data. Check the ticker symbol or try again later.";

/// Runs all three stages and returns the charts to display.
pub fn run(port: &dyn DataPort, request: &DashboardRequest) -> Result<DashboardView, DashboardError> {
    let series = acquisition::fetch(
        port,
        &request.ticker,
        request.start_date,
        request.end_date,
    )?;
    let derived = derive(Some(series), &request.indicators).ok_or(DashboardError::NoValidData)?;
    let view = build_dashboard(&derived, &request.ticker, &request.indicators);
    info!(
        ticker = %request.ticker,
        rows = derived.len(),
        charts = view.charts.len(),
        "dashboard built"
    );
    Ok(view)
}

/// Runs the pipeline and pushes either the charts or the failure messages to
/// `sink`.
///
/// Data failures are reported through the sink and handed back as
/// `Ok(Some(err))`; `Err` is reserved for failures of the sink itself.
pub fn run_interaction(
    port: &dyn DataPort,
    sink: &mut dyn ChartPort,
    request: &DashboardRequest,
) -> Result<Option<DashboardError>, DashboardError> {
    let failure = match run(port, request) {
        Ok(view) => {
            sink.show_charts(&view)?;
            None
        }
        Err(err) => {
            warn!(ticker = %request.ticker, error = %err, "interaction failed");
            for message in failure_messages(&err) {
                sink.show_error(&message)?;
            }
            Some(err)
        }
    };
    sink.flush()?;
    Ok(failure)
}

/// User-facing messages for a pipeline failure.
pub fn failure_messages(err: &DashboardError) -> Vec<String> {
    if err.is_acquisition_failure() {
        vec![err.to_string(), FETCH_FAILED_HINT.to_string()]
    } else {
        vec![err.to_string()]
    }
}
