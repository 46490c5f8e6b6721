//! Chart rendering host port.

use crate::domain::error::DashboardError;
use crate::domain::presentation::DashboardView;

/// Sink that displays the outcome of one dashboard interaction.
///
/// A sink may buffer what it is shown; [`ChartPort::flush`] is called once
/// at the end of every interaction.
pub trait ChartPort {
    fn show_charts(&mut self, view: &DashboardView) -> Result<(), DashboardError>;

    fn show_error(&mut self, message: &str) -> Result<(), DashboardError>;

    fn flush(&mut self) -> Result<(), DashboardError> {
        Ok(())
    }
}
