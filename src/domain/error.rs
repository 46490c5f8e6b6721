//! Domain error types.

/// Failure reported by a market-data adapter.
///
/// Adapters never surface these directly to the user; acquisition folds them
/// into [`DashboardError::Fetch`] together with the ticker.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(String),

    #[error("provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    Decode(String),

    #[error("invalid ticker symbol {0:?}")]
    InvalidTicker(String),

    #[error("CSV error in {file}: {reason}")]
    Csv { file: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Top-level error type for stockdash.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("No data available for {ticker}. Please check the symbol and try again.")]
    NoData { ticker: String },

    #[error("'Close' column is missing for {ticker}. Unable to compute indicators.")]
    MissingClose { ticker: String },

    #[error("Error fetching data for {ticker}: {reason}")]
    Fetch { ticker: String, reason: String },

    #[error("No valid data for plotting.")]
    NoValidData,

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("render error: {reason}")]
    Render { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    /// True for the failures raised by the acquisition stage.
    pub fn is_acquisition_failure(&self) -> bool {
        matches!(
            self,
            DashboardError::NoData { .. }
                | DashboardError::MissingClose { .. }
                | DashboardError::Fetch { .. }
        )
    }
}

impl From<&DashboardError> for std::process::ExitCode {
    fn from(err: &DashboardError) -> Self {
        let code: u8 = match err {
            DashboardError::Io(_) | DashboardError::Render { .. } => 1,
            DashboardError::ConfigParse { .. }
            | DashboardError::ConfigMissing { .. }
            | DashboardError::ConfigInvalid { .. } => 2,
            DashboardError::NoData { .. }
            | DashboardError::MissingClose { .. }
            | DashboardError::Fetch { .. }
            | DashboardError::NoValidData => 5,
        };
        std::process::ExitCode::from(code)
    }
}
