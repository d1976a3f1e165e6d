//! Domain error types.

/// Reasons an ARIMA fit can be rejected. Never escapes the forecaster: every
/// variant is recovered by the mean-based fallback.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FitError {
    #[error("insufficient data: have {observations} observations, need {minimum}")]
    InsufficientData { observations: usize, minimum: usize },

    #[error("degenerate series: differenced values have zero variance")]
    Degenerate,

    #[error("optimizer did not converge after {iterations} iterations")]
    NonConvergence { iterations: usize },

    #[error("fitted parameters outside the stationary/invertible region (phi={phi}, theta={theta})")]
    NonStationary { phi: f64, theta: f64 },

    #[error("model produced a non-finite forecast")]
    NonFinite,
}

/// Top-level error type for stockshift.
#[derive(Debug, thiserror::Error)]
pub enum StockshiftError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("invalid record at row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

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

    #[error("transfer rejected: {reason}")]
    TransferRejected { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&StockshiftError> for std::process::ExitCode {
    fn from(err: &StockshiftError) -> Self {
        let code: u8 = match err {
            StockshiftError::Io(_) => 1,
            StockshiftError::ConfigParse { .. }
            | StockshiftError::ConfigMissing { .. }
            | StockshiftError::ConfigInvalid { .. } => 2,
            StockshiftError::DataSource { .. } => 3,
            StockshiftError::InvalidRecord { .. } => 4,
            StockshiftError::TransferRejected { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
