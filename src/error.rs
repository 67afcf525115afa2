//! Error types for the revenue-forecast pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur anywhere between reading the request and
/// assembling the result envelope. Every variant is terminal for the
/// request; the process boundary turns it into an error envelope and a
/// non-zero exit status.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// The request body was not valid JSON.
    #[error("Invalid JSON input: {0}")]
    InvalidJson(String),

    /// The required `revenue_data` field was absent or empty.
    #[error("No 'revenue_data' provided in the input.")]
    MissingRevenueData,

    /// A date string could not be parsed.
    #[error("unparseable date {value:?}: {detail}")]
    InvalidDate { value: String, detail: String },

    /// A revenue value could not be coerced to a finite number.
    #[error("non-numeric revenue value {0:?}")]
    InvalidRevenue(String),

    /// Invalid configuration value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Not enough observations for the requested model order.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Dimension mismatch between paired sequences.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// Numerical failure during estimation or forecasting.
    #[error("computation error: {0}")]
    ComputationError(String),
}
