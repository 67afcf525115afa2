//! # revenue-forecast
//!
//! Monthly revenue forecasting with ARIMA and SARIMA models.
//!
//! Takes a raw list of (date, revenue) observations, resamples it onto a
//! gap-free month-end index, fits an ARIMA-family model on a training
//! prefix, scores held-out accuracy (MAE/MSE/RMSE/MAPE), and produces a
//! point forecast for a configurable number of future months. The whole
//! run is a single synchronous pass; the `revenue-forecast` binary wraps
//! it as JSON-in / JSON-out.

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod core;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod prepare;
pub mod request;
pub mod stationarity;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::core::MonthlySeries;
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{build_model, Forecaster, ModelType};
    pub use crate::pipeline::{run, ResultEnvelope};
    pub use crate::request::ForecastRequest;
    pub use crate::utils::metrics::{evaluate, EvaluationMetrics};
}
