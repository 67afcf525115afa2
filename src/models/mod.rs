//! Forecasting models and the fit/predict seam the pipeline consumes.

pub mod arima;

use crate::core::MonthlySeries;
use crate::error::{ForecastError, Result};
use crate::request::{SeasonalOrder, DEFAULT_ORDER};

pub use arima::{ARIMA, SARIMA};

/// Which model family to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    Arima,
    Sarima,
}

impl ModelType {
    /// Case-insensitive parse of the wire value.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ARIMA" => Ok(ModelType::Arima),
            "SARIMA" => Ok(ModelType::Sarima),
            other => Err(ForecastError::InvalidParameter(format!(
                "unknown model_type {other:?}, expected ARIMA or SARIMA"
            ))),
        }
    }

    /// Canonical upper-case name for the result envelope.
    pub fn name(&self) -> &'static str {
        match self {
            ModelType::Arima => "ARIMA",
            ModelType::Sarima => "SARIMA",
        }
    }
}

/// Common interface for the fitting strategies.
///
/// Object-safe so the pipeline can hold a `Box<dyn Forecaster>` chosen at
/// run time from the request's `model_type`.
pub trait Forecaster {
    /// Estimate parameters on the training series.
    fn fit(&mut self, series: &MonthlySeries) -> Result<()>;

    /// Point predictions for `horizon` steps past the training series.
    fn predict(&self, horizon: usize) -> Result<Vec<f64>>;

    /// Model name for diagnostics.
    fn name(&self) -> &str;
}

/// Boxed forecaster trait object.
pub type BoxedForecaster = Box<dyn Forecaster>;

/// Select the fitting strategy for a request.
///
/// Both families use the fixed non-seasonal order; SARIMA additionally
/// takes the request's seasonal 4-tuple.
pub fn build_model(model_type: ModelType, seasonal_order: SeasonalOrder) -> BoxedForecaster {
    let (p, d, q) = DEFAULT_ORDER;
    match model_type {
        ModelType::Arima => Box::new(ARIMA::new(p, d, q)),
        ModelType::Sarima => {
            let SeasonalOrder(cap_p, cap_d, cap_q, s) = seasonal_order;
            Box::new(SARIMA::new(p, d, q, cap_p, cap_d, cap_q, s))
        }
    }
}
