//! Request parsing: the JSON document driving one forecasting run.

use crate::error::{ForecastError, Result};
use crate::models::ModelType;
use serde::Deserialize;

/// Non-seasonal (p, d, q) order used for both model families.
pub const DEFAULT_ORDER: (usize, usize, usize) = (2, 1, 1);

const DEFAULT_FORECAST_PERIODS: usize = 12;
const DEFAULT_TEST_SIZE_MONTHS: usize = 6;

/// A single unvalidated (date, revenue) record.
#[derive(Debug, Clone, Deserialize)]
pub struct RawObservation {
    pub date: String,
    pub revenue: RevenueValue,
}

/// Revenue as it appears on the wire: a JSON number or a numeric string.
/// Coercion to f64 happens in the series preparer and is fatal there.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RevenueValue {
    Number(f64),
    Text(String),
}

/// Seasonal (P, D, Q, s) order for SARIMA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SeasonalOrder(pub usize, pub usize, pub usize, pub usize);

impl Default for SeasonalOrder {
    fn default() -> Self {
        SeasonalOrder(1, 1, 1, 12)
    }
}

impl SeasonalOrder {
    pub fn period(&self) -> usize {
        self.3
    }
}

#[derive(Debug, Deserialize)]
struct RawRequest {
    #[serde(default)]
    revenue_data: Vec<RawObservation>,
    forecast_periods: Option<usize>,
    test_size_months: Option<usize>,
    model_type: Option<String>,
    seasonal_order: Option<SeasonalOrder>,
}

/// A fully validated forecasting request.
#[derive(Debug, Clone)]
pub struct ForecastRequest {
    pub revenue_data: Vec<RawObservation>,
    pub forecast_periods: usize,
    pub test_size_months: usize,
    pub model_type: ModelType,
    pub seasonal_order: SeasonalOrder,
}

impl ForecastRequest {
    /// Parse and validate a request document.
    ///
    /// Malformed JSON and a missing/empty `revenue_data` field are
    /// distinct errors; both are fatal for the run.
    pub fn from_json(input: &str) -> Result<Self> {
        let raw: RawRequest = serde_json::from_str(input)
            .map_err(|e| ForecastError::InvalidJson(e.to_string()))?;

        if raw.revenue_data.is_empty() {
            return Err(ForecastError::MissingRevenueData);
        }

        let forecast_periods = raw.forecast_periods.unwrap_or(DEFAULT_FORECAST_PERIODS);
        if forecast_periods == 0 {
            return Err(ForecastError::InvalidParameter(
                "forecast_periods must be positive".to_string(),
            ));
        }

        let model_type = match raw.model_type.as_deref() {
            Some(value) => ModelType::parse(value)?,
            None => ModelType::Arima,
        };

        Ok(Self {
            revenue_data: raw.revenue_data,
            forecast_periods,
            test_size_months: raw.test_size_months.unwrap_or(DEFAULT_TEST_SIZE_MONTHS),
            model_type,
            seasonal_order: raw.seasonal_order.unwrap_or_default(),
        })
    }
}
