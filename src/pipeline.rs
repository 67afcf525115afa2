//! End-to-end pipeline: request in, result envelope out.
//!
//! One synchronous pass with no shared state between runs. Every failure
//! propagates as a single `ForecastError`; a run never produces both an
//! envelope and an error.

use crate::core::MonthlySeries;
use crate::error::Result;
use crate::models::build_model;
use crate::prepare::prepare_series;
use crate::request::ForecastRequest;
use crate::stationarity::{adf_test, AdfTest};
use crate::utils::metrics::{evaluate, EvaluationMetrics};
use chrono::NaiveDate;
use serde::Serialize;

/// One dated value in the historical or forecast sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: String,
    pub revenue: f64,
}

fn to_points(dates: &[NaiveDate], values: &[f64]) -> Vec<SeriesPoint> {
    dates
        .iter()
        .zip(values)
        .map(|(date, &revenue)| SeriesPoint {
            date: date.format("%Y-%m-%d").to_string(),
            revenue,
        })
        .collect()
}

/// The complete successful result of one run.
#[derive(Debug, Clone, Serialize)]
pub struct ResultEnvelope {
    pub model_type: String,
    /// Full prepared series (gaps filled), not just the training prefix.
    pub historical: Vec<SeriesPoint>,
    pub forecast: Vec<SeriesPoint>,
    pub evaluation_metrics: EvaluationMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adf_test: Option<AdfTest>,
}

/// Run the whole pipeline for one request.
pub fn run(request: &ForecastRequest) -> Result<ResultEnvelope> {
    let series = prepare_series(&request.revenue_data)?;

    // Diagnostic over the full series, before any split.
    let adf = adf_test(series.values());

    let (train, test) = series.split(request.test_size_months);
    let test_len = test.as_ref().map_or(0, MonthlySeries::len);

    let mut model = build_model(request.model_type, request.seasonal_order);
    model.fit(&train)?;

    // One prediction pass covers the held-out months and the future
    // horizon; the model never re-fits on the test segment.
    let predictions = model.predict(test_len + request.forecast_periods)?;

    let evaluation_metrics = match &test {
        Some(test) => evaluate(test.values(), &predictions[..test_len])?,
        None => EvaluationMetrics::skipped(),
    };

    let future_dates = series.future_months(request.forecast_periods);

    Ok(ResultEnvelope {
        model_type: request.model_type.name().to_string(),
        historical: to_points(series.dates(), series.values()),
        forecast: to_points(&future_dates, &predictions[test_len..]),
        evaluation_metrics,
        adf_test: adf,
    })
}
