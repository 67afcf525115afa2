//! Held-out accuracy metrics for the evaluation segment.

use crate::error::{ForecastError, Result};
use serde::Serialize;

/// Evaluation outcome carried into the result envelope.
///
/// Serializes either as the four scores or as the sentinel message
/// emitted when no test segment was held out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EvaluationMetrics {
    Scores {
        #[serde(rename = "MAE")]
        mae: f64,
        #[serde(rename = "MSE")]
        mse: f64,
        #[serde(rename = "RMSE")]
        rmse: f64,
        #[serde(rename = "MAPE")]
        mape: f64,
    },
    Skipped {
        message: String,
    },
}

impl EvaluationMetrics {
    /// Sentinel for runs without a held-out segment.
    pub fn skipped() -> Self {
        EvaluationMetrics::Skipped {
            message: "No test set used for evaluation.".to_string(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, EvaluationMetrics::Skipped { .. })
    }
}

/// Score predictions against the actual held-out values.
///
/// MAPE averages |actual - predicted| / |actual| only over points whose
/// ratio is finite; months with zero actual revenue are dropped from the
/// mean rather than failing the run. With every point dropped the MAPE is
/// NaN, which serializes as JSON null.
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<EvaluationMetrics> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::InvalidParameter(
            "evaluation requires a non-empty test segment".to_string(),
        ));
    }
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let n = actual.len() as f64;
    let mae = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n;
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / n;
    let rmse = mse.sqrt();

    let ratios: Vec<f64> = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| ((a - p) / a).abs())
        .filter(|r| r.is_finite())
        .collect();
    let mape = 100.0 * ratios.iter().sum::<f64>() / ratios.len() as f64;

    Ok(EvaluationMetrics::Scores {
        mae,
        mse,
        rmse,
        mape,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scores(metrics: &EvaluationMetrics) -> (f64, f64, f64, f64) {
        match metrics {
            EvaluationMetrics::Scores {
                mae,
                mse,
                rmse,
                mape,
            } => (*mae, *mse, *rmse, *mape),
            EvaluationMetrics::Skipped { .. } => panic!("expected scores"),
        }
    }

    #[test]
    fn perfect_predictions_score_zero() {
        let metrics = evaluate(&[10.0, 20.0, 30.0], &[10.0, 20.0, 30.0]).unwrap();
        let (mae, mse, rmse, mape) = scores(&metrics);
        assert_relative_eq!(mae, 0.0, epsilon = 1e-12);
        assert_relative_eq!(mse, 0.0, epsilon = 1e-12);
        assert_relative_eq!(rmse, 0.0, epsilon = 1e-12);
        assert_relative_eq!(mape, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn known_errors() {
        // Constant error of 0.5 on actuals 1, 2, 4.
        let metrics = evaluate(&[1.0, 2.0, 4.0], &[1.5, 2.5, 4.5]).unwrap();
        let (mae, mse, rmse, mape) = scores(&metrics);
        assert_relative_eq!(mae, 0.5, epsilon = 1e-12);
        assert_relative_eq!(mse, 0.25, epsilon = 1e-12);
        assert_relative_eq!(rmse, 0.5, epsilon = 1e-12);
        // (0.5 + 0.25 + 0.125) / 3 * 100
        assert_relative_eq!(mape, 29.166666666666668, epsilon = 1e-9);
    }

    #[test]
    fn rmse_squared_equals_mse() {
        let metrics = evaluate(&[3.0, 7.0, 11.0], &[2.0, 9.0, 10.0]).unwrap();
        let (_, mse, rmse, _) = scores(&metrics);
        assert_relative_eq!(rmse * rmse, mse, epsilon = 1e-9);
    }

    #[test]
    fn zero_actuals_are_excluded_from_mape() {
        let metrics = evaluate(&[0.0, 10.0], &[5.0, 11.0]).unwrap();
        let (mae, _, _, mape) = scores(&metrics);
        assert_relative_eq!(mae, 3.0, epsilon = 1e-12);
        // Only the second point contributes: |10-11|/10 = 10%.
        assert_relative_eq!(mape, 10.0, epsilon = 1e-9);
    }

    #[test]
    fn all_zero_actuals_yield_nan_mape() {
        let metrics = evaluate(&[0.0, 0.0], &[1.0, 2.0]).unwrap();
        let (_, _, _, mape) = scores(&metrics);
        assert!(mape.is_nan());
    }

    #[test]
    fn length_mismatch_is_an_error() {
        assert!(matches!(
            evaluate(&[1.0, 2.0], &[1.0]),
            Err(ForecastError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn empty_segments_are_an_error() {
        assert!(evaluate(&[], &[]).is_err());
    }

    #[test]
    fn sentinel_serializes_as_message() {
        let json = serde_json::to_string(&EvaluationMetrics::skipped()).unwrap();
        assert_eq!(json, r#"{"message":"No test set used for evaluation."}"#);
    }

    #[test]
    fn scores_serialize_with_upper_case_keys() {
        let metrics = evaluate(&[10.0], &[12.0]).unwrap();
        let json = serde_json::to_string(&metrics).unwrap();
        assert!(json.contains(r#""MAE":2.0"#));
        assert!(json.contains(r#""RMSE":2.0"#));
    }
}
