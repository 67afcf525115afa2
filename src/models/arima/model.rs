//! ARIMA and SARIMA model estimation by conditional least squares.

use crate::core::MonthlySeries;
use crate::error::{ForecastError, Result};
use crate::models::arima::diff::{
    difference, integrate, seasonal_difference, seasonal_integrate,
};
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};

/// Coefficient bounds keeping the fit inside the stationary/invertible
/// region.
const COEF_BOUNDS: (f64, f64) = (-0.99, 0.99);

/// ARIMA model specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ARIMASpec {
    /// AR order (p)
    pub p: usize,
    /// Differencing order (d)
    pub d: usize,
    /// MA order (q)
    pub q: usize,
}

impl ARIMASpec {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self { p, d, q }
    }
}

/// SARIMA model specification: non-seasonal (p, d, q) plus seasonal
/// (P, D, Q) at period s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SARIMASpec {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    pub cap_p: usize,
    pub cap_d: usize,
    pub cap_q: usize,
    pub s: usize,
}

impl SARIMASpec {
    pub fn new(
        p: usize,
        d: usize,
        q: usize,
        cap_p: usize,
        cap_d: usize,
        cap_q: usize,
        s: usize,
    ) -> Self {
        Self {
            p,
            d,
            q,
            cap_p,
            cap_d,
            cap_q,
            s,
        }
    }

    /// Earliest index of the differenced series with all lags available.
    fn recursion_start(&self) -> usize {
        self.p
            .max(self.q)
            .max(self.cap_p.max(self.cap_q) * self.s)
    }
}

/// One-step SARMA prediction on the differenced scale.
///
/// Shared by the CSS objective, residual pass, and forecast recursion.
/// Seasonal terms vanish when the spec has no seasonal component, which
/// makes plain ARIMA the `s = 0` special case.
#[allow(clippy::too_many_arguments)]
fn one_step(
    w: &[f64],
    shocks: &[f64],
    t: usize,
    spec: &SARIMASpec,
    ar: &[f64],
    ma: &[f64],
    sar: &[f64],
    sma: &[f64],
    intercept: f64,
) -> f64 {
    let mut pred = intercept;
    for (i, &coef) in ar.iter().enumerate() {
        if t > i {
            pred += coef * (w[t - 1 - i] - intercept);
        }
    }
    for (j, &coef) in sar.iter().enumerate() {
        let lag = (j + 1) * spec.s;
        if t >= lag && lag > 0 {
            pred += coef * (w[t - lag] - intercept);
        }
    }
    for (i, &coef) in ma.iter().enumerate() {
        if t > i {
            pred += coef * shocks[t - 1 - i];
        }
    }
    for (j, &coef) in sma.iter().enumerate() {
        let lag = (j + 1) * spec.s;
        if t >= lag && lag > 0 {
            pred += coef * shocks[t - lag];
        }
    }
    pred
}

/// Conditional sum of squares for a parameter vector.
fn conditional_sum_of_squares(
    w: &[f64],
    spec: &SARIMASpec,
    ar: &[f64],
    ma: &[f64],
    sar: &[f64],
    sma: &[f64],
    intercept: f64,
) -> f64 {
    let n = w.len();
    let start = spec.recursion_start();
    if n <= start {
        return f64::MAX;
    }

    let mut shocks = vec![0.0; n];
    let mut css = 0.0;
    for t in start..n {
        let pred = one_step(w, &shocks, t, spec, ar, ma, sar, sma, intercept);
        let error = w[t] - pred;
        shocks[t] = error;
        css += error * error;
    }
    css
}

/// Estimated SARMA parameters on the differenced scale.
#[derive(Debug, Clone, Default)]
struct FittedParams {
    intercept: f64,
    ar: Vec<f64>,
    ma: Vec<f64>,
    sar: Vec<f64>,
    sma: Vec<f64>,
}

/// Estimate parameters by minimizing the CSS with Nelder-Mead.
fn estimate(w: &[f64], spec: &SARIMASpec) -> Result<FittedParams> {
    let mean = w.iter().sum::<f64>() / w.len().max(1) as f64;
    let n_coefs = spec.p + spec.q + spec.cap_p + spec.cap_q;

    if n_coefs == 0 {
        return Ok(FittedParams {
            intercept: mean,
            ..FittedParams::default()
        });
    }

    // Parameter layout: [intercept, ar.., ma.., sar.., sma..]
    let mut initial = vec![0.0; 1 + n_coefs];
    initial[0] = mean;
    for (i, slot) in initial[1..].iter_mut().enumerate() {
        *slot = 0.1 / (i % 3 + 1) as f64;
    }

    let mut bounds = vec![(f64::NEG_INFINITY, f64::INFINITY)];
    bounds.extend(std::iter::repeat(COEF_BOUNDS).take(n_coefs));

    let spec = *spec;
    let result = nelder_mead(
        |params| {
            let (intercept, coefs) = (params[0], &params[1..]);
            let (ar, rest) = coefs.split_at(spec.p);
            let (ma, rest) = rest.split_at(spec.q);
            let (sar, sma) = rest.split_at(spec.cap_p);
            conditional_sum_of_squares(w, &spec, ar, ma, sar, sma, intercept)
        },
        &initial,
        Some(&bounds),
        NelderMeadConfig {
            max_iter: 1000,
            tolerance: 1e-8,
            ..Default::default()
        },
    );

    if !result.optimal_value.is_finite() {
        return Err(ForecastError::ComputationError(
            "parameter estimation did not produce a finite objective".to_string(),
        ));
    }

    let point = result.optimal_point;
    let coefs = &point[1..];
    let (ar, rest) = coefs.split_at(spec.p);
    let (ma, rest) = rest.split_at(spec.q);
    let (sar, sma) = rest.split_at(spec.cap_p);

    Ok(FittedParams {
        intercept: point[0],
        ar: ar.to_vec(),
        ma: ma.to_vec(),
        sar: sar.to_vec(),
        sma: sma.to_vec(),
    })
}

/// Residual pass over the differenced series with fitted parameters.
fn residual_pass(w: &[f64], spec: &SARIMASpec, params: &FittedParams) -> Vec<f64> {
    let start = spec.recursion_start();
    let mut shocks = vec![0.0; w.len()];
    for t in start..w.len() {
        let pred = one_step(
            w,
            &shocks,
            t,
            spec,
            &params.ar,
            &params.ma,
            &params.sar,
            &params.sma,
            params.intercept,
        );
        shocks[t] = w[t] - pred;
    }
    shocks
}

/// Recursive forecast on the differenced scale; future shocks are zero.
fn forecast_differenced(
    w: &[f64],
    shocks: &[f64],
    spec: &SARIMASpec,
    params: &FittedParams,
    horizon: usize,
) -> Vec<f64> {
    let mut extended = w.to_vec();
    let mut extended_shocks = shocks.to_vec();
    for _ in 0..horizon {
        let t = extended.len();
        let pred = one_step(
            &extended,
            &extended_shocks,
            t,
            spec,
            &params.ar,
            &params.ma,
            &params.sar,
            &params.sma,
            params.intercept,
        );
        extended.push(pred);
        extended_shocks.push(0.0);
    }
    extended[w.len()..].to_vec()
}

/// Fitted state shared by both model families.
#[derive(Debug, Clone)]
struct FittedState {
    /// Training series on the original scale.
    original: Vec<f64>,
    /// After seasonal differencing only (equals `original` for ARIMA).
    seasonal_adjusted: Vec<f64>,
    /// Fully differenced series the recursion runs on.
    differenced: Vec<f64>,
    /// In-sample shocks on the differenced scale.
    shocks: Vec<f64>,
    params: FittedParams,
}

/// ARIMA(p, d, q) revenue model.
#[derive(Debug, Clone)]
pub struct ARIMA {
    spec: ARIMASpec,
    state: Option<FittedState>,
}

impl ARIMA {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self {
            spec: ARIMASpec::new(p, d, q),
            state: None,
        }
    }

    pub fn spec(&self) -> ARIMASpec {
        self.spec
    }

    fn as_sarima_spec(&self) -> SARIMASpec {
        SARIMASpec::new(self.spec.p, self.spec.d, self.spec.q, 0, 0, 0, 0)
    }
}

impl Forecaster for ARIMA {
    fn fit(&mut self, series: &MonthlySeries) -> Result<()> {
        let spec = self.as_sarima_spec();
        self.state = Some(fit_state(series.values(), &spec)?);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let state = self.state.as_ref().ok_or(ForecastError::FitRequired)?;
        Ok(predict_state(state, &self.as_sarima_spec(), horizon))
    }

    fn name(&self) -> &str {
        "ARIMA"
    }
}

/// SARIMA(p, d, q)(P, D, Q)[s] revenue model.
#[derive(Debug, Clone)]
pub struct SARIMA {
    spec: SARIMASpec,
    state: Option<FittedState>,
}

impl SARIMA {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        p: usize,
        d: usize,
        q: usize,
        cap_p: usize,
        cap_d: usize,
        cap_q: usize,
        s: usize,
    ) -> Self {
        Self {
            spec: SARIMASpec::new(p, d, q, cap_p, cap_d, cap_q, s),
            state: None,
        }
    }

    pub fn spec(&self) -> SARIMASpec {
        self.spec
    }
}

impl Forecaster for SARIMA {
    fn fit(&mut self, series: &MonthlySeries) -> Result<()> {
        if self.spec.s < 2 && (self.spec.cap_p > 0 || self.spec.cap_d > 0 || self.spec.cap_q > 0)
        {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal period must be at least 2, got {}",
                self.spec.s
            )));
        }
        self.state = Some(fit_state(series.values(), &self.spec)?);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<Vec<f64>> {
        let state = self.state.as_ref().ok_or(ForecastError::FitRequired)?;
        Ok(predict_state(state, &self.spec, horizon))
    }

    fn name(&self) -> &str {
        "SARIMA"
    }
}

fn fit_state(values: &[f64], spec: &SARIMASpec) -> Result<FittedState> {
    let min_len = spec.d + spec.cap_d * spec.s + spec.recursion_start() + 2;
    if values.len() < min_len {
        return Err(ForecastError::InsufficientData {
            needed: min_len,
            got: values.len(),
        });
    }

    let seasonal_adjusted = seasonal_difference(values, spec.cap_d, spec.s);
    let differenced = difference(&seasonal_adjusted, spec.d);

    let params = estimate(&differenced, spec)?;
    let shocks = residual_pass(&differenced, spec, &params);

    Ok(FittedState {
        original: values.to_vec(),
        seasonal_adjusted,
        differenced,
        shocks,
        params,
    })
}

fn predict_state(state: &FittedState, spec: &SARIMASpec, horizon: usize) -> Vec<f64> {
    if horizon == 0 {
        return Vec::new();
    }

    let future_diff =
        forecast_differenced(&state.differenced, &state.shocks, spec, &state.params, horizon);

    // Undo non-seasonal differencing against the seasonally adjusted
    // series, then undo seasonal differencing against the original.
    let future_seasonal = if spec.d > 0 {
        integrate(&future_diff, &state.seasonal_adjusted, spec.d)
    } else {
        future_diff
    };
    if spec.cap_d > 0 {
        seasonal_integrate(&future_seasonal, &state.original, spec.cap_d, spec.s)
    } else {
        future_seasonal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn monthly(values: Vec<f64>) -> MonthlySeries {
        let start = NaiveDate::from_ymd_opt(2018, 1, 31).unwrap();
        let dates: Vec<NaiveDate> = (0..values.len())
            .scan(start, |cursor, _| {
                let current = *cursor;
                *cursor = crate::core::month_end(cursor.succ_opt().unwrap());
                Some(current)
            })
            .collect();
        MonthlySeries::new(dates, values).unwrap()
    }

    #[test]
    fn arima_fit_and_predict_horizon() {
        let values: Vec<f64> = (0..48)
            .map(|i| 100.0 + 2.0 * i as f64 + (i as f64 * 0.4).sin() * 3.0)
            .collect();
        let series = monthly(values);

        let mut model = ARIMA::new(2, 1, 1);
        model.fit(&series).unwrap();

        let forecast = model.predict(6).unwrap();
        assert_eq!(forecast.len(), 6);
        assert!(forecast.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn arima_follows_linear_trend() {
        let values: Vec<f64> = (0..40).map(|i| 50.0 + 5.0 * i as f64).collect();
        let last = *values.last().unwrap();
        let series = monthly(values);

        let mut model = ARIMA::new(1, 1, 0);
        model.fit(&series).unwrap();

        let forecast = model.predict(3).unwrap();
        // A differenced trend forecast keeps climbing.
        assert!(forecast[0] > last - 10.0);
        assert!(forecast[2] >= forecast[0] - 1e-6);
    }

    #[test]
    fn arima_zero_horizon_is_empty() {
        let values: Vec<f64> = (0..30).map(|i| i as f64).collect();
        let series = monthly(values);

        let mut model = ARIMA::new(1, 1, 1);
        model.fit(&series).unwrap();
        assert!(model.predict(0).unwrap().is_empty());
    }

    #[test]
    fn arima_requires_fit() {
        let model = ARIMA::new(2, 1, 1);
        assert!(matches!(model.predict(4), Err(ForecastError::FitRequired)));
    }

    #[test]
    fn arima_insufficient_data() {
        let series = monthly(vec![1.0, 2.0, 3.0]);
        let mut model = ARIMA::new(2, 1, 1);
        assert!(matches!(
            model.fit(&series),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn arima_mean_only_spec() {
        let values = vec![5.0, 6.0, 5.5, 6.5, 5.0, 6.0, 5.5, 6.5, 5.0, 6.0];
        let series = monthly(values);

        let mut model = ARIMA::new(0, 0, 0);
        model.fit(&series).unwrap();

        let forecast = model.predict(2).unwrap();
        // Forecast collapses to the series mean.
        assert!((forecast[0] - 5.7).abs() < 0.5);
        assert_eq!(forecast[0], forecast[1]);
    }

    #[test]
    fn sarima_fit_and_predict_horizon() {
        let values: Vec<f64> = (0..60)
            .map(|i| {
                200.0
                    + 1.0 * i as f64
                    + 20.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin()
            })
            .collect();
        let series = monthly(values);

        let mut model = SARIMA::new(2, 1, 1, 1, 1, 1, 12);
        model.fit(&series).unwrap();

        let forecast = model.predict(12).unwrap();
        assert_eq!(forecast.len(), 12);
        assert!(forecast.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn sarima_preserves_seasonal_shape() {
        // Pure repeating pattern with a seasonal difference of zero.
        let pattern = [100.0, 150.0, 120.0, 180.0];
        let values: Vec<f64> = (0..40).map(|i| pattern[i % 4]).collect();
        let series = monthly(values);

        let mut model = SARIMA::new(0, 0, 0, 0, 1, 0, 4);
        model.fit(&series).unwrap();

        let forecast = model.predict(4).unwrap();
        for (got, want) in forecast.iter().zip(pattern.iter()) {
            assert!((got - want).abs() < 1.0, "got {got}, want {want}");
        }
    }

    #[test]
    fn sarima_rejects_degenerate_period() {
        let series = monthly((0..30).map(|i| i as f64).collect());
        let mut model = SARIMA::new(1, 1, 1, 1, 1, 1, 1);
        assert!(matches!(
            model.fit(&series),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn sarima_insufficient_data_for_period() {
        let series = monthly((0..10).map(|i| i as f64).collect());
        let mut model = SARIMA::new(2, 1, 1, 1, 1, 1, 12);
        assert!(matches!(
            model.fit(&series),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn sarima_requires_fit() {
        let model = SARIMA::new(2, 1, 1, 1, 1, 1, 12);
        assert!(matches!(model.predict(4), Err(ForecastError::FitRequired)));
    }

    #[test]
    fn specs_expose_orders() {
        let spec = ARIMASpec::new(2, 1, 1);
        assert_eq!((spec.p, spec.d, spec.q), (2, 1, 1));

        let spec = SARIMASpec::new(2, 1, 1, 0, 1, 1, 12);
        assert_eq!(spec.recursion_start(), 12);
    }
}
