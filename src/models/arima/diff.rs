//! Differencing and integration for the ARIMA family.

/// Difference a series `d` times (lag 1).
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut out = series.to_vec();
    for _ in 0..d {
        if out.len() <= 1 {
            break;
        }
        out = out.windows(2).map(|w| w[1] - w[0]).collect();
    }
    out
}

/// Difference a series `d` times at the seasonal lag `period`.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    if period == 0 {
        return series.to_vec();
    }
    let mut out = series.to_vec();
    for _ in 0..d {
        if out.len() <= period {
            break;
        }
        out = (period..out.len()).map(|i| out[i] - out[i - period]).collect();
    }
    out
}

/// Undo lag-1 differencing for values forecast past the end of `original`.
///
/// `differenced` holds future steps on the d-times differenced scale;
/// the result is on the original scale, continuing from the last value.
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    if d == 0 || differenced.is_empty() {
        return differenced.to_vec();
    }
    let mut out = differenced.to_vec();
    for level in (0..d).rev() {
        // Last value of the series differenced `level` times seeds the cumsum.
        let seed = *difference(original, level).last().unwrap_or(&0.0);
        let mut acc = seed;
        out = out
            .iter()
            .map(|&delta| {
                acc += delta;
                acc
            })
            .collect();
    }
    out
}

/// Undo seasonal differencing for values forecast past the end of
/// `original`, one seasonal level at a time. Each future value at a level
/// is the differenced value plus the value one period earlier, drawing on
/// already-forecast values once the horizon exceeds the period.
pub fn seasonal_integrate(
    differenced: &[f64],
    original: &[f64],
    d: usize,
    period: usize,
) -> Vec<f64> {
    if d == 0 || period == 0 || differenced.is_empty() {
        return differenced.to_vec();
    }
    let mut out = differenced.to_vec();
    for level in (0..d).rev() {
        let mut extended = seasonal_difference(original, level, period);
        let mut integrated = Vec::with_capacity(out.len());
        for &delta in &out {
            let n = extended.len();
            let prev = if n >= period {
                extended[n - period]
            } else {
                extended.last().copied().unwrap_or(0.0)
            };
            let value = delta + prev;
            integrated.push(value);
            extended.push(value);
        }
        out = integrated;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn difference_identity_at_zero() {
        let series = vec![1.0, 4.0, 9.0];
        assert_eq!(difference(&series, 0), series);
    }

    #[test]
    fn difference_first_order() {
        let series = vec![1.0, 3.0, 6.0, 10.0];
        assert_eq!(difference(&series, 1), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn difference_second_order() {
        let series = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&series, 2), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn seasonal_difference_removes_stable_pattern() {
        let series = vec![10.0, 20.0, 30.0, 11.0, 21.0, 31.0];
        assert_eq!(
            seasonal_difference(&series, 1, 3),
            vec![1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn seasonal_difference_short_series_is_untouched() {
        let series = vec![1.0, 2.0];
        assert_eq!(seasonal_difference(&series, 1, 4), series);
    }

    #[test]
    fn integrate_continues_from_last_value() {
        let original = vec![10.0, 12.0, 15.0, 19.0];
        let future_diffs = vec![5.0, 6.0];
        let future = integrate(&future_diffs, &original, 1);
        assert_relative_eq!(future[0], 24.0, epsilon = 1e-12);
        assert_relative_eq!(future[1], 30.0, epsilon = 1e-12);
    }

    #[test]
    fn integrate_second_order_continues_trend() {
        // Quadratic series: second differences are constant 1.
        let original = vec![1.0, 3.0, 6.0, 10.0, 15.0];
        let future = integrate(&[1.0, 1.0], &original, 2);
        assert_relative_eq!(future[0], 21.0, epsilon = 1e-12);
        assert_relative_eq!(future[1], 28.0, epsilon = 1e-12);
    }

    #[test]
    fn seasonal_integrate_reverses_seasonal_difference() {
        // Two full periods plus forecast deltas of zero keep the pattern.
        let original = vec![10.0, 20.0, 30.0, 12.0, 22.0, 32.0];
        let future = seasonal_integrate(&[0.0, 0.0, 0.0], &original, 1, 3);
        assert_eq!(future, vec![12.0, 22.0, 32.0]);
    }

    #[test]
    fn seasonal_integrate_feeds_forecasts_beyond_one_period() {
        let original = vec![10.0, 20.0, 10.0, 20.0];
        let future = seasonal_integrate(&[1.0, 1.0, 1.0, 1.0], &original, 1, 2);
        // First period adds onto history, second period onto forecasts.
        assert_eq!(future, vec![11.0, 21.0, 12.0, 22.0]);
    }
}
