//! Augmented Dickey-Fuller unit-root diagnostic.
//!
//! Runs over the full prepared series before splitting. The envelope
//! carries only the test statistic and an approximate p-value; the test
//! is advisory and never fails a run.

use serde::Serialize;

/// ADF result as it appears in the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdfTest {
    #[serde(rename = "ADF_Statistic")]
    pub statistic: f64,
    pub p_value: f64,
}

/// Dickey-Fuller regression of the first difference on the lagged level,
/// with intercept. Returns `None` when the series is too short or the
/// regression is degenerate (constant level, zero variance).
pub fn adf_test(series: &[f64]) -> Option<AdfTest> {
    let n = series.len();
    if n < 4 {
        return None;
    }

    // Standard lag truncation: (n - 1)^(1/3), skipped at the head of the
    // regression window.
    let lag = (((n - 1) as f64).powf(1.0 / 3.0).floor() as usize)
        .clamp(1, n / 2 - 1);

    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let level = &series[..n - 1];

    let m = diff.len() - lag;
    if m < 3 {
        return None;
    }

    let y = &diff[lag..];
    let x = &level[lag..];
    let y_mean = y.iter().sum::<f64>() / m as f64;
    let x_mean = x.iter().sum::<f64>() / m as f64;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    let mut syy = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
    }
    if sxx == 0.0 {
        return None;
    }

    let beta = sxy / sxx;
    let rss = syy - beta * sxy;
    let sigma_sq = rss / (m - 2) as f64;
    if !(sigma_sq > 0.0) {
        return None;
    }

    let statistic = beta / (sigma_sq / sxx).sqrt();
    if !statistic.is_finite() {
        return None;
    }

    Some(AdfTest {
        statistic,
        p_value: approximate_p_value(statistic),
    })
}

/// Piecewise p-value approximation from the MacKinnon tau table for the
/// constant-only regression.
fn approximate_p_value(t_stat: f64) -> f64 {
    match t_stat {
        t if t < -4.0 => 0.001,
        t if t < -3.43 => 0.01,
        t if t < -2.86 => 0.05,
        t if t < -2.57 => 0.10,
        t if t < -1.94 => 0.20,
        t if t < -1.62 => 0.30,
        t if t < -1.28 => 0.40,
        t if t < -0.84 => 0.50,
        t if t < 0.0 => 0.70,
        t => 0.90 + 0.05 * (1.0 - (-t).exp()),
    }
}
