//! ARIMA and SARIMA (Autoregressive Integrated Moving Average) models.
//!
//! ARIMA(p, d, q) and its seasonal extension SARIMA(p, d, q)(P, D, Q)[s],
//! estimated by conditional least squares.

mod diff;
mod model;

pub use diff::{difference, integrate, seasonal_difference, seasonal_integrate};
pub use model::{ARIMASpec, SARIMASpec, ARIMA, SARIMA};
