//! Numeric utilities: simplex optimization and accuracy metrics.

pub mod metrics;
pub mod optimization;

pub use metrics::{evaluate, EvaluationMetrics};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
