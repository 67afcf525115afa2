//! Core data structures for the monthly revenue series.

mod series;

pub use series::{month_end, MonthlySeries};
