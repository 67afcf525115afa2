//! MonthlySeries: a gap-free, month-end indexed revenue series.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};

/// Return the last calendar day of the month containing the given date.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    // First of the following month always exists.
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or(NaiveDate::MAX)
        .pred_opt()
        .unwrap_or(NaiveDate::MAX)
}

/// Month-end date n calendar months after the given month-end date.
fn month_end_offset(date: NaiveDate, n: u32) -> NaiveDate {
    let total = date.year() * 12 + date.month0() as i32 + n as i32;
    let (year, month0) = (total.div_euclid(12), total.rem_euclid(12) as u32);
    month_end(NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(NaiveDate::MAX))
}

/// A univariate revenue series on a canonical monthly index.
///
/// Invariants, enforced on construction:
/// - dates and values have equal, non-zero length
/// - every date is a calendar month end
/// - dates are strictly increasing, exactly one month apart
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl MonthlySeries {
    /// Create a series, validating the monthly-index invariants.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        if dates.is_empty() {
            return Err(ForecastError::MissingRevenueData);
        }
        if dates.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: dates.len(),
                got: values.len(),
            });
        }
        for (i, &date) in dates.iter().enumerate() {
            if date != month_end(date) {
                return Err(ForecastError::InvalidParameter(format!(
                    "date {date} is not a month end"
                )));
            }
            if i > 0 && date != month_end_offset(dates[i - 1], 1) {
                return Err(ForecastError::InvalidParameter(format!(
                    "dates must step one month at a time, got {} after {}",
                    date,
                    dates[i - 1]
                )));
            }
        }
        Ok(Self { dates, values })
    }

    /// Number of monthly observations.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Month-end dates.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Revenue values, aligned with `dates`.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Last historical month.
    pub fn last_date(&self) -> NaiveDate {
        *self.dates.last().expect("series is non-empty")
    }

    /// Partition into a training prefix and a held-out suffix of
    /// `test_size_months` points. When the requested size is zero or not
    /// smaller than the series, the test segment is empty and the whole
    /// series trains. Pure and total.
    pub fn split(&self, test_size_months: usize) -> (MonthlySeries, Option<MonthlySeries>) {
        let n = self.len();
        if test_size_months == 0 || test_size_months >= n {
            return (self.clone(), None);
        }
        let cut = n - test_size_months;
        let train = MonthlySeries {
            dates: self.dates[..cut].to_vec(),
            values: self.values[..cut].to_vec(),
        };
        let test = MonthlySeries {
            dates: self.dates[cut..].to_vec(),
            values: self.values[cut..].to_vec(),
        };
        (train, Some(test))
    }

    /// Month-end dates for the n months following the series.
    pub fn future_months(&self, n: usize) -> Vec<NaiveDate> {
        let last = self.last_date();
        (1..=n as u32).map(|i| month_end_offset(last, i)).collect()
    }
}
