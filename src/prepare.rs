//! Series preparation: raw observations to a canonical monthly series.
//!
//! Parses dates, coerces revenue to f64, sorts chronologically, resamples
//! onto a month-end index spanning the observed range, and forward-fills
//! months with no observation. Any unparseable record fails the whole run.

use crate::core::{month_end, MonthlySeries};
use crate::error::{ForecastError, Result};
use crate::request::{RawObservation, RevenueValue};
use chrono::{DateTime, Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Parse an observation date: a plain ISO date, or any ISO-8601 date-time
/// whose calendar date we take.
fn parse_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.trim();
    if let Ok(date) = trimmed.parse::<NaiveDate>() {
        return Ok(date);
    }
    if let Ok(dt) = trimmed.parse::<chrono::NaiveDateTime>() {
        return Ok(dt.date());
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|dt| dt.date_naive())
        .map_err(|e| ForecastError::InvalidDate {
            value: value.to_string(),
            detail: e.to_string(),
        })
}

/// Coerce a wire revenue value to a finite f64.
fn coerce_revenue(value: &RevenueValue) -> Result<f64> {
    let parsed = match value {
        RevenueValue::Number(n) => *n,
        RevenueValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ForecastError::InvalidRevenue(s.clone()))?,
    };
    if !parsed.is_finite() {
        return Err(ForecastError::InvalidRevenue(format!("{parsed}")));
    }
    Ok(parsed)
}

/// Build the prepared series from raw observations.
///
/// Duplicate months collapse to the chronologically last observation.
/// Calendar months inside the observed range with no observation take the
/// previous month's value. The first index month is observed by
/// construction, so no leading gap can remain.
pub fn prepare_series(observations: &[RawObservation]) -> Result<MonthlySeries> {
    if observations.is_empty() {
        return Err(ForecastError::MissingRevenueData);
    }

    let mut parsed: Vec<(NaiveDate, f64)> = Vec::with_capacity(observations.len());
    for obs in observations {
        let date = parse_date(&obs.date)?;
        let revenue = coerce_revenue(&obs.revenue)?;
        parsed.push((date, revenue));
    }
    parsed.sort_by_key(|(date, _)| *date);

    // Collapse onto month ends; insertion in sorted order makes the last
    // observation of each month win.
    let mut by_month: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (date, revenue) in parsed {
        by_month.insert(month_end(date), revenue);
    }

    let (first, last) = match (by_month.keys().next(), by_month.keys().next_back()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return Err(ForecastError::MissingRevenueData),
    };
    let span = (last.year() - first.year()) * 12 + last.month() as i32 - first.month() as i32;

    let mut dates = Vec::with_capacity(span as usize + 1);
    let mut values = Vec::with_capacity(span as usize + 1);
    let mut cursor = first;
    let mut carried = f64::NAN;
    while cursor <= last {
        carried = by_month.get(&cursor).copied().unwrap_or(carried);
        dates.push(cursor);
        values.push(carried);
        let next = cursor
            .succ_opt()
            .ok_or_else(|| ForecastError::ComputationError("date overflow".to_string()))?;
        cursor = month_end(next);
    }

    MonthlySeries::new(dates, values)
}
