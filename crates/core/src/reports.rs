//! Time bucketing for the month-over-month request trend.
//!
//! The database groups rows by `to_char(created_at, 'YYYY-MM')`; months with
//! no requests produce no row, so [`fill_trend`] pads the series with zeros.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::types::Timestamp;

/// Default number of months in a trend report.
pub const DEFAULT_TREND_MONTHS: u32 = 6;

/// Upper bound on the number of months in a trend report.
pub const MAX_TREND_MONTHS: u32 = 24;

/// One month of the trend series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// `YYYY-MM`.
    pub month: String,
    pub total: i64,
    pub approved: i64,
    pub rejected: i64,
}

/// Clamp a requested month count into `1..=MAX_TREND_MONTHS`.
pub fn clamp_months(requested: Option<u32>) -> u32 {
    requested
        .unwrap_or(DEFAULT_TREND_MONTHS)
        .clamp(1, MAX_TREND_MONTHS)
}

/// First day of the month `months_back` months before `now`'s month.
pub fn month_start(now: Timestamp, months_back: u32) -> NaiveDate {
    let index = now.year() * 12 + now.month0() as i32 - months_back as i32;
    let year = index.div_euclid(12);
    let month0 = index.rem_euclid(12) as u32;
    // Day 1 of any month in range is always a valid date.
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(NaiveDate::MIN)
}

/// `YYYY-MM` labels for the last `months` months, oldest first, ending with
/// `now`'s month.
pub fn month_buckets(now: Timestamp, months: u32) -> Vec<String> {
    (0..months)
        .rev()
        .map(|back| month_start(now, back).format("%Y-%m").to_string())
        .collect()
}

/// Lay sparse `(month, total, approved, rejected)` rows onto the full bucket
/// list. Rows whose month is outside the buckets are ignored.
pub fn fill_trend(buckets: &[String], rows: &[(String, i64, i64, i64)]) -> Vec<TrendPoint> {
    buckets
        .iter()
        .map(|month| {
            let (total, approved, rejected) = rows
                .iter()
                .find(|(m, ..)| m == month)
                .map(|(_, t, a, r)| (*t, *a, *r))
                .unwrap_or((0, 0, 0));
            TrendPoint {
                month: month.clone(),
                total,
                approved,
                rejected,
            }
        })
        .collect()
}
