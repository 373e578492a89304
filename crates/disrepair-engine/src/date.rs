//! Date normalization for disrepair periods.
//!
//! The wire format is day/month/year (`7/1/2025`, `07/01/2025`). Dates already in
//! year-month-day order (`2025-01-07`) pass straight through to the final parse.
//! Anything else is handed to a lenient fallback that understands RFC 3339 and
//! naive ISO datetimes and keeps only the calendar date. No timezone adjustment is
//! ever made: every value is a date at day granularity.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{DisrepairError, Result};

/// Parse a date string into a calendar date.
///
/// # Errors
/// Returns `DisrepairError::MalformedDate` when the string matches no accepted
/// format, or names a day that does not exist (e.g. `31/02/2025`).
pub fn normalize_date(raw: &str) -> Result<NaiveDate> {
    let s = raw.trim();

    if let Some((day, month, year)) = split_day_month_year(s) {
        return NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DisrepairError::MalformedDate(raw.to_string()));
    }

    if is_year_month_day(s) {
        return NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| DisrepairError::MalformedDate(raw.to_string()));
    }

    parse_fallback(s).ok_or_else(|| DisrepairError::MalformedDate(raw.to_string()))
}

/// Match `d/m/yyyy` with 1-2 digit day and month and a 4-digit year.
fn split_day_month_year(s: &str) -> Option<(u32, u32, i32)> {
    let mut parts = s.split('/');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    if !digits_in(day, 1..=2) || !digits_in(month, 1..=2) || !digits_in(year, 4..=4) {
        return None;
    }
    Some((day.parse().ok()?, month.parse().ok()?, year.parse().ok()?))
}

/// Match `yyyy-mm-dd` with exactly 4-2-2 digits.
fn is_year_month_day(s: &str) -> bool {
    let parts: Vec<&str> = s.split('-').collect();
    matches!(
        parts.as_slice(),
        [y, m, d] if digits_in(y, 4..=4) && digits_in(m, 2..=2) && digits_in(d, 2..=2)
    )
}

fn digits_in(s: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_fallback(s: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.date())
        .ok()
}
