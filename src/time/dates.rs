//! UTC date kernel.
//!
//! Every date in the engine is a calendar day at UTC midnight, represented as a
//! [`NaiveDate`]. Time-of-day is discarded on parse; offsets are applied first so
//! `2025-01-15T23:30:00-05:00` lands on `2025-01-16`.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, Utc, Weekday};

use crate::errors::{ForecastError, Result};
use crate::time::Clock;

const YMD: &str = "%Y-%m-%d";
const ISO_WITH_OFFSET: &str = "%Y-%m-%dT%H:%M:%S%.f%#z";
const ISO_NAIVE: &str = "%Y-%m-%dT%H:%M:%S%.f";
const SPACED_WITH_OFFSET: &str = "%Y-%m-%d %H:%M:%S%.f%#z";

/// Parses one of the three accepted shapes into the UTC calendar day it denotes.
///
/// Accepted inputs:
/// * ISO-8601 with `T`, optionally followed by `Z` or a numeric offset
/// * `YYYY-MM-DD HH:MM:SS±HH` (minutes on the offset are optional)
/// * bare `YYYY-MM-DD`
pub fn parse_utc(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    let invalid = || ForecastError::InvalidDateFormat(input.to_string());
    if !trimmed.get(..10).is_some_and(is_ymd_shape) {
        return Err(invalid());
    }

    if trimmed.len() == 10 {
        return NaiveDate::parse_from_str(trimmed, YMD).map_err(|_| invalid());
    }

    match trimmed.as_bytes()[10] {
        b'T' => parse_iso(trimmed).ok_or_else(invalid),
        b' ' => DateTime::parse_from_str(trimmed, SPACED_WITH_OFFSET)
            .map(|dt| dt.with_timezone(&Utc).date_naive())
            .map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn parse_iso(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, ISO_WITH_OFFSET) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(value, ISO_NAIVE)
        .ok()
        .map(|naive| naive.date())
}

/// Current UTC day according to the injected clock.
pub fn today(clock: &dyn Clock) -> NaiveDate {
    clock.today()
}

/// Shifts `date` by `n` whole days, saturating at the representable range.
pub fn add_days(date: NaiveDate, n: i64) -> NaiveDate {
    let shifted = if n >= 0 {
        date.checked_add_days(Days::new(n.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(n.unsigned_abs()))
    };
    shifted.unwrap_or(if n >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
}

/// Signed whole days from `a` to `b` (`b - a`).
pub fn diff_days(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days()
}

pub fn format_ymd(date: NaiveDate) -> String {
    date.format(YMD).to_string()
}

/// Inclusive on both ends.
pub fn is_within_range(date: NaiveDate, start: NaiveDate, end: NaiveDate) -> bool {
    date >= start && date <= end
}

/// Strict `YYYY-MM-DD` check that also rejects impossible days such as `2025-02-30`.
pub fn is_valid_date_string(value: &str) -> bool {
    value.len() == 10 && is_ymd_shape(value) && NaiveDate::parse_from_str(value, YMD).is_ok()
}

/// Returns the `YYYY-MM-DD` prefix of any accepted input, without timezone conversion.
pub fn extract_date_only(value: &str) -> Result<String> {
    parse_utc(value)?;
    value
        .trim()
        .get(..10)
        .filter(|prefix| is_valid_date_string(prefix))
        .map(str::to_string)
        .ok_or_else(|| ForecastError::InvalidDateFormat(value.to_string()))
}

/// Calendar-month addition; the day is clamped to the target month's length.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

/// Whole calendar months from `a`'s month to `b`'s month, ignoring the day.
pub fn months_between(a: NaiveDate, b: NaiveDate) -> i64 {
    let a_idx = i64::from(a.year()) * 12 + i64::from(a.month0());
    let b_idx = i64::from(b.year()) * 12 + i64::from(b.month0());
    b_idx - a_idx
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    add_months(start_of_month(date), 1)
        .map(|next| add_days(next, -1))
        .unwrap_or(date)
}

pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

pub fn start_of_quarter(date: NaiveDate) -> NaiveDate {
    let first_month = date.month0() / 3 * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), first_month, 1).unwrap_or(date)
}

pub fn start_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

pub fn end_of_year(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(date)
}

fn is_ymd_shape(value: &str) -> bool {
    value.len() == 10
        && value.bytes().enumerate().all(|(idx, byte)| match idx {
            4 | 7 => byte == b'-',
            _ => byte.is_ascii_digit(),
        })
}
