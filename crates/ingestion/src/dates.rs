//! Normalization of raw date strings to UTC calendar days.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use newslabel_core::{Day, Error, Result};

/// Offset-bearing layouts, converted to UTC before the time of day is dropped.
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Naive layouts, read as UTC.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse a date or timestamp string into its UTC calendar day.
pub fn parse_daily_date(raw: &str) -> Result<Day> {
    let s = raw.trim();
    let s = s.strip_suffix("UTC").map(str::trim_end).unwrap_or(s);
    if s.is_empty() {
        return Err(Error::parse("empty date"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc).date_naive());
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| Error::parse(format!("unrecognized date '{raw}'")))
}
