//! Mixed-format timestamp parsing
//!
//! A single column may mix ISO date-times with offsets, naive date-times and
//! plain calendar dates. Offsets are dropped and the wall-clock time kept, so
//! every value ends up as a timezone-naive `NaiveDateTime`.
//!
//! Dash- and dot-separated dates with the year last are read day-first
//! (`15-03-2259` is 15 March). Slash-separated dates with the year last are
//! read month-first (`03/15/2259`).

use crate::error::{AnalysisError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M%:z",
    "%Y-%m-%dT%H:%M%:z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%d-%m-%Y %H:%M:%S%.f",
    "%d-%m-%Y %H:%M",
    "%d.%m.%Y %H:%M:%S%.f",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d.%m.%Y", "%m/%d/%Y"];

/// Parse a timestamp in any supported format
///
/// Returns `None` when no format matches.
///
/// # Example
/// ```
/// use ally_cutover::timestamp::parse_timestamp;
///
/// let a = parse_timestamp("2259-03-15T10:30:00+02:00").unwrap();
/// let b = parse_timestamp("2259-03-15 10:30:00").unwrap();
/// assert_eq!(a, b); // offset dropped, wall clock kept
/// ```
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    // "...Z" with a space separator is not RFC 3339 but shows up in exports
    let with_offset = match s.strip_suffix(['Z', 'z']) {
        Some(stripped) => format!("{}+00:00", stripped),
        None => s.to_string(),
    };
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, fmt) {
            return Some(dt.naive_local());
        }
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    DATE_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(s, fmt)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

/// Parse a required timestamp field
///
/// Empty or unparseable values are fatal.
pub fn parse_required(field: &'static str, raw: &str) -> Result<NaiveDateTime> {
    parse_timestamp(raw).ok_or_else(|| AnalysisError::DateParse {
        field,
        value: raw.to_string(),
    })
}

/// Parse an optional timestamp field
///
/// Empty cells are missing values. Non-empty values that don't parse are fatal.
pub fn parse_optional(field: &'static str, raw: &str) -> Result<Option<NaiveDateTime>> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_required(field, raw).map(Some)
}
