//! Timestamp parsing and elapsed-day intervals
//!
//! Every duration in the engine is expressed in days rounded to two decimals.
//! Invalid input never produces an error: an unparseable or inverted interval
//! is `None`, so folds can skip it without treating it as zero.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Naive date-time layouts accepted after RFC 3339 fails (interpreted as UTC)
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset layouts without a colon in the zone (e.g. `+0000` from tracker exports)
const OFFSET_LAYOUTS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parse an ISO-8601-like timestamp into UTC
///
/// Accepts RFC 3339, offsets without a colon, naive date-times (UTC) and
/// bare `YYYY-MM-DD` dates (midnight UTC). Surrounding whitespace is ignored.
///
/// # Example
/// ```
/// use ideaflow::interval::parse_timestamp;
///
/// assert!(parse_timestamp("2025-01-01").is_some());
/// assert!(parse_timestamp("2025-01-01T08:30:00Z").is_some());
/// assert!(parse_timestamp("next tuesday").is_none());
/// ```
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for layout in OFFSET_LAYOUTS {
        if let Ok(parsed) = DateTime::parse_from_str(value, layout) {
            return Some(parsed.with_timezone(&Utc));
        }
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, layout) {
            return Some(parsed.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

/// Elapsed days between two instants, `None` when `end` precedes `start`
pub fn elapsed_days(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<f64> {
    if end < start {
        return None;
    }
    let millis = (end - start).num_milliseconds() as f64;
    Some(round2(millis / MILLIS_PER_DAY))
}

/// Elapsed days between two timestamps
///
/// Returns `None` if either side fails to parse or the interval is inverted;
/// otherwise the non-negative day count rounded to two decimals.
///
/// # Example
/// ```
/// use ideaflow::interval::days_between;
///
/// assert_eq!(days_between("2025-01-01", "2025-01-11"), Some(10.0));
/// assert_eq!(days_between("2025-01-11", "2025-01-01"), None);
/// ```
pub fn days_between(start: &str, end: &str) -> Option<f64> {
    let start_at = parse_timestamp(start)?;
    let end_at = parse_timestamp(end)?;
    elapsed_days(start_at, end_at)
}

/// Elapsed days between two optional instants
pub fn days_between_instants(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Option<f64> {
    elapsed_days(start?, end?)
}
