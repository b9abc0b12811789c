// Year partitioning for year-over-year comparison

use crate::model::Idea;
use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;

fn date_prefix() -> &'static Regex {
    static DATE_PREFIX: OnceLock<Regex> = OnceLock::new();
    DATE_PREFIX.get_or_init(|| Regex::new(r"^(\d{4})-\d{2}-\d{2}").expect("valid date regex"))
}

/// Calendar year from a `YYYY-MM-DD...` prefix
pub fn iso_year(value: Option<&str>) -> Option<i32> {
    let value = value?.trim();
    date_prefix()
        .captures(value)
        .and_then(|caps| caps.get(1))
        .and_then(|year| year.as_str().parse().ok())
}

/// Year an idea belongs to
///
/// Milestones are consulted in precedence order (completion first, then the
/// SFD start, then entry into each phase); the first one carrying a date
/// decides. Without any, the first stored event's timestamp is used.
pub fn infer_year(idea: &Idea) -> Option<i32> {
    [
        &idea.entered_done,
        &idea.sfd_start,
        &idea.entered_parking_lot,
        &idea.entered_design,
        &idea.entered_ready_for_development,
        &idea.entered_in_development,
    ]
    .into_iter()
    .find_map(|milestone| iso_year(milestone.as_deref()))
    .or_else(|| {
        idea.lifecycle_events
            .first()
            .and_then(|event| iso_year(Some(&event.at)))
    })
}

/// Last instant of a calendar year (23:59:59.999 UTC on 31 December)
pub fn year_end(year: i32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, 12, 31, 23, 59, 59)
        .single()
        .map(|at| at + chrono::Duration::milliseconds(999))
}
