// Event normalization: drop unanchored events, order the rest by occurrence

use crate::interval::parse_timestamp;
use crate::lifecycle::Phase;
use crate::model::{non_blank, Idea, LifecycleEvent};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

/// A lifecycle event with trimmed stages and a pre-parsed timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineEvent<'a> {
    pub from_stage: &'a str,
    pub to_stage: &'a str,
    /// Raw timestamp text (never empty)
    pub at: &'a str,
    /// Parsed timestamp, `None` when `at` is not a recognizable time
    pub instant: Option<DateTime<Utc>>,
}

impl<'a> TimelineEvent<'a> {
    fn from_raw(event: &'a LifecycleEvent) -> Option<Self> {
        let at = event.at.trim();
        if at.is_empty() {
            return None;
        }
        Some(Self {
            from_stage: event.from_stage.trim(),
            to_stage: event.to_stage.trim(),
            at,
            instant: parse_timestamp(at),
        })
    }
}

/// Chronological order; events whose time cannot be parsed sort last
fn by_instant(a: &TimelineEvent<'_>, b: &TimelineEvent<'_>) -> Ordering {
    match (a.instant, b.instant) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Normalize an idea's raw event list
///
/// Events without a timestamp are dropped; the remainder is sorted ascending
/// by time. The sort is stable, so simultaneous events keep their stored order.
pub fn normalize_events(events: &[LifecycleEvent]) -> Vec<TimelineEvent<'_>> {
    let mut timeline: Vec<TimelineEvent<'_>> =
        events.iter().filter_map(TimelineEvent::from_raw).collect();
    timeline.sort_by(by_instant);
    timeline
}

/// When the idea left the parking lot
///
/// The first event, in storage order, moving out of `parking_lot` into a
/// different, non-empty stage and carrying a timestamp; falls back to the
/// `entered_parking_lot` milestone.
pub fn parking_lot_exit_at(idea: &Idea) -> Option<&str> {
    let parking_lot = Phase::ParkingLot.key();
    idea.lifecycle_events
        .iter()
        .filter(|event| event.from_stage.trim() == parking_lot)
        .filter(|event| {
            let to_stage = event.to_stage.trim();
            !to_stage.is_empty() && to_stage != parking_lot
        })
        .find_map(|event| non_blank(Some(event.at.as_str())))
        .or_else(|| non_blank(idea.entered_parking_lot.as_deref()))
}
