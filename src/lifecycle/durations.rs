// Phase-duration reconstruction
//
// Replays an idea's sparse event trail as a fold carrying the current phase,
// the time it was entered, and the per-phase totals. Intervals that cannot be
// measured (unparseable or inverted) are omitted, never counted as zero.

use crate::interval::{days_between_instants, parse_timestamp, round2};
use crate::lifecycle::events::{normalize_events, TimelineEvent};
use crate::lifecycle::{Phase, PhaseSet};
use crate::model::Idea;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Days spent in each configured phase for one idea
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseDurations {
    days: BTreeMap<Phase, f64>,
}

impl PhaseDurations {
    /// Zero entry for every configured phase
    pub fn zeroed(phases: &PhaseSet) -> Self {
        Self {
            days: phases.phases().map(|phase| (phase, 0.0)).collect(),
        }
    }

    /// Days spent in `phase` (0 when never entered or not configured)
    pub fn get(&self, phase: Phase) -> f64 {
        self.days.get(&phase).copied().unwrap_or(0.0)
    }

    /// Phases with their day totals
    pub fn iter(&self) -> impl Iterator<Item = (Phase, f64)> + '_ {
        self.days.iter().map(|(phase, days)| (*phase, *days))
    }

    /// Whether any phase recorded a positive duration
    pub fn has_positive(&self) -> bool {
        self.days.values().any(|days| days.is_finite() && *days > 0.0)
    }

    /// Sum across all phases
    pub fn total(&self) -> f64 {
        round2(self.days.values().sum())
    }

    fn add(&mut self, phase: Phase, days: f64) {
        if let Some(total) = self.days.get_mut(&phase) {
            *total += days;
        }
    }

    fn rounded(mut self) -> Self {
        for days in self.days.values_mut() {
            *days = round2(*days);
        }
        self
    }
}

/// Fold state: where the idea currently is and since when
#[derive(Debug, Clone)]
struct Replay {
    phase: Option<Phase>,
    entered_at: Option<DateTime<Utc>>,
    totals: PhaseDurations,
}

impl Replay {
    /// Seed from the first event: its source phase, else its target phase
    fn seed(first: &TimelineEvent<'_>, phases: &PhaseSet) -> Self {
        let phase = phases
            .resolve(first.from_stage)
            .or_else(|| phases.resolve(first.to_stage));
        Self {
            phase,
            entered_at: phase.and(first.instant),
            totals: PhaseDurations::zeroed(phases),
        }
    }

    /// Credit the open interval to the current phase, if it can be measured
    fn close_interval(&mut self, until: Option<DateTime<Utc>>) {
        if let Some(phase) = self.phase {
            if let Some(days) = days_between_instants(self.entered_at, until) {
                self.totals.add(phase, days);
            }
        }
    }

    fn step(mut self, event: &TimelineEvent<'_>, phases: &PhaseSet) -> Self {
        self.close_interval(event.instant);
        if !event.to_stage.is_empty() {
            // Unrecognized targets leave the idea outside any tracked phase
            self.phase = phases.resolve(event.to_stage);
        }
        self.entered_at = event.instant;
        self
    }
}

/// Replay a normalized timeline, closing the tail at `done_at`
///
/// If the idea never completed, the last phase stays open and contributes no
/// tail interval.
pub fn replay_timeline(
    timeline: &[TimelineEvent<'_>],
    done_at: Option<&str>,
    phases: &PhaseSet,
) -> PhaseDurations {
    let Some(first) = timeline.first() else {
        return PhaseDurations::zeroed(phases);
    };

    let mut state = timeline
        .iter()
        .fold(Replay::seed(first, phases), |state, event| {
            state.step(event, phases)
        });
    state.close_interval(done_at.and_then(parse_timestamp));
    state.totals.rounded()
}

/// Days an idea spent in each configured phase
///
/// # Example
/// ```
/// use ideaflow::lifecycle::{phase_durations, Phase, PhaseSet};
/// use ideaflow::model::{Idea, LifecycleEvent};
///
/// let idea = Idea {
///     entered_done: Some("2025-01-21".to_string()),
///     lifecycle_events: vec![
///         LifecycleEvent::new("parking_lot", "design", "2025-01-01"),
///         LifecycleEvent::new("design", "in_development", "2025-01-11"),
///     ],
///     ..Default::default()
/// };
/// let days = phase_durations(&idea, &PhaseSet::default());
/// assert_eq!(days.get(Phase::Design), 10.0);
/// assert_eq!(days.get(Phase::InDevelopment), 10.0);
/// assert_eq!(days.get(Phase::ParkingLot), 0.0);
/// ```
pub fn phase_durations(idea: &Idea, phases: &PhaseSet) -> PhaseDurations {
    let timeline = normalize_events(&idea.lifecycle_events);
    replay_timeline(&timeline, idea.done_at(), phases)
}
