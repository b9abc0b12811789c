// Lifecycle phase-duration reconstruction
//
// Objective: Attribute elapsed calendar time to product lifecycle phases from
// a sparse, possibly unordered trail of stage transitions.
//
// Key Insight: The trail records only the moments an idea moved. Time in a
// phase is the gap between entering it and the next transition, with the
// completion milestone closing the final interval.

mod durations;
mod events;
mod phase;

pub use durations::{phase_durations, replay_timeline, PhaseDurations};
pub use events::{normalize_events, parking_lot_exit_at, TimelineEvent};
pub use phase::{Phase, PhaseDef, PhaseSet};
