// Year-over-year cycle-time and lifecycle aggregation
//
// Objective: Turn per-idea intervals into per-year, per-team summary tables
// (sample size, median, average) that a chart layer can plot directly.
//
// Both aggregations partition ideas by inferred year first, then by team.
// Cycle time credits multi-team work to every team under the `combined`
// scope; lifecycle phase days always bucket by primary team.

mod cycle_time;
mod lifecycle_days;
mod public;
mod totals;
mod year;

pub use cycle_time::{
    aggregate_cycle_time, cycle_time_days, CycleTimeReport, CycleTimeYear, TeamCycleStats,
};
pub use lifecycle_days::{
    aggregate_lifecycle_days, LifecycleReport, LifecycleYear, PhaseStats, TeamPhaseStats,
};
pub use public::{LenientMap, PublicAggregates, PublicMetric, PublicTotals};
pub use totals::{Coverage, YearTotals};
pub use year::{infer_year, iso_year, year_end};

use crate::stats::MetricSummary;
use crate::team::TeamBucket;

/// Day samples grouped by team, preserving display order
#[derive(Debug, Clone, Default)]
pub(crate) struct TeamSamples {
    groups: Vec<(TeamBucket, Vec<f64>)>,
}

impl TeamSamples {
    /// Seed an empty sample for every displayed team
    pub(crate) fn new(teams: &[TeamBucket]) -> Self {
        Self {
            groups: teams.iter().cloned().map(|team| (team, Vec::new())).collect(),
        }
    }

    /// Record a value, appending the team if it was not seeded
    pub(crate) fn push(&mut self, team: TeamBucket, days: f64) {
        match self.groups.iter_mut().find(|(t, _)| *t == team) {
            Some((_, values)) => values.push(days),
            None => self.groups.push((team, vec![days])),
        }
    }

    pub(crate) fn into_summaries(self) -> impl Iterator<Item = (TeamBucket, MetricSummary)> {
        self.groups
            .into_iter()
            .map(|(team, values)| (team, MetricSummary::from_values(&values)))
    }
}
