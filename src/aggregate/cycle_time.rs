// Cycle time: parking-lot exit to completion, per year and team

use crate::aggregate::totals::{Coverage, YearTotals};
use crate::aggregate::year::{infer_year, iso_year};
use crate::aggregate::TeamSamples;
use crate::interval::days_between;
use crate::lifecycle::parking_lot_exit_at;
use crate::model::Idea;
use crate::stats::{Metric, MetricSummary};
use crate::team::{contribution_teams, EffortScope, TeamBucket, TeamRoster};
use serde::{Deserialize, Serialize};

/// Cycle-time statistics credited to one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCycleStats {
    pub team: TeamBucket,
    #[serde(flatten)]
    pub summary: MetricSummary,
}

/// One year of the cycle-time aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleTimeYear {
    pub year: i32,
    /// Teams in display order (roster order, `UNMAPPED` last when present)
    pub teams: Vec<TeamCycleStats>,
    pub totals: YearTotals,
}

impl CycleTimeYear {
    /// Statistics for a team by name
    pub fn team(&self, name: &str) -> Option<&MetricSummary> {
        self.teams
            .iter()
            .find(|stats| stats.team.name() == name)
            .map(|stats| &stats.summary)
    }

    /// `(team, value)` pairs of the selected statistic, for plotting
    pub fn metric_series(&self, metric: Metric) -> Vec<(&TeamBucket, Option<f64>)> {
        self.teams
            .iter()
            .map(|stats| (&stats.team, stats.summary.metric(metric)))
            .collect()
    }
}

/// Cycle-time aggregation for one effort scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleTimeReport {
    pub scope: EffortScope,
    pub years: Vec<CycleTimeYear>,
    pub coverage: Coverage,
}

impl CycleTimeReport {
    pub fn year(&self, year: i32) -> Option<&CycleTimeYear> {
        self.years.iter().find(|entry| entry.year == year)
    }

    /// Ideas in scope across all reported years
    pub fn total_ideas(&self) -> usize {
        self.years.iter().map(|entry| entry.totals.total).sum()
    }
}

/// Days from leaving the parking lot to completion, if both are known
///
/// # Example
/// ```
/// use ideaflow::aggregate::cycle_time_days;
/// use ideaflow::model::{Idea, LifecycleEvent};
///
/// let idea = Idea {
///     entered_done: Some("2025-01-21".to_string()),
///     lifecycle_events: vec![LifecycleEvent::new("parking_lot", "design", "2025-01-01")],
///     ..Default::default()
/// };
/// assert_eq!(cycle_time_days(&idea), Some(20.0));
/// ```
pub fn cycle_time_days(idea: &Idea) -> Option<f64> {
    let exit = parking_lot_exit_at(idea)?;
    let done = idea.done_at()?;
    days_between(exit, done)
}

/// Aggregate cycle times by year and credited team
///
/// Ideas are assigned to a year by [`infer_year`] and filtered by effort
/// scope; only those completed within the year with a measurable cycle time
/// form the statistical sample.
pub fn aggregate_cycle_time(
    ideas: &[Idea],
    roster: &TeamRoster,
    scope: EffortScope,
    years: &[i32],
) -> CycleTimeReport {
    let display_teams = roster.display_teams(ideas);

    let years: Vec<CycleTimeYear> = years
        .iter()
        .map(|&year| {
            let in_year: Vec<&Idea> = ideas
                .iter()
                .filter(|idea| infer_year(idea) == Some(year))
                .filter(|idea| scope.matches(idea, roster))
                .collect();

            let mut samples = TeamSamples::new(&display_teams);
            let mut sample = 0;
            for idea in &in_year {
                if iso_year(idea.done_at()) != Some(year) {
                    continue;
                }
                let Some(days) = cycle_time_days(idea) else {
                    continue;
                };
                sample += 1;
                for team in contribution_teams(idea, roster, scope) {
                    samples.push(team, days);
                }
            }

            tracing::debug!(
                year,
                scope = %scope,
                ideas = in_year.len(),
                sample,
                "cycle time year aggregated"
            );

            CycleTimeYear {
                year,
                teams: samples
                    .into_summaries()
                    .map(|(team, summary)| TeamCycleStats { team, summary })
                    .collect(),
                totals: YearTotals::tally(year, in_year.iter().copied(), sample),
            }
        })
        .collect();

    let coverage = Coverage::assess(
        ideas.len(),
        years.iter().map(|entry| (entry.year, entry.totals.sample)),
    );

    CycleTimeReport {
        scope,
        years,
        coverage,
    }
}
