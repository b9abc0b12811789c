// Lifecycle phase days: per-phase dwell statistics, per year and team
//
// Unlike cycle time, ideas are always bucketed by primary team (no fan-out),
// so a team's phase totals never double count shared work.

use crate::aggregate::totals::{Coverage, YearTotals};
use crate::aggregate::year::infer_year;
use crate::aggregate::TeamSamples;
use crate::lifecycle::{phase_durations, Phase, PhaseDef, PhaseDurations, PhaseSet};
use crate::model::Idea;
use crate::stats::MetricSummary;
use crate::team::{TeamBucket, TeamRoster};
use serde::{Deserialize, Serialize};

/// Statistics for one phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseStats {
    pub phase: Phase,
    #[serde(flatten)]
    pub summary: MetricSummary,
}

/// Phase statistics for one team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPhaseStats {
    pub team: TeamBucket,
    /// One entry per configured phase, in configured order
    pub phases: Vec<PhaseStats>,
}

impl TeamPhaseStats {
    pub fn phase(&self, phase: Phase) -> Option<&MetricSummary> {
        self.phases
            .iter()
            .find(|stats| stats.phase == phase)
            .map(|stats| &stats.summary)
    }
}

/// One year of the lifecycle aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleYear {
    pub year: i32,
    pub teams: Vec<TeamPhaseStats>,
    pub totals: YearTotals,
}

impl LifecycleYear {
    pub fn team(&self, name: &str) -> Option<&TeamPhaseStats> {
        self.teams.iter().find(|stats| stats.team.name() == name)
    }

    /// Phases with a positive sample for at least one team
    pub fn active_phases(&self) -> Vec<Phase> {
        let mut active: Vec<Phase> = Vec::new();
        for stats in self.teams.iter().flat_map(|team| team.phases.iter()) {
            if stats.summary.n > 0 && !active.contains(&stats.phase) {
                active.push(stats.phase);
            }
        }
        active
    }
}

/// Lifecycle phase-days aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleReport {
    /// Phase definitions the report was computed with
    pub phases: Vec<PhaseDef>,
    pub years: Vec<LifecycleYear>,
    pub coverage: Coverage,
}

impl LifecycleReport {
    pub fn year(&self, year: i32) -> Option<&LifecycleYear> {
        self.years.iter().find(|entry| entry.year == year)
    }
}

fn aggregate_year(ideas: &[Idea], roster: &TeamRoster, phases: &PhaseSet, year: i32) -> LifecycleYear {
    let in_year: Vec<(&Idea, PhaseDurations)> = ideas
        .iter()
        .filter(|idea| infer_year(idea) == Some(year))
        .map(|idea| (idea, phase_durations(idea, phases)))
        .collect();

    let display_teams = roster.display_teams(in_year.iter().map(|(idea, _)| *idea));
    let mut per_phase: Vec<(Phase, TeamSamples)> = phases
        .phases()
        .map(|phase| (phase, TeamSamples::new(&display_teams)))
        .collect();

    for (idea, durations) in &in_year {
        let bucket = roster.primary_bucket(idea);
        for (phase, samples) in per_phase.iter_mut() {
            let days = durations.get(*phase);
            // Zero days is indistinguishable from "never entered"
            if days.is_finite() && days > 0.0 {
                samples.push(bucket.clone(), days);
            }
        }
    }

    let sample = in_year
        .iter()
        .filter(|(_, durations)| durations.has_positive())
        .count();

    // Pivot phase -> team into team -> phase
    let mut teams: Vec<TeamPhaseStats> = Vec::new();
    for (phase, samples) in per_phase {
        for (team, summary) in samples.into_summaries() {
            let stats = PhaseStats { phase, summary };
            match teams.iter_mut().find(|entry| entry.team == team) {
                Some(entry) => entry.phases.push(stats),
                None => teams.push(TeamPhaseStats {
                    team,
                    phases: vec![stats],
                }),
            }
        }
    }

    tracing::debug!(year, ideas = in_year.len(), sample, "lifecycle year aggregated");

    let mut totals = YearTotals::tally(year, in_year.iter().map(|(idea, _)| *idea), sample);
    // Lifecycle "ongoing" is whatever did not complete within the year
    totals.ongoing_at_boundary = totals.total.saturating_sub(totals.done);

    LifecycleYear {
        year,
        teams,
        totals,
    }
}

/// Aggregate per-phase dwell times by year and primary-team bucket
///
/// Only positive phase durations enter the sample, so phases an idea never
/// visited do not drag the median toward zero.
pub fn aggregate_lifecycle_days(
    ideas: &[Idea],
    roster: &TeamRoster,
    phases: &PhaseSet,
    years: &[i32],
) -> LifecycleReport {
    let years: Vec<LifecycleYear> = years
        .iter()
        .map(|&year| aggregate_year(ideas, roster, phases, year))
        .collect();

    let coverage = Coverage::assess(
        ideas.len(),
        years.iter().map(|entry| (entry.year, entry.totals.sample)),
    );

    LifecycleReport {
        phases: phases.defs().to_vec(),
        years,
        coverage,
    }
}
