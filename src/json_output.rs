//! JSON output format for aggregation reports
//!
//! Every report is wrapped in a small envelope carrying the format version
//! and the dataset's generation time, so downstream chart code can check
//! what it is reading.

use crate::aggregate::{cycle_time_days, infer_year};
use crate::backlog::{CompositionRow, UatAgingReport};
use crate::lifecycle::{phase_durations, PhaseDurations, PhaseSet};
use crate::model::Idea;
use crate::sprint_goals::SprintGoalPoint;
use crate::team::{TeamBucket, TeamRoster};
use serde::Serialize;

/// Per-idea phase breakdown (the `phases` subcommand)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonIdeaPhases {
    pub key: String,
    pub team: TeamBucket,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Parking-lot exit to done, when both are known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_time_days: Option<f64>,
    pub phases: PhaseDurations,
}

impl JsonIdeaPhases {
    pub fn from_idea(idea: &Idea, roster: &TeamRoster, phases: &PhaseSet) -> Self {
        Self {
            key: idea.key.clone(),
            team: roster.primary_bucket(idea),
            year: infer_year(idea),
            cycle_time_days: cycle_time_days(idea),
            phases: phase_durations(idea, phases),
        }
    }
}

/// Sprint-goal series for one team
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonSprintGoals {
    pub team: String,
    pub lookback: usize,
    pub sprints: Vec<SprintGoalPoint>,
}

/// Backlog composition and UAT aging
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonBacklog {
    pub scope: String,
    pub composition: Vec<CompositionRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uat_aging: Option<UatAgingReport>,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<T: Serialize> {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// When the input data was exported, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
    pub report: T,
}

impl<T: Serialize> JsonOutput<T> {
    /// Wrap a report
    pub fn new(report: T) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "ideaflow-json-v1".to_string(),
            generated_at: None,
            report,
        }
    }

    pub fn with_generated_at(mut self, generated_at: Option<String>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
