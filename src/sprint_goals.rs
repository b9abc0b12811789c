// Sprint-goal success rates over the most recent sprints
//
// Input is a hand-maintained JSON file, so everything is read leniently:
// sprints without a `YYYY-MM-DD` start are dropped, missing team rows count
// as 0 of 0 goals, and non-numeric counts read as zero.

use crate::dataset::{DatasetError, Result};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use std::sync::OnceLock;

fn sprint_date() -> &'static Regex {
    static SPRINT_DATE: OnceLock<Regex> = OnceLock::new();
    SPRINT_DATE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid sprint date regex"))
}

/// Finite JSON number, zero otherwise
fn to_number(value: Option<&Value>) -> f64 {
    value
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// One team's goal counts for a sprint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintTeamGoals {
    pub team: String,
    pub goals_total: f64,
    pub goals_passed: f64,
}

/// A sprint with a valid start date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sprint {
    pub sprint_start: String,
    pub teams: Vec<SprintTeamGoals>,
}

impl Sprint {
    fn from_value(node: &Value) -> Option<Self> {
        let sprint_start = node.get("sprint_start")?.as_str()?;
        if !sprint_date().is_match(sprint_start) {
            return None;
        }
        let teams = node
            .get("teams")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .map(|row| SprintTeamGoals {
                        team: row
                            .get("team")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        goals_total: to_number(row.get("goals_total")),
                        goals_passed: to_number(row.get("goals_passed")),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(Self {
            sprint_start: sprint_start.to_string(),
            teams,
        })
    }

    /// Goal counts for a team; 0 of 0 when the sprint has no row for it
    pub fn goals(&self, team: &str) -> (f64, f64) {
        self.teams
            .iter()
            .find(|row| row.team == team)
            .map(|row| (row.goals_total, row.goals_passed))
            .unwrap_or((0.0, 0.0))
    }
}

/// Valid sprints, ascending by start date
pub fn normalize_sprints(document: &Value) -> Vec<Sprint> {
    let mut sprints: Vec<Sprint> = document
        .get("sprints")
        .and_then(Value::as_array)
        .map(|nodes| nodes.iter().filter_map(Sprint::from_value).collect())
        .unwrap_or_default();
    sprints.sort_by(|a, b| a.sprint_start.cmp(&b.sprint_start));
    sprints
}

/// Load and normalize a sprint-goals file
pub fn load_sprints<P: AsRef<Path>>(path: P) -> Result<Vec<Sprint>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DatasetError::FileNotFound(path.display().to_string()));
    }
    let document: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
    let sprints = normalize_sprints(&document);
    tracing::debug!(sprints = sprints.len(), "sprint goals loaded");
    Ok(sprints)
}

/// `MM/DD` label for a `YYYY-MM-DD` date
pub fn short_date(date: &str) -> String {
    let mut parts = date.splitn(3, '-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day))
            if !year.is_empty() && !month.is_empty() && !day.is_empty() =>
        {
            format!("{}/{}", month, day)
        }
        _ => date.to_string(),
    }
}

/// One sprint in a team's success-rate series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SprintGoalPoint {
    pub sprint_start: String,
    /// `MM/DD` of the sprint start
    pub label: String,
    pub total: f64,
    pub passed: f64,
    /// `passed / total * 100`, or 0 when no goals were set
    pub success_rate_pct: f64,
}

/// Team to chart: the requested one when configured, else the first configured
pub fn resolve_team<'a>(requested: Option<&str>, teams: &'a [String]) -> Option<&'a str> {
    requested
        .and_then(|wanted| teams.iter().find(|team| team.as_str() == wanted))
        .or_else(|| teams.first())
        .map(String::as_str)
}

/// Success-rate series for a team over the last `lookback` sprints
///
/// # Example
/// ```
/// use ideaflow::sprint_goals::{normalize_sprints, sprint_goal_series};
///
/// let doc = serde_json::json!({ "sprints": [
///     { "sprint_start": "2026-01-12", "teams": [{ "team": "API", "goals_total": 4, "goals_passed": 3 }] }
/// ]});
/// let series = sprint_goal_series(&normalize_sprints(&doc), "API", 6);
/// assert_eq!(series[0].label, "01/12");
/// assert_eq!(series[0].success_rate_pct, 75.0);
/// ```
pub fn sprint_goal_series(sprints: &[Sprint], team: &str, lookback: usize) -> Vec<SprintGoalPoint> {
    let start = sprints.len().saturating_sub(lookback);
    sprints[start..]
        .iter()
        .map(|sprint| {
            let (total, passed) = sprint.goals(team);
            SprintGoalPoint {
                sprint_start: sprint.sprint_start.clone(),
                label: short_date(&sprint.sprint_start),
                total,
                passed,
                success_rate_pct: if total > 0.0 {
                    passed / total * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}
