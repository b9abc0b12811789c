//! Backlog composition by priority and UAT aging buckets
//!
//! Reads the tracker snapshot (`combinedPoints` time series and the
//! `uatAging` block). Counts that are missing or not finite numbers read as
//! zero, so a partially filled snapshot still renders.

use crate::config::BacklogTeam;
use crate::dataset::{DatasetError, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Issue priority, highest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Highest,
    High,
    Medium,
    Low,
    Lowest,
}

impl Priority {
    pub const ALL: [Priority; 5] = [
        Priority::Highest,
        Priority::High,
        Priority::Medium,
        Priority::Low,
        Priority::Lowest,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Priority::Highest => "highest",
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Lowest => "lowest",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Highest => "Highest",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
            Priority::Lowest => "Lowest",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn to_number(value: Option<&Value>) -> f64 {
    value
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Open-issue counts per priority
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct PriorityBreakdown {
    counts: BTreeMap<Priority, f64>,
}

impl PriorityBreakdown {
    fn from_object(node: &Map<String, Value>) -> Self {
        Self {
            counts: Priority::ALL
                .into_iter()
                .map(|p| (p, to_number(node.get(p.key()))))
                .collect(),
        }
    }

    pub fn get(&self, priority: Priority) -> f64 {
        self.counts.get(&priority).copied().unwrap_or(0.0)
    }

    /// Sum over all priorities
    pub fn total(&self) -> f64 {
        Priority::ALL.into_iter().map(|p| self.get(p)).sum()
    }
}

/// One team's backlog at a snapshot point
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TeamBacklog {
    pub priorities: PriorityBreakdown,
    pub longstanding_30d_plus: f64,
    pub longstanding_60d_plus: f64,
}

impl TeamBacklog {
    fn from_object(node: &Map<String, Value>) -> Self {
        Self {
            priorities: PriorityBreakdown::from_object(node),
            longstanding_30d_plus: to_number(node.get("longstanding_30d_plus")),
            longstanding_60d_plus: to_number(node.get("longstanding_60d_plus")),
        }
    }
}

/// A dated snapshot of every team's backlog
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BacklogPoint {
    pub date: String,
    /// Keyed by the team key used in the snapshot (`api`, `bc`, ...)
    pub teams: BTreeMap<String, TeamBacklog>,
}

impl BacklogPoint {
    fn from_value(node: &Value) -> Option<Self> {
        let fields = node.as_object()?;
        let date = fields
            .get("date")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let teams = fields
            .iter()
            .filter_map(|(key, value)| {
                value
                    .as_object()
                    .map(|team| (key.clone(), TeamBacklog::from_object(team)))
            })
            .collect();
        Some(Self { date, teams })
    }
}

/// A UAT aging bucket, e.g. `0-7` days
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UatBucket {
    pub id: String,
    pub label: String,
}

/// Issues waiting in UAT, per priority and age bucket
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct UatAging {
    pub scope_label: String,
    pub total_issues: f64,
    pub buckets: Vec<UatBucket>,
    counts: BTreeMap<Priority, BTreeMap<String, f64>>,
}

impl UatAging {
    fn from_value(node: &Value) -> Self {
        let scope_label = node
            .pointer("/scope/label")
            .and_then(Value::as_str)
            .unwrap_or("Broadcast")
            .to_string();
        let buckets = node
            .get("buckets")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        let id = match item.get("id")? {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        };
                        let label = item
                            .get("label")
                            .and_then(Value::as_str)
                            .map(str::to_string)
                            .unwrap_or_else(|| id.clone());
                        Some(UatBucket { id, label })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let mut counts = BTreeMap::new();
        for priority in Priority::ALL {
            let per_bucket: BTreeMap<String, f64> = node
                .pointer(&format!("/priorities/{}/buckets", priority.key()))
                .and_then(Value::as_object)
                .map(|cells| {
                    cells
                        .iter()
                        .map(|(id, value)| (id.clone(), to_number(Some(value))))
                        .collect()
                })
                .unwrap_or_default();
            counts.insert(priority, per_bucket);
        }

        Self {
            scope_label,
            total_issues: to_number(node.get("totalIssues")),
            buckets,
            counts,
        }
    }

    /// Count for a priority in a bucket
    pub fn count(&self, priority: Priority, bucket_id: &str) -> f64 {
        self.counts
            .get(&priority)
            .and_then(|cells| cells.get(bucket_id))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Tracker snapshot with backlog history and UAT aging
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BacklogSnapshot {
    pub updated_at: Option<String>,
    pub points: Vec<BacklogPoint>,
    pub uat_aging: Option<UatAging>,
}

impl BacklogSnapshot {
    /// Read a snapshot document leniently
    pub fn from_value(document: &Value) -> Self {
        let points = document
            .get("combinedPoints")
            .and_then(Value::as_array)
            .map(|nodes| nodes.iter().filter_map(BacklogPoint::from_value).collect())
            .unwrap_or_default();
        let uat_aging = document
            .get("uatAging")
            .filter(|node| node.is_object())
            .map(UatAging::from_value);

        Self {
            updated_at: document
                .get("updatedAt")
                .and_then(Value::as_str)
                .map(str::to_string),
            points,
            uat_aging,
        }
    }

    /// Load a snapshot file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DatasetError::FileNotFound(path.display().to_string()));
        }
        let document: Value = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        let snapshot = Self::from_value(&document);
        tracing::debug!(
            points = snapshot.points.len(),
            has_uat = snapshot.uat_aging.is_some(),
            "backlog snapshot loaded"
        );
        Ok(snapshot)
    }
}

/// Teams selected by a scope: `all`, or a single team key
pub fn select_teams<'a>(teams: &'a [BacklogTeam], scope: &str) -> Vec<&'a BacklogTeam> {
    if scope == "all" {
        teams.iter().collect()
    } else {
        teams.iter().filter(|team| team.key == scope).collect()
    }
}

/// One bar of the composition chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionRow {
    pub date: String,
    pub team: String,
    pub priorities: PriorityBreakdown,
    pub total: f64,
}

/// Priority composition per point and selected team
///
/// A point without data for a team yields an all-zero row.
pub fn composition(points: &[BacklogPoint], teams: &[&BacklogTeam]) -> Vec<CompositionRow> {
    let empty = TeamBacklog::default();
    let empty = &empty;
    points
        .iter()
        .flat_map(|point| {
            teams.iter().map(move |team| {
                let backlog = point.teams.get(&team.key).unwrap_or(empty);
                CompositionRow {
                    date: point.date.clone(),
                    team: team.label.clone(),
                    priorities: backlog.priorities.clone(),
                    total: backlog.priorities.total(),
                }
            })
        })
        .collect()
}

/// One age bucket of the UAT chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UatBucketRow {
    pub id: String,
    pub label: String,
    /// Counts of the active priorities, in priority order
    pub counts: Vec<(Priority, f64)>,
    pub total: f64,
}

/// UAT aging grouped by bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UatAgingReport {
    pub scope_label: String,
    pub total_issues: f64,
    /// Priorities with a positive count in at least one bucket
    pub priorities: Vec<Priority>,
    pub buckets: Vec<UatBucketRow>,
}

/// Group UAT issues by age bucket; `None` when the snapshot defines no buckets
pub fn uat_aging(uat: &UatAging) -> Option<UatAgingReport> {
    if uat.buckets.is_empty() {
        return None;
    }

    let priorities: Vec<Priority> = Priority::ALL
        .into_iter()
        .filter(|&p| uat.buckets.iter().any(|b| uat.count(p, &b.id) > 0.0))
        .collect();

    let buckets = uat
        .buckets
        .iter()
        .map(|bucket| {
            let counts: Vec<(Priority, f64)> = priorities
                .iter()
                .map(|&p| (p, uat.count(p, &bucket.id)))
                .collect();
            UatBucketRow {
                id: bucket.id.clone(),
                label: bucket.label.clone(),
                total: counts.iter().map(|(_, n)| n).sum(),
                counts,
            }
        })
        .collect();

    Some(UatAgingReport {
        scope_label: uat.scope_label.clone(),
        total_issues: uat.total_issues,
        priorities,
        buckets,
    })
}
