//! Product-cycle dataset loading
//!
//! A dataset is a JSON document exported from the issue tracker:
//!
//! ```json
//! {
//!   "generatedAt": "2026-02-01T08:00:00Z",
//!   "teams": ["API", "Frontend"],
//!   "ideas": [ { "key": "IDEA-1", "primary_team": "API", ... } ],
//!   "publicAggregates": { "cycleTime": { ... }, "lifecyclePhaseDays": { ... } }
//! }
//! ```
//!
//! Loading is lenient about content: a mistyped field inside an idea reads
//! as empty, so the idea still counts toward the year totals. Only a record
//! that is not an object at all is skipped, with a warning. Unreadable files
//! and invalid JSON syntax are errors.

use crate::aggregate::{
    aggregate_cycle_time, aggregate_lifecycle_days, CycleTimeReport, LifecycleReport,
    PublicAggregates,
};
use crate::lifecycle::PhaseSet;
use crate::model::Idea;
use crate::team::{EffortScope, TeamRoster};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset file not found: {0}")]
    FileNotFound(String),

    #[error("Invalid dataset JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for dataset operations
pub type Result<T> = std::result::Result<T, DatasetError>;

/// Ideas plus the roster and optional pre-computed aggregates
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub generated_at: Option<String>,
    /// Roster shipped with the data; empty when the export has none
    pub teams: TeamRoster,
    pub ideas: Vec<Idea>,
    pub public_aggregates: Option<PublicAggregates>,
}

impl Dataset {
    /// Parse a dataset document
    ///
    /// # Errors
    /// Returns [`DatasetError::InvalidJson`] when the text is not JSON.
    ///
    /// # Example
    /// ```
    /// use ideaflow::dataset::Dataset;
    ///
    /// let dataset = Dataset::from_json_str(r#"{
    ///     "teams": ["API"],
    ///     "ideas": [{ "key": "IDEA-1", "primary_team": "API" }, 42]
    /// }"#)?;
    /// assert_eq!(dataset.ideas.len(), 1);
    /// # Ok::<(), ideaflow::dataset::DatasetError>(())
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(document))
    }

    /// Build a dataset from an already parsed document
    pub fn from_value(document: Value) -> Self {
        let Value::Object(mut root) = document else {
            tracing::warn!("dataset root is not an object, treating as empty");
            return Self::default();
        };

        let generated_at = root
            .get("generatedAt")
            .and_then(Value::as_str)
            .map(str::to_string);

        let teams = match root.get("teams") {
            Some(Value::Array(names)) => TeamRoster::new(names.iter().filter_map(Value::as_str)),
            _ => TeamRoster::default(),
        };

        let ideas = match root.remove("ideas") {
            Some(Value::Array(records)) => parse_ideas(records),
            Some(Value::Null) | None => Vec::new(),
            Some(_) => {
                tracing::warn!("dataset 'ideas' is not an array, ignoring it");
                Vec::new()
            }
        };

        let public_aggregates = match root.remove("publicAggregates") {
            Some(node @ Value::Object(_)) => match serde_json::from_value(node) {
                Ok(aggregates) => Some(aggregates),
                Err(e) => {
                    tracing::warn!(error = %e, "unreadable publicAggregates, ignoring them");
                    None
                }
            },
            _ => None,
        };

        tracing::debug!(
            ideas = ideas.len(),
            teams = teams.len(),
            has_aggregates = public_aggregates.is_some(),
            "dataset loaded"
        );

        Self {
            generated_at,
            teams,
            ideas,
            public_aggregates,
        }
    }

    /// Load a dataset from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DatasetError::FileNotFound(path.display().to_string()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Roster to aggregate with: the dataset's own when it ships one
    pub fn roster(&self, configured: &TeamRoster) -> TeamRoster {
        if self.teams.is_empty() {
            configured.clone()
        } else {
            self.teams.clone()
        }
    }

    /// Whether reports come from the pre-computed tables
    pub fn uses_public_aggregates(&self) -> bool {
        self.ideas.is_empty() && self.public_aggregates.is_some()
    }

    /// Cycle-time report from raw ideas, or from published tables when the
    /// dataset carries no ideas
    ///
    /// Published tables carry their own team set, so only the dataset's
    /// roster (never the configured one) orders them.
    pub fn cycle_time(
        &self,
        configured: &TeamRoster,
        scope: EffortScope,
        years: &[i32],
    ) -> CycleTimeReport {
        match &self.public_aggregates {
            Some(published) if self.ideas.is_empty() => {
                published.cycle_time_report(&self.teams, scope, years)
            }
            _ => aggregate_cycle_time(&self.ideas, &self.roster(configured), scope, years),
        }
    }

    /// Lifecycle phase-days report, with the same fallback as [`Self::cycle_time`]
    pub fn lifecycle(
        &self,
        configured: &TeamRoster,
        phases: &PhaseSet,
        years: &[i32],
    ) -> LifecycleReport {
        match &self.public_aggregates {
            Some(published) if self.ideas.is_empty() => {
                published.lifecycle_report(&self.teams, phases, years)
            }
            _ => aggregate_lifecycle_days(&self.ideas, &self.roster(configured), phases, years),
        }
    }
}

fn parse_ideas(records: Vec<Value>) -> Vec<Idea> {
    let mut ideas = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        if !record.is_object() {
            tracing::warn!(index, "skipping non-object idea record");
            continue;
        }
        match serde_json::from_value::<Idea>(record) {
            Ok(idea) => ideas.push(idea),
            Err(e) => tracing::warn!(index, error = %e, "skipping malformed idea record"),
        }
    }
    ideas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::Coverage;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "generatedAt": "2026-02-01T08:00:00Z",
        "teams": ["API", "", "Frontend", 7],
        "ideas": [
            {
                "key": "IDEA-1",
                "primary_team": "API",
                "entered_done": "2025-01-21",
                "lifecycle_events": [
                    { "from_stage": "parking_lot", "to_stage": "design", "at": "2025-01-01" }
                ]
            },
            { "key": "IDEA-2", "teams": null, "lifecycle_events": null },
            { "key": "IDEA-3", "entered_done": 2025 },
            "garbage"
        ]
    }"#;

    #[test]
    fn test_lenient_parse() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        assert_eq!(dataset.generated_at.as_deref(), Some("2026-02-01T08:00:00Z"));
        assert_eq!(dataset.teams.teams(), ["API", "Frontend"]);

        let keys: Vec<&str> = dataset.ideas.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["IDEA-1", "IDEA-2", "IDEA-3"]);
        assert!(dataset.ideas[1].teams.is_empty());
        assert_eq!(dataset.ideas[2].entered_done.as_deref(), Some("2025"));
        assert!(dataset.public_aggregates.is_none());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            Dataset::from_json_str("{ not json"),
            Err(DatasetError::InvalidJson(_))
        ));
    }

    #[test]
    fn test_odd_shapes_become_empty() {
        assert!(Dataset::from_json_str("[]").unwrap().ideas.is_empty());
        let dataset = Dataset::from_json_str(r#"{ "ideas": {"a": 1}, "teams": "API" }"#).unwrap();
        assert!(dataset.ideas.is_empty());
        assert!(dataset.teams.is_empty());
    }

    #[test]
    fn test_mistyped_ideas_still_counted() {
        let dataset = Dataset::from_json_str(
            r#"{
                "teams": ["API"],
                "ideas": [
                    {
                        "key": "IDEA-1",
                        "primary_team": "API",
                        "teams": "API",
                        "entered_done": "2025-03-21",
                        "lifecycle_events": [
                            { "from_stage": "parking_lot", "to_stage": "design", "at": "2025-03-01" }
                        ]
                    },
                    {
                        "key": "IDEA-2",
                        "primary_team": 17,
                        "entered_parking_lot": "2025-02-01",
                        "lifecycle_events": [
                            { "from_stage": "parking_lot", "to_stage": "design", "at": 20250301 }
                        ]
                    }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(dataset.ideas.len(), 2);

        let report = dataset.cycle_time(&TeamRoster::default(), EffortScope::All, &[2025]);
        let year = report.year(2025).unwrap();
        assert_eq!(year.totals.total, 2);
        assert_eq!(year.totals.done, 1);
        assert_eq!(year.totals.ongoing_now, 1);
        assert_eq!(year.team("API").unwrap().median, Some(20.0));
        // The unknown numeric team lands in the synthetic bucket
        assert!(year.team("UNMAPPED").is_some());
        assert_eq!(report.coverage, Coverage::Complete);
    }

    #[test]
    fn test_dataset_roster_wins() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        let configured = TeamRoster::new(["Broadcast"]);
        assert_eq!(dataset.roster(&configured).teams(), ["API", "Frontend"]);

        let bare = Dataset::default();
        assert_eq!(bare.roster(&configured).teams(), ["Broadcast"]);
    }

    #[test]
    fn test_cycle_time_from_ideas() {
        let dataset = Dataset::from_json_str(SAMPLE).unwrap();
        let report = dataset.cycle_time(&TeamRoster::default(), EffortScope::All, &[2025]);
        assert_eq!(
            report.year(2025).unwrap().team("API").unwrap().median,
            Some(20.0)
        );
        assert!(!dataset.uses_public_aggregates());
    }

    #[test]
    fn test_falls_back_to_public_aggregates() {
        let dataset = Dataset::from_json_str(
            r#"{
                "ideas": [],
                "publicAggregates": {
                    "cycleTime": {
                        "byYear": { "2025": { "all": { "teams": {
                            "API": { "n": 4, "median": 9.5, "average": 11 }
                        } } } },
                        "totalsByYear": { "2025": { "all": { "total": 6, "cycle_sample": 4 } } }
                    }
                }
            }"#,
        )
        .unwrap();
        assert!(dataset.uses_public_aggregates());

        let configured = TeamRoster::new(["Broadcast"]);
        let report = dataset.cycle_time(&configured, EffortScope::All, &[2025]);
        let year = report.year(2025).unwrap();
        assert_eq!(year.teams.len(), 1);
        assert_eq!(year.team("API").unwrap().median, Some(9.5));
        assert_eq!(year.totals.total, 6);
        assert_eq!(report.coverage, Coverage::Complete);

        let lifecycle = dataset.lifecycle(&TeamRoster::default(), &PhaseSet::default(), &[2025]);
        assert_eq!(lifecycle.year(2025).unwrap().totals.total, 0);
    }

    #[test]
    fn test_public_aggregates_survive_null_nodes() {
        let dataset = Dataset::from_json_str(
            r#"{
                "ideas": [],
                "publicAggregates": {
                    "cycleTime": {
                        "byYear": { "2025": {
                            "all": { "teams": { "API": { "n": 4, "median": 9.5, "average": 11 } } },
                            "combined": null
                        } },
                        "totalsByYear": { "2025": { "all": { "total": 6, "cycle_sample": 4 } } }
                    },
                    "lifecyclePhaseDays": { "byYear": { "2025": { "teams": null } } }
                }
            }"#,
        )
        .unwrap();
        assert!(dataset.uses_public_aggregates());

        let report = dataset.cycle_time(&TeamRoster::default(), EffortScope::All, &[2025]);
        assert_eq!(report.year(2025).unwrap().team("API").unwrap().n, 4);
        assert_eq!(report.coverage, Coverage::Complete);

        let combined = dataset.cycle_time(&TeamRoster::default(), EffortScope::Combined, &[2025]);
        assert_eq!(combined.year(2025).unwrap().team("API").unwrap().n, 0);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let dataset = Dataset::from_path(file.path()).unwrap();
        assert_eq!(dataset.ideas.len(), 3);

        assert!(matches!(
            Dataset::from_path("/nonexistent/ideas.json"),
            Err(DatasetError::FileNotFound(_))
        ));
    }
}
