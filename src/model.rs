//! Work-item records as exported by the issue tracker
//!
//! Fields are read one at a time: any milestone may be absent, null or of
//! the wrong type, and event lists may be unsorted or contain blank stages.
//! A mistyped field degrades to its empty value instead of rejecting the
//! record. Nothing here is mutated during a computation pass.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Scalar rendered as text; objects, arrays and null carry no text
fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Text field; a value of the wrong shape reads as empty
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Optional text field; a value of the wrong shape reads as absent
fn lenient_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// Team list; a non-array is empty and non-scalar entries are dropped
fn lenient_teams<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries.into_iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    })
}

/// Event list; a non-array is empty and non-object events are dropped
fn lenient_events<'de, D>(deserializer: D) -> Result<Vec<LifecycleEvent>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(entries) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(entries
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|event| match serde_json::from_value(event) {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::debug!(error = %e, "dropping unreadable lifecycle event");
                None
            }
        })
        .collect())
}

/// A timestamped stage transition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleEvent {
    /// Stage left by this transition (may be empty)
    #[serde(default, deserialize_with = "lenient_text")]
    pub from_stage: String,

    /// Stage entered by this transition (may be empty)
    #[serde(default, deserialize_with = "lenient_text")]
    pub to_stage: String,

    /// ISO-8601-like occurrence time (may be empty)
    #[serde(default, deserialize_with = "lenient_text")]
    pub at: String,
}

impl LifecycleEvent {
    pub fn new(from_stage: &str, to_stage: &str, at: &str) -> Self {
        Self {
            from_stage: from_stage.to_string(),
            to_stage: to_stage.to_string(),
            at: at.to_string(),
        }
    }
}

/// A tracked work item flowing through the product lifecycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    /// Tracker key, e.g. "IDEA-42"
    #[serde(default, deserialize_with = "lenient_text")]
    pub key: String,

    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,

    /// Single nominal owning team
    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub primary_team: Option<String>,

    /// Every team contributing to the idea
    #[serde(default, deserialize_with = "lenient_teams")]
    pub teams: Vec<String>,

    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub entered_parking_lot: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub entered_design: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub entered_ready_for_development: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub entered_in_development: Option<String>,

    /// Completion milestone; absent while the idea is open
    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub entered_done: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub sfd_start: Option<String>,

    /// Stage transitions in storage order (not necessarily chronological)
    #[serde(default, deserialize_with = "lenient_events")]
    pub lifecycle_events: Vec<LifecycleEvent>,
}

impl Idea {
    /// Completion timestamp, `None` when absent or blank
    pub fn done_at(&self) -> Option<&str> {
        non_blank(self.entered_done.as_deref())
    }

    /// Whether the idea has no completion milestone
    pub fn is_open(&self) -> bool {
        self.done_at().is_none()
    }

    /// Primary team, trimmed, `None` when absent or blank
    pub fn primary_team(&self) -> Option<&str> {
        non_blank(self.primary_team.as_deref())
    }
}

/// Trim a string, mapping blank to `None`
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
