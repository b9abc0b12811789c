// Engine configuration: roster, phases, comparison years and chart defaults
//
// Zero-config operation uses the embedded `lifecycle-default.toml`; a user
// file passed with `--config` replaces it. Missing keys fall back to the
// defaults, so a config file may name only what it changes.

use crate::lifecycle::PhaseSet;
use crate::stats::Metric;
use crate::team::{EffortScope, TeamRoster, UNMAPPED};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration shipped with the binary
pub const DEFAULT_CONFIG: &str = include_str!("../lifecycle-default.toml");

const DEFAULT_TEAMS: [&str; 6] = [
    "API",
    "Frontend",
    "Broadcast",
    "Titanium",
    "Orchestration",
    "Shift",
];

/// Errors that can occur while reading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Sprint-goal chart settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SprintGoalsConfig {
    /// Number of most recent sprints to show
    pub lookback: usize,
    /// Selectable teams; the first one is the fallback
    pub teams: Vec<String>,
}

impl Default for SprintGoalsConfig {
    fn default() -> Self {
        Self {
            lookback: 6,
            teams: DEFAULT_TEAMS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// A backlog team column in snapshot files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogTeam {
    /// Key of the team's object in each snapshot point
    pub key: String,
    pub label: String,
}

impl BacklogTeam {
    fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

/// Backlog composition settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacklogConfig {
    /// Team key (or `all`) shown when none is requested
    pub default_scope: String,
    pub teams: Vec<BacklogTeam>,
}

impl Default for BacklogConfig {
    fn default() -> Self {
        Self {
            default_scope: "bc".to_string(),
            teams: vec![
                BacklogTeam::new("api", "API"),
                BacklogTeam::new("legacy", "Legacy FE"),
                BacklogTeam::new("react", "React FE"),
                BacklogTeam::new("bc", "BC"),
            ],
        }
    }
}

/// Engine configuration
///
/// # Example
/// ```
/// use ideaflow::config::EngineConfig;
///
/// let config = EngineConfig::from_toml_str("compare_years = [2024, 2025]")?;
/// assert_eq!(config.compare_years, vec![2024, 2025]);
/// assert_eq!(config.phases.len(), 5);
/// # Ok::<(), ideaflow::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Team roster, in display order
    pub teams: Vec<String>,

    /// Years compared side by side
    pub compare_years: Vec<i32>,

    /// Effort scope used when none is requested
    pub effort_scope: EffortScope,

    /// Statistic plotted when none is requested
    pub metric: Metric,

    /// Phases that accumulate duration, in display order
    pub phases: PhaseSet,

    pub sprint_goals: SprintGoalsConfig,

    pub backlog: BacklogConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            teams: DEFAULT_TEAMS.iter().map(|t| t.to_string()).collect(),
            compare_years: vec![2025, 2026],
            effort_scope: EffortScope::All,
            metric: Metric::Median,
            phases: PhaseSet::default(),
            sprint_goals: SprintGoalsConfig::default(),
            backlog: BacklogConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(text)?;
        config.validate().map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// The configuration embedded in the binary
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read, is not valid TOML or fails
    /// [`EngineConfig::validate`].
    pub fn from_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.compare_years.is_empty() {
            return Err("compare_years must name at least one year".to_string());
        }

        let mut seen = HashSet::new();
        for def in self.phases.defs() {
            if !seen.insert(def.key) {
                return Err(format!("phase '{}' is configured more than once", def.key));
            }
        }

        if self.teams.iter().any(|team| team.trim() == UNMAPPED) {
            return Err(format!("'{}' is reserved and cannot be a team", UNMAPPED));
        }

        if self.sprint_goals.lookback < 1 {
            return Err("sprint_goals.lookback must be at least 1".to_string());
        }

        let mut keys = HashSet::new();
        for team in &self.backlog.teams {
            if team.key.trim().is_empty() {
                return Err("backlog team keys must not be blank".to_string());
            }
            if !keys.insert(team.key.as_str()) {
                return Err(format!("backlog team '{}' is configured more than once", team.key));
            }
        }

        Ok(())
    }

    /// Configured roster
    pub fn roster(&self) -> TeamRoster {
        TeamRoster::new(&self.teams)
    }
}
