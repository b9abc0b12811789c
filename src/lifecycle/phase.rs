// Closed, ordered set of product lifecycle phases
//
// Stage identifiers outside this set (e.g. "done", "triage") still move the
// timeline forward but never accumulate duration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One stage in the product lifecycle, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    ParkingLot,
    Design,
    ReadyForDevelopment,
    InDevelopment,
    Feedback,
}

impl Phase {
    /// Every phase in canonical order
    pub const ALL: [Phase; 5] = [
        Phase::ParkingLot,
        Phase::Design,
        Phase::ReadyForDevelopment,
        Phase::InDevelopment,
        Phase::Feedback,
    ];

    /// Stage identifier as it appears in lifecycle events
    pub fn key(self) -> &'static str {
        match self {
            Phase::ParkingLot => "parking_lot",
            Phase::Design => "design",
            Phase::ReadyForDevelopment => "ready_for_development",
            Phase::InDevelopment => "in_development",
            Phase::Feedback => "feedback",
        }
    }

    /// Default display label
    pub fn default_label(self) -> &'static str {
        match self {
            Phase::ParkingLot => "Parking lot",
            Phase::Design => "Design",
            Phase::ReadyForDevelopment => "Ready",
            Phase::InDevelopment => "In Development",
            Phase::Feedback => "Feedback",
        }
    }

    /// Look up a phase by its stage identifier (surrounding whitespace ignored)
    pub fn from_key(key: &str) -> Option<Phase> {
        let key = key.trim();
        Phase::ALL.into_iter().find(|phase| phase.key() == key)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A configured phase: key plus display label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDef {
    pub key: Phase,
    pub label: String,
}

impl From<Phase> for PhaseDef {
    fn from(phase: Phase) -> Self {
        Self {
            key: phase,
            label: phase.default_label().to_string(),
        }
    }
}

/// Ordered set of phases that accumulate duration
///
/// Stages outside the set are treated like unknown stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseSet {
    phases: Vec<PhaseDef>,
}

impl Default for PhaseSet {
    fn default() -> Self {
        Self {
            phases: Phase::ALL.into_iter().map(PhaseDef::from).collect(),
        }
    }
}

impl PhaseSet {
    /// Build a set from definitions, keeping the first occurrence of each key
    pub fn new(defs: impl IntoIterator<Item = PhaseDef>) -> Self {
        let mut seen = HashSet::new();
        let phases = defs
            .into_iter()
            .filter(|def| seen.insert(def.key))
            .collect();
        Self { phases }
    }

    /// Configured definitions in order
    pub fn defs(&self) -> &[PhaseDef] {
        &self.phases
    }

    /// Configured phases in order
    pub fn phases(&self) -> impl Iterator<Item = Phase> + '_ {
        self.phases.iter().map(|def| def.key)
    }

    pub fn contains(&self, phase: Phase) -> bool {
        self.phases.iter().any(|def| def.key == phase)
    }

    /// Resolve a stage identifier to a configured phase
    pub fn resolve(&self, stage: &str) -> Option<Phase> {
        Phase::from_key(stage).filter(|phase| self.contains(*phase))
    }

    /// Display label for a phase
    pub fn label(&self, phase: Phase) -> &str {
        self.phases
            .iter()
            .find(|def| def.key == phase)
            .map(|def| def.label.as_str())
            .unwrap_or_else(|| phase.default_label())
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_roundtrip() {
        for phase in Phase::ALL {
            assert_eq!(Phase::from_key(phase.key()), Some(phase));
        }
        assert_eq!(Phase::from_key(" design "), Some(Phase::Design));
        assert_eq!(Phase::from_key("done"), None);
        assert_eq!(Phase::from_key(""), None);
    }

    #[test]
    fn test_canonical_order() {
        assert!(Phase::ParkingLot < Phase::Design);
        assert!(Phase::InDevelopment < Phase::Feedback);
    }

    #[test]
    fn test_default_set_has_all_phases() {
        let set = PhaseSet::default();
        assert_eq!(set.len(), 5);
        assert_eq!(set.phases().collect::<Vec<_>>(), Phase::ALL.to_vec());
        assert_eq!(set.label(Phase::ReadyForDevelopment), "Ready");
    }

    #[test]
    fn test_restricted_set_resolves_only_members() {
        let set = PhaseSet::new([Phase::Design.into(), Phase::InDevelopment.into()]);
        assert_eq!(set.resolve("design"), Some(Phase::Design));
        assert_eq!(set.resolve("parking_lot"), None);
        assert_eq!(set.resolve("bogus"), None);
    }

    #[test]
    fn test_duplicate_keys_dropped() {
        let set = PhaseSet::new([
            PhaseDef {
                key: Phase::Design,
                label: "First".to_string(),
            },
            PhaseDef {
                key: Phase::Design,
                label: "Second".to_string(),
            },
        ]);
        assert_eq!(set.len(), 1);
        assert_eq!(set.label(Phase::Design), "First");
    }

    #[test]
    fn test_phase_serializes_as_key() {
        let json = serde_json::to_string(&Phase::ReadyForDevelopment).unwrap();
        assert_eq!(json, "\"ready_for_development\"");
    }
}
