// Team roster and the synthetic UNMAPPED bucket

use crate::model::Idea;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Name of the synthetic bucket for teams outside the roster
pub const UNMAPPED: &str = "UNMAPPED";

/// A team credited in an aggregate: a roster member or the unmapped bucket
///
/// `Unmapped` is computed at read time and is never a roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TeamBucket {
    Member(String),
    Unmapped,
}

impl TeamBucket {
    pub fn name(&self) -> &str {
        match self {
            TeamBucket::Member(name) => name,
            TeamBucket::Unmapped => UNMAPPED,
        }
    }

    pub fn is_unmapped(&self) -> bool {
        matches!(self, TeamBucket::Unmapped)
    }
}

impl fmt::Display for TeamBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TeamBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TeamBucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(if name == UNMAPPED {
            TeamBucket::Unmapped
        } else {
            TeamBucket::Member(name)
        })
    }
}

/// Ordered, closed set of team names for one dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TeamRoster {
    teams: Vec<String>,
}

impl TeamRoster {
    /// Build a roster, trimming names and dropping blanks, duplicates and
    /// the reserved `UNMAPPED` name
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut teams: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() || teams.iter().any(|t| t == name) {
                continue;
            }
            if name == UNMAPPED {
                tracing::warn!("Ignoring reserved team name {} in roster", UNMAPPED);
                continue;
            }
            teams.push(name.to_string());
        }
        Self { teams }
    }

    /// Roster members in configured order
    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    /// Whether a (trimmed) team name is a roster member
    pub fn contains(&self, team: &str) -> bool {
        let team = team.trim();
        !team.is_empty() && self.teams.iter().any(|t| t == team)
    }

    /// Bucket for a single nominal team
    pub fn bucket(&self, team: Option<&str>) -> TeamBucket {
        match team.map(str::trim) {
            Some(name) if self.contains(name) => TeamBucket::Member(name.to_string()),
            _ => TeamBucket::Unmapped,
        }
    }

    /// Bucket for an idea's primary team
    pub fn primary_bucket(&self, idea: &Idea) -> TeamBucket {
        self.bucket(idea.primary_team())
    }

    /// Teams shown for a batch of ideas: the roster, plus `UNMAPPED` last if
    /// any idea's primary team falls outside it
    pub fn display_teams<'a, I>(&self, ideas: I) -> Vec<TeamBucket>
    where
        I: IntoIterator<Item = &'a Idea>,
    {
        let mut teams: Vec<TeamBucket> = self
            .teams
            .iter()
            .cloned()
            .map(TeamBucket::Member)
            .collect();
        if ideas
            .into_iter()
            .any(|idea| self.primary_bucket(idea).is_unmapped())
        {
            teams.push(TeamBucket::Unmapped);
        }
        teams
    }
}

impl<'de> Deserialize<'de> for TeamRoster {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Ok(TeamRoster::new(names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idea_for(team: Option<&str>) -> Idea {
        Idea {
            primary_team: team.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_roster_normalisation() {
        let roster = TeamRoster::new([" API ", "", "Frontend", "API", "UNMAPPED"]);
        assert_eq!(roster.teams(), &["API".to_string(), "Frontend".to_string()]);
        assert!(!roster.contains(UNMAPPED));
    }

    #[test]
    fn test_bucket() {
        let roster = TeamRoster::new(["API"]);
        assert_eq!(roster.bucket(Some("API")), TeamBucket::Member("API".into()));
        assert_eq!(roster.bucket(Some(" API")), TeamBucket::Member("API".into()));
        assert_eq!(roster.bucket(Some("Mobile")), TeamBucket::Unmapped);
        assert_eq!(roster.bucket(Some("")), TeamBucket::Unmapped);
        assert_eq!(roster.bucket(None), TeamBucket::Unmapped);
    }

    #[test]
    fn test_display_teams_appends_unmapped_only_when_needed() {
        let roster = TeamRoster::new(["API", "Frontend"]);
        let mapped = [idea_for(Some("API"))];
        assert_eq!(roster.display_teams(&mapped).len(), 2);

        let mixed = [idea_for(Some("API")), idea_for(None)];
        let teams = roster.display_teams(&mixed);
        assert_eq!(teams.len(), 3);
        assert_eq!(teams.last(), Some(&TeamBucket::Unmapped));
    }

    #[test]
    fn test_bucket_serde() {
        let json = serde_json::to_string(&TeamBucket::Unmapped).unwrap();
        assert_eq!(json, "\"UNMAPPED\"");
        let back: TeamBucket = serde_json::from_str("\"API\"").unwrap();
        assert_eq!(back, TeamBucket::Member("API".into()));
        let unmapped: TeamBucket = serde_json::from_str("\"UNMAPPED\"").unwrap();
        assert!(unmapped.is_unmapped());
    }

    #[test]
    fn test_roster_deserialize_filters() {
        let roster: TeamRoster = serde_json::from_str(r#"["API", " ", "UNMAPPED"]"#).unwrap();
        assert_eq!(roster.len(), 1);
    }
}
