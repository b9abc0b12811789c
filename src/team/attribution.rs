// Effort-scope filtering and per-team credit for multi-team ideas

use crate::model::Idea;
use crate::team::{TeamBucket, TeamRoster};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which ideas count, by number of known contributing teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EffortScope {
    /// Every idea counts
    #[default]
    All,
    /// Ideas with at most one known team
    Single,
    /// Ideas with two or more known teams
    Combined,
}

impl EffortScope {
    pub const ALL: [EffortScope; 3] = [EffortScope::All, EffortScope::Single, EffortScope::Combined];

    pub fn key(self) -> &'static str {
        match self {
            EffortScope::All => "all",
            EffortScope::Single => "single",
            EffortScope::Combined => "combined",
        }
    }

    /// Whether an idea falls inside this scope
    pub fn matches(self, idea: &Idea, roster: &TeamRoster) -> bool {
        let count = known_team_count(idea, roster);
        match self {
            EffortScope::All => true,
            EffortScope::Single => count <= 1,
            EffortScope::Combined => count >= 2,
        }
    }
}

impl fmt::Display for EffortScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Roster members among an idea's contributing teams
///
/// Trimmed, de-duplicated, in first-seen order. When the `teams` list names
/// no roster member, falls back to the primary team if it is one.
pub fn known_teams<'a>(idea: &'a Idea, roster: &TeamRoster) -> Vec<&'a str> {
    let mut known: Vec<&str> = Vec::new();
    for team in &idea.teams {
        let team = team.trim();
        if roster.contains(team) && !known.contains(&team) {
            known.push(team);
        }
    }
    if known.is_empty() {
        if let Some(primary) = idea.primary_team().filter(|p| roster.contains(p)) {
            known.push(primary);
        }
    }
    known
}

/// Number of roster teams contributing to an idea (0 means unmapped)
pub fn known_team_count(idea: &Idea, roster: &TeamRoster) -> usize {
    known_teams(idea, roster).len()
}

/// Teams credited with an idea's duration
///
/// Under `Combined`, a multi-team idea is credited in full to every known
/// team (fan-out, so per-team sample sizes may sum past the idea count).
/// A single known team takes the credit alone; anything else goes to the
/// primary-team bucket.
pub fn contribution_teams(idea: &Idea, roster: &TeamRoster, scope: EffortScope) -> Vec<TeamBucket> {
    let known = known_teams(idea, roster);
    match known.as_slice() {
        [only] => vec![TeamBucket::Member((*only).to_string())],
        teams if scope == EffortScope::Combined && teams.len() >= 2 => teams
            .iter()
            .map(|team| TeamBucket::Member((*team).to_string()))
            .collect(),
        _ => vec![roster.primary_bucket(idea)],
    }
}
