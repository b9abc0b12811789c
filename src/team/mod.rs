// Team attribution for lifecycle aggregates
//
// Resolves which roster team(s) an idea's durations are credited to, under a
// configurable effort scope. Teams outside the roster are never dropped:
// they land in the synthetic UNMAPPED bucket.

mod attribution;
mod roster;

pub use attribution::{contribution_teams, known_team_count, known_teams, EffortScope};
pub use roster::{TeamBucket, TeamRoster, UNMAPPED};
