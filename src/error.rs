use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schedule::RosterId;

/// Data problems found while building or checking a season.
///
/// None of these abort the computation. Each is logged when detected and
/// handed back to the caller on the report so renderers can surface them.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleAnomaly {
    /// More than two rosters share a matchup id; every member is scored as a bye.
    #[error("week {week}: matchup {matchup_id} has {} rosters, scored as byes", .rosters.len())]
    MalformedGroup {
        week: u32,
        matchup_id: u32,
        rosters: Vec<RosterId>,
    },

    /// Roster missing from the team lookup; kept under a placeholder name.
    #[error("roster {roster_id} is not in the team lookup, named \"{placeholder}\"")]
    UnknownTeam { roster_id: RosterId, placeholder: String },

    /// Same roster reported more than once in a week; only the first record counts.
    #[error("week {week}: roster {roster_id} reported more than once, extra records ignored")]
    DuplicateRoster { week: u32, roster_id: RosterId },

    /// Not enough weeks or teams for the percentage and normalized fields.
    #[error("degenerate league ({teams} teams, {weeks} weeks), ratio fields reported as 0")]
    DegenerateLeague { teams: usize, weeks: usize },

    /// Opponent's slot for the same week does not mirror this one.
    #[error("week {week}: slot of roster {roster_id} vs {opponent} is not mirrored")]
    AsymmetricSlot {
        week: u32,
        roster_id: RosterId,
        opponent: RosterId,
    },
}

impl ScheduleAnomaly {
    pub(crate) fn log(&self) {
        match self {
            Self::MalformedGroup {
                week,
                matchup_id,
                rosters,
            } => tracing::warn!(week, matchup_id, size = rosters.len(), "{}", self),
            Self::UnknownTeam { roster_id, .. } => tracing::warn!(roster_id, "{}", self),
            Self::DuplicateRoster { week, roster_id } => {
                tracing::warn!(week, roster_id, "{}", self)
            }
            Self::DegenerateLeague { teams, weeks } => tracing::warn!(teams, weeks, "{}", self),
            Self::AsymmetricSlot {
                week,
                roster_id,
                opponent,
            } => tracing::warn!(week, roster_id, opponent, "{}", self),
        }
    }
}
