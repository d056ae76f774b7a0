pub mod base_stats;
pub mod config;
pub mod error;
pub mod normalize;
pub mod opponents;
pub mod schedule;
pub mod season;
pub mod second_order;
pub mod sleeper;

pub use config::{ByePoints, SeasonConfig};
pub use error::ScheduleAnomaly;
pub use schedule::{
    LeagueInput, MatchResult, MatchupRecord, RosterId, ScheduleGraph, Team, WeeklyMatchupSlot,
};
pub use season::{SeasonReport, SeasonStats, compute_season};
