use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schedule::{MatchResult, RosterId, ScheduleGraph, WeeklyMatchupSlot};

/// Season totals for one team, before any opponent aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub points_for: f64,
    pub points_against: f64,
    pub win_pct: f64,
}

impl BaseStats {
    /// Wins with draws counted as half.
    pub fn win_credit(&self) -> f64 {
        f64::from(self.wins) + 0.5 * f64::from(self.draws)
    }

    /// What this team gave up to its opponents: losses plus half of draws.
    pub fn loss_credit(&self) -> f64 {
        f64::from(self.losses) + 0.5 * f64::from(self.draws)
    }
}

/// Frozen per-team base stats. Phase 2 only ever reads this.
pub type BaseStatsTable = BTreeMap<RosterId, BaseStats>;

/// Reduces one team's weekly slots. `weeks` is the full schedule length, so a
/// bye dilutes `win_pct` the same way a loss does.
pub fn compute_base_stats(slots: &[WeeklyMatchupSlot], weeks: usize) -> BaseStats {
    let mut out = slots.iter().fold(BaseStats::default(), |mut acc, slot| {
        match slot.result {
            Some(MatchResult::Win) => acc.wins += 1,
            Some(MatchResult::Loss) => acc.losses += 1,
            Some(MatchResult::Draw) => acc.draws += 1,
            None => {}
        }
        acc.points_for += slot.points_for;
        acc.points_against += slot.points_against;
        acc
    });
    out.win_pct = safe_div(100.0 * out.win_credit(), weeks as f64);
    out
}

/// Division for the informational ratio fields: a zero denominator yields 0.
pub(crate) fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Stats for `id`, or zeros if the table has no entry.
pub(crate) fn stats_of(table: &BaseStatsTable, id: RosterId) -> BaseStats {
    table.get(&id).copied().unwrap_or_default()
}

pub fn compute_base_table(graph: &ScheduleGraph) -> BaseStatsTable {
    graph
        .team_ids()
        .map(|id| (id, compute_base_stats(graph.slots(id), graph.weeks())))
        .collect()
}
