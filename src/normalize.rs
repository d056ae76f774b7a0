use serde::{Deserialize, Serialize};

use crate::base_stats::{BaseStats, BaseStatsTable, safe_div};
use crate::opponents::OpponentAggregate;
use crate::second_order::SecondOrderAggregate;

/// Point totals expressed in league-average units, plus the derived scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedStats {
    pub points_for_normalized: f64,
    pub points_against_normalized: f64,
    /// Per opponent-game.
    pub opp_points_normalized: f64,
    /// Per two-hop game.
    pub opp_opp_points_normalized: f64,
    pub luck_factor: f64,
    pub bcs_sos: f64,
}

/// Mean season points-for across teams; 0 for an empty league.
pub fn league_average_points(base: &BaseStatsTable) -> f64 {
    let total: f64 = base.values().map(|s| s.points_for).sum();
    safe_div(total, base.len() as f64)
}

/// `(2 * OR% + OOR%) / 3`.
pub fn bcs_sos(opp_win_pct: f64, opp_opp_win_pct: f64) -> f64 {
    (2.0 * opp_win_pct + opp_opp_win_pct) / 3.0
}

pub fn normalize(
    own: &BaseStats,
    first: &OpponentAggregate,
    second: &SecondOrderAggregate,
    league_average: f64,
    weeks: usize,
) -> NormalizedStats {
    let w = weeks as f64;
    let per_opp_game = if weeks > 1 { league_average * (w - 1.0) } else { 0.0 };
    let per_two_hop_game = w * per_opp_game;

    let points_against_normalized = safe_div(own.points_against, league_average);
    let opp_points_normalized = safe_div(first.opp_points, per_opp_game);
    NormalizedStats {
        points_for_normalized: safe_div(own.points_for, league_average),
        points_against_normalized,
        opp_points_normalized,
        opp_opp_points_normalized: safe_div(second.opp_opp_points, per_two_hop_game),
        // Positive: opponents scored less against this team than they usually do.
        luck_factor: opp_points_normalized - points_against_normalized,
        bcs_sos: bcs_sos(first.opp_win_pct, second.opp_opp_win_pct),
    }
}
