use serde::{Deserialize, Serialize};

use crate::base_stats::{BaseStatsTable, safe_div, stats_of};
use crate::schedule::{RosterId, ScheduleGraph};

/// Two-hop strength of schedule ("OOR").
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SecondOrderAggregate {
    pub opp_opp_wins: f64,
    pub opp_opp_points: f64,
    pub opp_opp_win_pct: f64,
}

/// Pooled totals of `opp`'s own opponents, with `opp`'s head-to-head results
/// removed. This is the per-edge term of the two-hop sum.
fn pooled_for_opponent(graph: &ScheduleGraph, base: &BaseStatsTable, opp: RosterId) -> (f64, f64) {
    let mut wins = 0.0;
    let mut points = 0.0;
    for opp_opp in graph.opponents(opp) {
        let oo = stats_of(base, opp_opp);
        wins += oo.win_credit();
        points += oo.points_for;
    }
    let o = stats_of(base, opp);
    (wins - o.loss_credit(), points - o.points_against)
}

/// Walks every opponent occurrence of `team` and, for each, every opponent
/// occurrence of that opponent. The exclusion runs once per outer edge, so an
/// opponent met twice is corrected twice.
pub fn compute_second_order_aggregate(
    graph: &ScheduleGraph,
    base: &BaseStatsTable,
    team: RosterId,
) -> SecondOrderAggregate {
    let (opp_opp_wins, opp_opp_points) = graph
        .opponents(team)
        .map(|opp| pooled_for_opponent(graph, base, opp))
        .fold((0.0, 0.0), |(wins, points), (w, p)| (wins + w, points + p));

    SecondOrderAggregate {
        opp_opp_wins,
        opp_opp_points,
        opp_opp_win_pct: opp_opp_win_pct(opp_opp_wins, graph.weeks()),
    }
}

/// Denominator W²(W-1): W opponents, each with W opponents of their own, each
/// with up to W-1 wins not involving that opponent.
pub fn opp_opp_win_pct(opp_opp_wins: f64, weeks: usize) -> f64 {
    if weeks <= 1 {
        return 0.0;
    }
    let w = weeks as f64;
    safe_div(100.0 * opp_opp_wins, w * w * (w - 1.0))
}
