use serde::{Deserialize, Serialize};

use crate::base_stats::{BaseStatsTable, safe_div, stats_of};
use crate::schedule::{RosterId, ScheduleGraph};

/// One-hop strength of schedule ("OR").
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OpponentAggregate {
    /// Opponents' win credit, minus what they won against this team.
    pub opp_wins: f64,
    /// Opponents' points-for, minus what they scored against this team.
    pub opp_points: f64,
    pub opp_win_pct: f64,
}

/// Sums base stats over the opponent multiset O(t), then removes the team's own
/// head-to-head contribution: every opponent's totals include the games it
/// played against `team`, which are exactly `team`'s losses, half its draws,
/// and its points-against.
pub fn compute_opponent_aggregate(
    graph: &ScheduleGraph,
    base: &BaseStatsTable,
    team: RosterId,
) -> OpponentAggregate {
    let own = stats_of(base, team);
    let mut pooled_wins = 0.0;
    let mut pooled_points = 0.0;
    for opp in graph.opponents(team) {
        let o = stats_of(base, opp);
        pooled_wins += o.win_credit();
        pooled_points += o.points_for;
    }

    let opp_wins = pooled_wins - own.loss_credit();
    OpponentAggregate {
        opp_wins,
        opp_points: pooled_points - own.points_against,
        opp_win_pct: opp_win_pct(opp_wins, graph.weeks()),
    }
}

/// `opp_wins` over the most it could be: W opponents, each with W-1 other games.
pub fn opp_win_pct(opp_wins: f64, weeks: usize) -> f64 {
    if weeks <= 1 {
        return 0.0;
    }
    let w = weeks as f64;
    safe_div(100.0 * opp_wins, w * (w - 1.0))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::base_stats::compute_base_table;
    use crate::config::SeasonConfig;
    use crate::schedule::{LeagueInput, MatchupRecord};

    fn head_to_head(weeks: &[(f64, f64)]) -> ScheduleGraph {
        let input = LeagueInput {
            teams: BTreeMap::from([(1, "A".to_string()), (2, "B".to_string())]),
            weeks: weeks
                .iter()
                .map(|(a, b)| {
                    vec![
                        MatchupRecord {
                            roster_id: 1,
                            matchup_id: Some(1),
                            points: *a,
                        },
                        MatchupRecord {
                            roster_id: 2,
                            matchup_id: Some(1),
                            points: *b,
                        },
                    ]
                })
                .collect(),
        };
        ScheduleGraph::build(&input, &SeasonConfig::default())
    }

    #[test]
    fn single_meeting_cancels_to_zero() {
        let graph = head_to_head(&[(100.0, 90.0)]);
        let base = compute_base_table(&graph);
        for team in [1, 2] {
            let agg = compute_opponent_aggregate(&graph, &base, team);
            assert_eq!(agg.opp_wins, 0.0);
            assert_eq!(agg.opp_points, 0.0);
            assert_eq!(agg.opp_win_pct, 0.0);
        }
    }

    #[test]
    fn repeated_opponent_counts_once_per_meeting() {
        // B wins twice and draws once; A faces B three times.
        let graph = head_to_head(&[(80.0, 90.0), (70.0, 100.0), (50.0, 50.0)]);
        let base = compute_base_table(&graph);
        let a = compute_opponent_aggregate(&graph, &base, 1);
        // 3 * (2 + 0.5) - (2 + 0.5)
        assert!((a.opp_wins - 5.0).abs() < 1e-9);
        // 3 * 240 - 240
        assert!((a.opp_points - 480.0).abs() < 1e-9);
        assert!((a.opp_win_pct - 100.0 * 5.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn pct_guards_short_seasons() {
        assert_eq!(opp_win_pct(3.0, 0), 0.0);
        assert_eq!(opp_win_pct(3.0, 1), 0.0);
        assert!((opp_win_pct(3.0, 3) - 50.0).abs() < 1e-9);
    }
}
