use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::base_stats::{BaseStats, BaseStatsTable, compute_base_table, stats_of};
use crate::config::SeasonConfig;
use crate::error::ScheduleAnomaly;
use crate::normalize::{NormalizedStats, league_average_points, normalize};
use crate::opponents::{OpponentAggregate, compute_opponent_aggregate};
use crate::schedule::{LeagueInput, RosterId, ScheduleGraph, Team, WeeklyMatchupSlot};
use crate::second_order::{SecondOrderAggregate, compute_second_order_aggregate};

/// Every statistic for one team over the season. All fields are always set.
/// Counts are stored as `f64` so the league-average row shares this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonStats {
    pub wins: f64,
    pub losses: f64,
    pub draws: f64,
    pub points_for: f64,
    pub points_against: f64,
    pub win_pct: f64,

    pub opp_wins: f64,
    pub opp_points: f64,
    pub opp_win_pct: f64,

    pub opp_opp_wins: f64,
    pub opp_opp_points: f64,
    pub opp_opp_win_pct: f64,

    pub points_for_normalized: f64,
    pub points_against_normalized: f64,
    pub opp_points_normalized: f64,
    pub opp_opp_points_normalized: f64,
    pub luck_factor: f64,
    pub bcs_sos: f64,
}

impl SeasonStats {
    fn assemble(
        base: &BaseStats,
        first: &OpponentAggregate,
        second: &SecondOrderAggregate,
        norm: &NormalizedStats,
    ) -> Self {
        Self {
            wins: f64::from(base.wins),
            losses: f64::from(base.losses),
            draws: f64::from(base.draws),
            points_for: base.points_for,
            points_against: base.points_against,
            win_pct: base.win_pct,
            opp_wins: first.opp_wins,
            opp_points: first.opp_points,
            opp_win_pct: first.opp_win_pct,
            opp_opp_wins: second.opp_opp_wins,
            opp_opp_points: second.opp_opp_points,
            opp_opp_win_pct: second.opp_opp_win_pct,
            points_for_normalized: norm.points_for_normalized,
            points_against_normalized: norm.points_against_normalized,
            opp_points_normalized: norm.opp_points_normalized,
            opp_opp_points_normalized: norm.opp_opp_points_normalized,
            luck_factor: norm.luck_factor,
            bcs_sos: norm.bcs_sos,
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        self.zip_with(self, |a, _| f(a))
    }

    /// Field-wise arithmetic on two rows; used for the league-average row.
    fn zip_with(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            wins: f(self.wins, other.wins),
            losses: f(self.losses, other.losses),
            draws: f(self.draws, other.draws),
            points_for: f(self.points_for, other.points_for),
            points_against: f(self.points_against, other.points_against),
            win_pct: f(self.win_pct, other.win_pct),
            opp_wins: f(self.opp_wins, other.opp_wins),
            opp_points: f(self.opp_points, other.opp_points),
            opp_win_pct: f(self.opp_win_pct, other.opp_win_pct),
            opp_opp_wins: f(self.opp_opp_wins, other.opp_opp_wins),
            opp_opp_points: f(self.opp_opp_points, other.opp_opp_points),
            opp_opp_win_pct: f(self.opp_opp_win_pct, other.opp_opp_win_pct),
            points_for_normalized: f(self.points_for_normalized, other.points_for_normalized),
            points_against_normalized: f(
                self.points_against_normalized,
                other.points_against_normalized,
            ),
            opp_points_normalized: f(self.opp_points_normalized, other.opp_points_normalized),
            opp_opp_points_normalized: f(
                self.opp_opp_points_normalized,
                other.opp_opp_points_normalized,
            ),
            luck_factor: f(self.luck_factor, other.luck_factor),
            bcs_sos: f(self.bcs_sos, other.bcs_sos),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonReport {
    pub weeks: usize,
    pub league_average_points: f64,
    pub teams: BTreeMap<RosterId, Team>,
    pub stats: BTreeMap<RosterId, SeasonStats>,
    pub slots: BTreeMap<RosterId, Vec<WeeklyMatchupSlot>>,
    pub anomalies: Vec<ScheduleAnomaly>,
}

impl SeasonReport {
    pub fn team_name(&self, id: RosterId) -> &str {
        self.teams.get(&id).map(|t| t.name.as_str()).unwrap_or("")
    }

    /// Wins, then points-for, both descending; roster id breaks ties.
    pub fn standings(&self) -> Vec<(RosterId, &SeasonStats)> {
        let mut rows: Vec<(RosterId, &SeasonStats)> =
            self.stats.iter().map(|(id, s)| (*id, s)).collect();
        rows.sort_by(|(a_id, a), (b_id, b)| {
            b.wins
                .partial_cmp(&a.wins)
                .unwrap_or(Ordering::Equal)
                .then(b.points_for.partial_cmp(&a.points_for).unwrap_or(Ordering::Equal))
                .then(a_id.cmp(b_id))
        });
        rows
    }

    /// Mean of every field across teams. All zeros for an empty league.
    pub fn league_average_row(&self) -> SeasonStats {
        if self.stats.is_empty() {
            return SeasonStats::default();
        }
        let n = self.stats.len() as f64;
        self.stats
            .values()
            .fold(SeasonStats::default(), |acc, s| acc.zip_with(*s, |a, b| a + b))
            .map(|sum| sum / n)
    }
}

/// Runs the whole pipeline. Phase 1 builds the schedule graph and the base
/// stats of every team; only then does Phase 2 aggregate, reading the frozen
/// base table. Never fails: data problems come back as `anomalies`.
pub fn compute_season(input: &LeagueInput, config: &SeasonConfig) -> SeasonReport {
    let graph = ScheduleGraph::build(input, config);
    let base = compute_base_table(&graph);
    let league_average = league_average_points(&base);
    let stats = aggregate(&graph, &base, league_average);
    // Empty while `build` mirrors every pair; kept so a regression there
    // surfaces as an anomaly instead of skewed aggregates.
    let asymmetric = graph.check_symmetry();

    let weeks = graph.weeks();
    let team_count = graph.team_count();
    tracing::debug!(
        teams = team_count,
        weeks,
        league_average,
        "season statistics computed"
    );

    let (teams, slots, mut anomalies) = graph.into_parts();
    anomalies.extend(asymmetric);
    if weeks <= 1 || team_count < 2 {
        let anomaly = ScheduleAnomaly::DegenerateLeague {
            teams: team_count,
            weeks,
        };
        anomaly.log();
        anomalies.push(anomaly);
    }

    SeasonReport {
        weeks,
        league_average_points: league_average,
        teams,
        stats,
        slots,
        anomalies,
    }
}

fn aggregate(
    graph: &ScheduleGraph,
    base: &BaseStatsTable,
    league_average: f64,
) -> BTreeMap<RosterId, SeasonStats> {
    graph
        .team_ids()
        .map(|id| {
            let own = stats_of(base, id);
            let first = compute_opponent_aggregate(graph, base, id);
            let second = compute_second_order_aggregate(graph, base, id);
            let norm = normalize(&own, &first, &second, league_average, graph.weeks());
            (id, SeasonStats::assemble(&own, &first, &second, &norm))
        })
        .collect()
}
