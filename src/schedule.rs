use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::{ByePoints, MAX_SEASON_WEEKS, SeasonConfig};
use crate::error::ScheduleAnomaly;

pub type RosterId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: RosterId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
    #[serde(rename = "D")]
    Draw,
}

impl MatchResult {
    /// Strict comparison: equal scores are a draw.
    pub fn from_points(points_for: f64, points_against: f64) -> Self {
        if points_for > points_against {
            Self::Win
        } else if points_for < points_against {
            Self::Loss
        } else {
            Self::Draw
        }
    }

    pub fn mirror(self) -> Self {
        match self {
            Self::Win => Self::Loss,
            Self::Loss => Self::Win,
            Self::Draw => Self::Draw,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Win => 'W',
            Self::Loss => 'L',
            Self::Draw => 'D',
        }
    }
}

/// One team's view of one week. `opponent == None` is a bye.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyMatchupSlot {
    pub week: u32,
    pub opponent: Option<RosterId>,
    pub points_for: f64,
    pub points_against: f64,
    pub result: Option<MatchResult>,
}

impl WeeklyMatchupSlot {
    pub fn bye(week: u32, points_for: f64) -> Self {
        Self {
            week,
            opponent: None,
            points_for,
            points_against: 0.0,
            result: None,
        }
    }

    pub fn is_bye(&self) -> bool {
        self.opponent.is_none()
    }
}

/// One roster's line from a week of matchups, as the platform reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupRecord {
    pub roster_id: RosterId,
    #[serde(default)]
    pub matchup_id: Option<u32>,
    #[serde(default)]
    pub points: f64,
}

/// Already-fetched league data: who the teams are and what happened each week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueInput {
    pub teams: BTreeMap<RosterId, String>,
    /// Index 0 is week 1.
    pub weeks: Vec<Vec<MatchupRecord>>,
}

/// Per-team weekly slots plus the opponent adjacency they imply.
#[derive(Debug, Clone)]
pub struct ScheduleGraph {
    teams: BTreeMap<RosterId, Team>,
    slots: BTreeMap<RosterId, Vec<WeeklyMatchupSlot>>,
    weeks: usize,
    anomalies: Vec<ScheduleAnomaly>,
}

impl ScheduleGraph {
    pub fn build(input: &LeagueInput, config: &SeasonConfig) -> Self {
        let weeks = config
            .weeks
            .map(|w| w.min(MAX_SEASON_WEEKS))
            .unwrap_or(input.weeks.len());
        let mut anomalies = Vec::new();

        let mut teams: BTreeMap<RosterId, Team> = input
            .teams
            .iter()
            .map(|(id, name)| {
                (
                    *id,
                    Team {
                        id: *id,
                        name: name.clone(),
                    },
                )
            })
            .collect();

        // Every roster needs a full row of slots before any week is filled in.
        for record in input.weeks.iter().take(weeks).flatten() {
            if teams.contains_key(&record.roster_id) {
                continue;
            }
            let placeholder = config.placeholder_name(record.roster_id);
            push_anomaly(
                &mut anomalies,
                ScheduleAnomaly::UnknownTeam {
                    roster_id: record.roster_id,
                    placeholder: placeholder.clone(),
                },
            );
            teams.insert(
                record.roster_id,
                Team {
                    id: record.roster_id,
                    name: placeholder,
                },
            );
        }

        let mut slots: BTreeMap<RosterId, Vec<WeeklyMatchupSlot>> = teams
            .keys()
            .map(|id| {
                let row: Vec<WeeklyMatchupSlot> = (1..=weeks)
                    .map(|week| WeeklyMatchupSlot::bye(week as u32, 0.0))
                    .collect();
                (*id, row)
            })
            .collect();

        if input.weeks.len() < weeks {
            tracing::debug!(
                reported = input.weeks.len(),
                weeks,
                "schedule shorter than season, remaining weeks are byes"
            );
        }

        for (idx, records) in input.weeks.iter().take(weeks).enumerate() {
            let week = (idx + 1) as u32;
            let mut seen = BTreeSet::new();
            let mut groups: BTreeMap<u32, Vec<(RosterId, f64)>> = BTreeMap::new();

            for record in records {
                if !seen.insert(record.roster_id) {
                    push_anomaly(
                        &mut anomalies,
                        ScheduleAnomaly::DuplicateRoster {
                            week,
                            roster_id: record.roster_id,
                        },
                    );
                    continue;
                }
                match record.matchup_id {
                    Some(matchup_id) => groups
                        .entry(matchup_id)
                        .or_default()
                        .push((record.roster_id, record.points)),
                    None => set_bye(&mut slots, idx, record.roster_id, record.points, config),
                }
            }

            for (matchup_id, members) in groups {
                if let &[(a, a_pts), (b, b_pts)] = members.as_slice() {
                    set_slot(&mut slots, idx, a, b, a_pts, b_pts);
                    set_slot(&mut slots, idx, b, a, b_pts, a_pts);
                    continue;
                }
                if members.len() > 2 {
                    push_anomaly(
                        &mut anomalies,
                        ScheduleAnomaly::MalformedGroup {
                            week,
                            matchup_id,
                            rosters: members.iter().map(|(id, _)| *id).collect(),
                        },
                    );
                }
                for (roster_id, points) in members {
                    set_bye(&mut slots, idx, roster_id, points, config);
                }
            }
        }

        Self {
            teams,
            slots,
            weeks,
            anomalies,
        }
    }

    /// Schedule length W, byes included.
    pub fn weeks(&self) -> usize {
        self.weeks
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    pub fn team(&self, id: RosterId) -> Option<&Team> {
        self.teams.get(&id)
    }

    pub fn team_ids(&self) -> impl Iterator<Item = RosterId> + '_ {
        self.teams.keys().copied()
    }

    pub fn slots(&self, id: RosterId) -> &[WeeklyMatchupSlot] {
        self.slots.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(week, opponent)` edges in week order. Byes have no edge; repeat
    /// opponents appear once per meeting.
    pub fn edges(&self, id: RosterId) -> impl Iterator<Item = (u32, RosterId)> + '_ {
        self.slots(id)
            .iter()
            .filter_map(|slot| slot.opponent.map(|opp| (slot.week, opp)))
    }

    /// The opponent multiset O(t).
    pub fn opponents(&self, id: RosterId) -> impl Iterator<Item = RosterId> + '_ {
        self.edges(id).map(|(_, opp)| opp)
    }

    /// Two-team games of a week, each listed once with the lower roster id first.
    pub fn pairings(&self, week: u32) -> Vec<(RosterId, RosterId)> {
        let Some(idx) = (week as usize).checked_sub(1) else {
            return Vec::new();
        };
        self.slots
            .iter()
            .filter_map(|(id, row)| {
                let opp = row.get(idx)?.opponent?;
                (*id < opp).then_some((*id, opp))
            })
            .collect()
    }

    pub fn anomalies(&self) -> &[ScheduleAnomaly] {
        &self.anomalies
    }

    /// Checks that every non-bye slot is mirrored by its opponent's slot.
    pub fn check_symmetry(&self) -> Vec<ScheduleAnomaly> {
        let mut out = Vec::new();
        for (id, row) in &self.slots {
            for (idx, slot) in row.iter().enumerate() {
                let Some(opp) = slot.opponent else {
                    continue;
                };
                let mirrored = self
                    .slots
                    .get(&opp)
                    .and_then(|opp_row| opp_row.get(idx))
                    .is_some_and(|other| {
                        other.opponent == Some(*id)
                            && other.points_for == slot.points_against
                            && other.points_against == slot.points_for
                            && other.result == slot.result.map(MatchResult::mirror)
                    });
                if !mirrored {
                    push_anomaly(
                        &mut out,
                        ScheduleAnomaly::AsymmetricSlot {
                            week: slot.week,
                            roster_id: *id,
                            opponent: opp,
                        },
                    );
                }
            }
        }
        out
    }

    pub fn into_parts(
        self,
    ) -> (
        BTreeMap<RosterId, Team>,
        BTreeMap<RosterId, Vec<WeeklyMatchupSlot>>,
        Vec<ScheduleAnomaly>,
    ) {
        (self.teams, self.slots, self.anomalies)
    }
}

fn push_anomaly(out: &mut Vec<ScheduleAnomaly>, anomaly: ScheduleAnomaly) {
    anomaly.log();
    out.push(anomaly);
}

fn set_slot(
    slots: &mut BTreeMap<RosterId, Vec<WeeklyMatchupSlot>>,
    idx: usize,
    team: RosterId,
    opponent: RosterId,
    points_for: f64,
    points_against: f64,
) {
    let Some(slot) = slots.get_mut(&team).and_then(|row| row.get_mut(idx)) else {
        return;
    };
    slot.opponent = Some(opponent);
    slot.points_for = points_for;
    slot.points_against = points_against;
    slot.result = Some(MatchResult::from_points(points_for, points_against));
}

fn set_bye(
    slots: &mut BTreeMap<RosterId, Vec<WeeklyMatchupSlot>>,
    idx: usize,
    team: RosterId,
    reported: f64,
    config: &SeasonConfig,
) {
    let Some(slot) = slots.get_mut(&team).and_then(|row| row.get_mut(idx)) else {
        return;
    };
    let points_for = match config.bye_points {
        ByePoints::Zero => 0.0,
        ByePoints::Reported => reported,
    };
    *slot = WeeklyMatchupSlot::bye(slot.week, points_for);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(roster_id: RosterId, matchup_id: Option<u32>, points: f64) -> MatchupRecord {
        MatchupRecord {
            roster_id,
            matchup_id,
            points,
        }
    }

    fn lookup(ids: &[RosterId]) -> BTreeMap<RosterId, String> {
        ids.iter().map(|id| (*id, format!("T{id}"))).collect()
    }

    #[test]
    fn pair_gets_mirrored_slots() {
        let input = LeagueInput {
            teams: lookup(&[1, 2]),
            weeks: vec![vec![rec(1, Some(1), 101.5), rec(2, Some(1), 99.0)]],
        };
        let graph = ScheduleGraph::build(&input, &SeasonConfig::default());
        let a = &graph.slots(1)[0];
        let b = &graph.slots(2)[0];
        assert_eq!(a.opponent, Some(2));
        assert_eq!(a.result, Some(MatchResult::Win));
        assert_eq!(b.result, Some(MatchResult::Loss));
        assert_eq!(a.points_for, b.points_against);
        assert!(graph.check_symmetry().is_empty());
        assert_eq!(graph.pairings(1), vec![(1, 2)]);
        let names: Vec<_> = graph.teams().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["T1", "T2"]);
    }

    #[test]
    fn equal_points_is_a_draw_for_both() {
        let input = LeagueInput {
            teams: lookup(&[1, 2]),
            weeks: vec![vec![rec(2, Some(4), 80.0), rec(1, Some(4), 80.0)]],
        };
        let graph = ScheduleGraph::build(&input, &SeasonConfig::default());
        assert_eq!(graph.slots(1)[0].result, Some(MatchResult::Draw));
        assert_eq!(graph.slots(2)[0].result, Some(MatchResult::Draw));
    }

    #[test]
    fn group_of_three_is_all_byes_with_warning() {
        let input = LeagueInput {
            teams: lookup(&[1, 2, 3]),
            weeks: vec![vec![
                rec(1, Some(1), 90.0),
                rec(2, Some(1), 80.0),
                rec(3, Some(1), 70.0),
            ]],
        };
        let graph = ScheduleGraph::build(&input, &SeasonConfig::default());
        for id in 1..=3 {
            assert!(graph.slots(id)[0].is_bye());
            assert_eq!(graph.slots(id)[0].points_for, 0.0);
        }
        assert_eq!(
            graph.anomalies(),
            &[ScheduleAnomaly::MalformedGroup {
                week: 1,
                matchup_id: 1,
                rosters: vec![1, 2, 3],
            }]
        );
    }

    #[test]
    fn unknown_roster_gets_placeholder_and_keeps_points() {
        let input = LeagueInput {
            teams: lookup(&[1]),
            weeks: vec![vec![rec(1, Some(1), 90.0), rec(9, Some(1), 95.0)]],
        };
        let graph = ScheduleGraph::build(&input, &SeasonConfig::default());
        assert_eq!(graph.team(9).map(|t| t.name.as_str()), Some("Team 9"));
        assert_eq!(graph.slots(9)[0].points_for, 95.0);
        assert_eq!(graph.slots(1)[0].result, Some(MatchResult::Loss));
        assert!(matches!(
            graph.anomalies(),
            [ScheduleAnomaly::UnknownTeam { roster_id: 9, .. }]
        ));
    }

    #[test]
    fn missing_records_and_null_matchup_are_byes() {
        let input = LeagueInput {
            teams: lookup(&[1, 2, 3]),
            weeks: vec![vec![rec(1, None, 60.0), rec(2, Some(3), 70.0)]],
        };
        let reported = SeasonConfig {
            bye_points: ByePoints::Reported,
            ..SeasonConfig::default()
        };
        let graph = ScheduleGraph::build(&input, &reported);
        assert_eq!(graph.slots(1)[0], WeeklyMatchupSlot::bye(1, 60.0));
        assert_eq!(graph.slots(2)[0], WeeklyMatchupSlot::bye(1, 70.0));
        assert_eq!(graph.slots(3)[0], WeeklyMatchupSlot::bye(1, 0.0));
        assert!(graph.anomalies().is_empty());
    }

    #[test]
    fn duplicate_roster_keeps_first_record() {
        let input = LeagueInput {
            teams: lookup(&[1, 2]),
            weeks: vec![vec![
                rec(1, Some(1), 50.0),
                rec(2, Some(1), 40.0),
                rec(1, Some(1), 10.0),
            ]],
        };
        let graph = ScheduleGraph::build(&input, &SeasonConfig::default());
        assert_eq!(graph.slots(1)[0].points_for, 50.0);
        assert_eq!(graph.slots(1)[0].opponent, Some(2));
        assert_eq!(
            graph.anomalies(),
            &[ScheduleAnomaly::DuplicateRoster {
                week: 1,
                roster_id: 1,
            }]
        );
    }

    #[test]
    fn configured_weeks_truncate_and_pad() {
        let week = vec![rec(1, Some(1), 50.0), rec(2, Some(1), 40.0)];
        let input = LeagueInput {
            teams: lookup(&[1, 2]),
            weeks: vec![week.clone(), week.clone(), week],
        };
        let short = SeasonConfig {
            weeks: Some(2),
            ..SeasonConfig::default()
        };
        assert_eq!(ScheduleGraph::build(&input, &short).slots(1).len(), 2);

        let long = SeasonConfig {
            weeks: Some(5),
            ..SeasonConfig::default()
        };
        let graph = ScheduleGraph::build(&input, &long);
        assert_eq!(graph.slots(1).len(), 5);
        assert_eq!(graph.opponents(1).count(), 3);
        assert!(graph.slots(1)[4].is_bye());
        assert_eq!(graph.slots(1)[4].week, 5);
    }

    #[test]
    fn configured_weeks_are_capped() {
        let input = LeagueInput {
            teams: lookup(&[1, 2]),
            weeks: vec![vec![rec(1, Some(1), 50.0), rec(2, Some(1), 40.0)]],
        };
        let huge = SeasonConfig {
            weeks: Some(usize::MAX),
            ..SeasonConfig::default()
        };
        let graph = ScheduleGraph::build(&input, &huge);
        assert_eq!(graph.weeks(), MAX_SEASON_WEEKS);
        assert_eq!(graph.slots(2).len(), MAX_SEASON_WEEKS);
        assert_eq!(graph.opponents(2).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn edges_follow_week_order_and_skip_byes() {
        let input = LeagueInput {
            teams: lookup(&[1, 2, 3]),
            weeks: vec![
                vec![rec(1, Some(1), 1.0), rec(2, Some(1), 2.0), rec(3, Some(2), 3.0)],
                vec![rec(1, Some(1), 1.0), rec(3, Some(1), 2.0), rec(2, Some(2), 3.0)],
                vec![rec(1, Some(1), 1.0), rec(2, Some(1), 2.0), rec(3, Some(2), 3.0)],
            ],
        };
        let graph = ScheduleGraph::build(&input, &SeasonConfig::default());
        assert_eq!(graph.edges(1).collect::<Vec<_>>(), vec![(1, 2), (2, 3), (3, 2)]);
        assert_eq!(graph.edges(3).collect::<Vec<_>>(), vec![(2, 1)]);
        assert!(graph.pairings(0).is_empty());
    }
}
