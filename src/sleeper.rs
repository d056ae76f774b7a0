//! Parsing for Sleeper league payloads that have already been downloaded.
//!
//! Fetching is someone else's job; these functions only turn the raw JSON of
//! the `users`, `rosters` and `matchups/{week}` endpoints into a `LeagueInput`.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::config::SeasonConfig;
use crate::schedule::{LeagueInput, MatchupRecord, RosterId};

#[derive(Debug, Clone, Deserialize)]
pub struct SleeperUser {
    pub user_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SleeperRoster {
    pub roster_id: RosterId,
    #[serde(default)]
    pub owner_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SleeperMatchup {
    roster_id: RosterId,
    #[serde(default)]
    matchup_id: Option<u32>,
    #[serde(default)]
    points: Option<f64>,
}

/// Everything needed for one season, as saved by the fetcher.
#[derive(Debug, Clone, Deserialize)]
pub struct SleeperSeasonDump {
    #[serde(default)]
    pub league_id: Option<String>,
    pub users: Vec<SleeperUser>,
    pub rosters: Vec<SleeperRoster>,
    /// One array per week, week 1 first. A `null` week has no games.
    /// Weeks stay raw until conversion so a bad row can name its week.
    pub matchups: Vec<Option<Box<RawValue>>>,
}

pub fn parse_users_json(raw: &str) -> Result<Vec<SleeperUser>> {
    parse_array_or_null(raw).context("invalid users json")
}

pub fn parse_rosters_json(raw: &str) -> Result<Vec<SleeperRoster>> {
    parse_array_or_null(raw).context("invalid rosters json")
}

pub fn parse_matchups_json(raw: &str) -> Result<Vec<MatchupRecord>> {
    let rows: Vec<SleeperMatchup> = parse_array_or_null(raw).context("invalid matchups json")?;
    Ok(rows.into_iter().map(matchup_record).collect())
}

/// Roster id to the owner's display name. Rosters without an owner, or whose
/// owner is not among `users`, get the configured placeholder.
pub fn build_team_lookup(
    users: &[SleeperUser],
    rosters: &[SleeperRoster],
    config: &SeasonConfig,
) -> BTreeMap<RosterId, String> {
    let names: HashMap<&str, &str> = users
        .iter()
        .filter_map(|u| {
            let name = u.display_name.as_deref()?.trim();
            (!name.is_empty()).then_some((u.user_id.as_str(), name))
        })
        .collect();

    rosters
        .iter()
        .map(|r| {
            let name = r
                .owner_id
                .as_deref()
                .and_then(|owner| names.get(owner))
                .map(|name| (*name).to_string())
                .unwrap_or_else(|| config.placeholder_name(r.roster_id));
            (r.roster_id, name)
        })
        .collect()
}

pub fn league_input_from_dump(
    dump: SleeperSeasonDump,
    config: &SeasonConfig,
) -> Result<LeagueInput> {
    let teams = build_team_lookup(&dump.users, &dump.rosters, config);
    let mut weeks = Vec::with_capacity(dump.matchups.len());
    for (idx, week) in dump.matchups.into_iter().enumerate() {
        let rows: Vec<SleeperMatchup> = match week {
            Some(raw) => parse_array_or_null(raw.get())
                .with_context(|| format!("invalid matchup row in week {}", idx + 1))?,
            None => Vec::new(),
        };
        weeks.push(rows.into_iter().map(matchup_record).collect());
    }
    Ok(LeagueInput { teams, weeks })
}

pub fn parse_season_dump_json(raw: &str, config: &SeasonConfig) -> Result<LeagueInput> {
    let dump: SleeperSeasonDump =
        serde_json::from_str(raw.trim()).context("invalid season dump json")?;
    if let Some(league_id) = dump.league_id.as_deref() {
        tracing::debug!(league_id, weeks = dump.matchups.len(), "parsed season dump");
    }
    league_input_from_dump(dump, config)
}

fn matchup_record(row: SleeperMatchup) -> MatchupRecord {
    MatchupRecord {
        roster_id: row.roster_id,
        matchup_id: row.matchup_id,
        points: row.points.unwrap_or(0.0),
    }
}

fn parse_array_or_null<T: serde::de::DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_str(trimmed)?)
}
