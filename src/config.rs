use serde::{Deserialize, Serialize};

const DEFAULT_PLACEHOLDER_PREFIX: &str = "Team";

/// Longest schedule a configured week count may ask for.
pub const MAX_SEASON_WEEKS: usize = 64;

/// What a bye slot records as points-for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByePoints {
    /// Byes score nothing, whatever the platform reported.
    #[default]
    Zero,
    /// Keep the roster's reported points for the week.
    Reported,
}

impl ByePoints {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "zero" | "0" | "none" => Some(Self::Zero),
            "reported" | "keep" => Some(Self::Reported),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonConfig {
    /// Schedule length W. `None` uses every week present in the input.
    pub weeks: Option<usize>,
    pub bye_points: ByePoints,
    pub placeholder_prefix: String,
}

impl Default for SeasonConfig {
    fn default() -> Self {
        Self {
            weeks: None,
            bye_points: ByePoints::Zero,
            placeholder_prefix: DEFAULT_PLACEHOLDER_PREFIX.to_string(),
        }
    }
}

impl SeasonConfig {
    /// Reads `SEASON_WEEKS`, `SEASON_BYE_POINTS` and `SEASON_PLACEHOLDER_PREFIX`.
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let weeks = lookup("SEASON_WEEKS")
            .and_then(|val| val.trim().parse::<u32>().ok())
            .map(|w| w as usize)
            .filter(|w| (1..=MAX_SEASON_WEEKS).contains(w));
        let bye_points = lookup("SEASON_BYE_POINTS")
            .and_then(|val| ByePoints::parse(&val))
            .unwrap_or(defaults.bye_points);
        let placeholder_prefix = lookup("SEASON_PLACEHOLDER_PREFIX")
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or(defaults.placeholder_prefix);
        Self {
            weeks,
            bye_points,
            placeholder_prefix,
        }
    }

    pub fn placeholder_name(&self, roster_id: u32) -> String {
        format!("{} {roster_id}", self.placeholder_prefix)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_env_gives_defaults() {
        let cfg = SeasonConfig::from_lookup(|_| None);
        assert_eq!(cfg, SeasonConfig::default());
        assert_eq!(cfg.placeholder_name(7), "Team 7");
    }

    #[test]
    fn env_values_are_parsed() {
        let cfg = SeasonConfig::from_lookup(lookup_from(&[
            ("SEASON_WEEKS", " 14 "),
            ("SEASON_BYE_POINTS", "Reported"),
            ("SEASON_PLACEHOLDER_PREFIX", "Roster"),
        ]));
        assert_eq!(cfg.weeks, Some(14));
        assert_eq!(cfg.bye_points, ByePoints::Reported);
        assert_eq!(cfg.placeholder_name(3), "Roster 3");
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = SeasonConfig::from_lookup(lookup_from(&[
            ("SEASON_WEEKS", "0"),
            ("SEASON_BYE_POINTS", "sometimes"),
            ("SEASON_PLACEHOLDER_PREFIX", "   "),
        ]));
        assert_eq!(cfg, SeasonConfig::default());
    }

    #[test]
    fn oversized_week_count_falls_back() {
        for raw in ["18446744073709551615", "4294967296", "65"] {
            let cfg = SeasonConfig::from_lookup(lookup_from(&[("SEASON_WEEKS", raw)]));
            assert_eq!(cfg.weeks, None, "{raw}");
        }
        let cfg = SeasonConfig::from_lookup(lookup_from(&[("SEASON_WEEKS", "64")]));
        assert_eq!(cfg.weeks, Some(MAX_SEASON_WEEKS));
    }
}
