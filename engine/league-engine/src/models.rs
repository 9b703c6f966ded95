use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Deserialize `null` the same as a missing field
pub(crate) fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw stat line as reported by the Sleeper stats and projections feeds
///
/// Every key is optional: in-progress games, byes, and projections all omit
/// categories freely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawStatLine {
    #[serde(default)]
    pub pts: Option<f64>,
    #[serde(default)]
    pub reb: Option<f64>,
    #[serde(default)]
    pub dreb: Option<f64>,
    #[serde(default)]
    pub oreb: Option<f64>,
    #[serde(default)]
    pub ast: Option<f64>,
    #[serde(default)]
    pub stl: Option<f64>,
    #[serde(default)]
    pub blk: Option<f64>,
    #[serde(default)]
    pub to: Option<f64>,
    #[serde(default)]
    pub fgm: Option<f64>,
    #[serde(default)]
    pub fga: Option<f64>,
    #[serde(default)]
    pub ftm: Option<f64>,
    #[serde(default)]
    pub fta: Option<f64>,
    #[serde(default)]
    pub tpm: Option<f64>,
}

/// One player's entry in a stats or projections payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStatLine {
    #[serde(default, deserialize_with = "null_to_default")]
    pub player_id: String,

    /// Game date as reported by the feed (e.g., "2023-11-14")
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub stats: Option<RawStatLine>,
}

/// Per-game counting stats for one player
///
/// Counts are carried as `f64` because projection feeds report fractional
/// values; box scores carry whole numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxScoreStats {
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub steals: f64,
    pub blocks: f64,
    pub turnovers: f64,
    pub field_goals_made: f64,
    pub field_goals_attempted: f64,
    pub free_throws_made: f64,
    pub free_throws_attempted: f64,
    pub three_pointers_made: f64,
}

impl From<&RawStatLine> for BoxScoreStats {
    fn from(raw: &RawStatLine) -> Self {
        let value = |stat: Option<f64>| stat.unwrap_or(0.0);

        // Split rebounds win over the combined key when the feed reports them
        let rebounds = match (raw.dreb, raw.oreb) {
            (None, None) => value(raw.reb),
            (dreb, oreb) => value(dreb) + value(oreb),
        };

        Self {
            points: value(raw.pts),
            rebounds,
            assists: value(raw.ast),
            steals: value(raw.stl),
            blocks: value(raw.blk),
            turnovers: value(raw.to),
            field_goals_made: value(raw.fgm),
            field_goals_attempted: value(raw.fga),
            free_throws_made: value(raw.ftm),
            free_throws_attempted: value(raw.fta),
            three_pointers_made: value(raw.tpm),
        }
    }
}

/// A fantasy point total, always rounded to two decimal places
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FantasyPoints(Decimal);

impl FantasyPoints {
    pub const ZERO: FantasyPoints = FantasyPoints(Decimal::ZERO);

    /// Wrap a value, rounding half away from zero to two places
    pub fn from_decimal(value: Decimal) -> Self {
        Self(value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero))
    }

    pub fn value(self) -> Decimal {
        self.0
    }

    pub fn to_f64(self) -> f64 {
        self.0.to_f64().unwrap_or(0.0)
    }

    pub fn is_positive(self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for FantasyPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Win/loss/points settings attached to a roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterSettings {
    #[serde(deserialize_with = "null_to_default")]
    pub wins: u32,
    #[serde(deserialize_with = "null_to_default")]
    pub losses: u32,
    #[serde(deserialize_with = "null_to_default")]
    pub ties: u32,
    #[serde(deserialize_with = "null_to_default")]
    pub fpts: f64,
    #[serde(deserialize_with = "null_to_default")]
    pub fpts_decimal: f64,
    #[serde(deserialize_with = "null_to_default")]
    pub fpts_against: f64,
    #[serde(deserialize_with = "null_to_default")]
    pub fpts_against_decimal: f64,
    #[serde(deserialize_with = "null_to_default")]
    pub ppts: f64,
    #[serde(deserialize_with = "null_to_default")]
    pub ppts_decimal: f64,
    #[serde(deserialize_with = "null_to_default")]
    pub waiver_budget_used: u32,
    #[serde(deserialize_with = "null_to_default")]
    pub waiver_position: u32,
    #[serde(deserialize_with = "null_to_default")]
    pub total_moves: u32,
}

impl RosterSettings {
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Points for, combining the whole and hundredths fields
    pub fn points_for(&self) -> f64 {
        self.fpts + self.fpts_decimal / 100.0
    }

    pub fn points_against(&self) -> f64 {
        self.fpts_against + self.fpts_against_decimal / 100.0
    }
}

/// A league participant's roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub roster_id: u32,

    #[serde(default, deserialize_with = "null_to_default")]
    pub owner_id: String,

    #[serde(default, deserialize_with = "null_to_default")]
    pub league_id: String,

    /// Every player ID on the roster
    #[serde(default, deserialize_with = "null_to_default")]
    pub players: Vec<String>,

    #[serde(default, deserialize_with = "null_to_default")]
    pub starters: Vec<String>,

    /// Injured reserve; `None` when the league has no IR slots
    #[serde(default)]
    pub reserve: Option<Vec<String>>,

    #[serde(default)]
    pub taxi: Option<Vec<String>>,

    #[serde(default, deserialize_with = "null_to_default")]
    pub settings: RosterSettings,

    /// Free-form annotations (team name, streak, player nicknames)
    #[serde(default, deserialize_with = "null_to_default")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Roster {
    /// String value of a metadata key
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|value| value.as_str())
    }
}

/// One team's score entry for a week
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    /// Shared by the entries that face each other; `None` on a bye
    #[serde(default)]
    pub matchup_id: Option<u32>,

    pub roster_id: u32,

    #[serde(default, deserialize_with = "null_to_default")]
    pub points: f64,

    #[serde(default, deserialize_with = "null_to_default")]
    pub starters: Vec<String>,

    #[serde(default, deserialize_with = "null_to_default")]
    pub players: Vec<String>,
}

/// A league member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,

    #[serde(default, deserialize_with = "null_to_default")]
    pub display_name: String,

    #[serde(default)]
    pub avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_stat_mapping_defaults_missing_to_zero() {
        let raw: RawStatLine =
            serde_json::from_str(r#"{ "pts": 21, "dreb": 6, "oreb": 2, "ast": 4 }"#).unwrap();
        let stats = BoxScoreStats::from(&raw);

        assert_eq!(stats.points, 21.0);
        assert_eq!(stats.rebounds, 8.0);
        assert_eq!(stats.assists, 4.0);
        assert_eq!(stats.steals, 0.0);
        assert_eq!(stats.field_goals_attempted, 0.0);
    }

    #[test]
    fn test_combined_rebounds_used_without_split() {
        let raw = RawStatLine { reb: Some(12.0), ..Default::default() };
        assert_eq!(BoxScoreStats::from(&raw).rebounds, 12.0);

        let raw = RawStatLine { reb: Some(12.0), oreb: Some(3.0), ..Default::default() };
        assert_eq!(BoxScoreStats::from(&raw).rebounds, 3.0);
    }

    #[test]
    fn test_fantasy_points_round_half_up() {
        assert_eq!(FantasyPoints::from_decimal(Decimal::new(12345, 3)).to_string(), "12.35");
        assert_eq!(FantasyPoints::from_decimal(Decimal::new(-12345, 3)).to_string(), "-12.35");
        assert_eq!(FantasyPoints::from_decimal(Decimal::from(41)).to_string(), "41.00");
    }

    #[test]
    fn test_roster_tolerates_nulls() {
        let roster: Roster = serde_json::from_str(
            r#"{
                "roster_id": 3,
                "owner_id": null,
                "players": null,
                "starters": ["1", "2"],
                "reserve": null,
                "settings": { "wins": 5, "losses": 2, "fpts": 812, "fpts_decimal": 45 },
                "metadata": { "streak": "2W", "p_nick_1": "Joker", "record": null }
            }"#,
        )
        .unwrap();

        assert_eq!(roster.owner_id, "");
        assert!(roster.players.is_empty());
        assert!(roster.reserve.is_none());
        assert_eq!(roster.settings.games_played(), 7);
        assert!((roster.settings.points_for() - 812.45).abs() < 1e-9);
        assert_eq!(roster.metadata_str("streak"), Some("2W"));
        assert_eq!(roster.metadata_str("record"), None);
    }

    #[test]
    fn test_matchup_null_points_and_bye() {
        let matchup: Matchup =
            serde_json::from_str(r#"{ "matchup_id": null, "roster_id": 4, "points": null }"#)
                .unwrap();
        assert_eq!(matchup.matchup_id, None);
        assert_eq!(matchup.points, 0.0);
    }
}
