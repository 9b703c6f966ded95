//! Sleeper payload shapes that have no engine counterpart, and decoding for
//! the loosely shaped stats and schedule feeds.

use chrono::DateTime;
use league_engine::{GameStatus, PlayerStatLine, ScheduledGame};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// League metadata from `/league/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SleeperLeague {
    #[serde(default)]
    pub league_id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub season: Option<String>,

    /// e.g. "in_season", "complete"
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub sport: Option<String>,

    #[serde(default)]
    pub total_rosters: Option<u32>,

    #[serde(default)]
    pub avatar: Option<String>,
}

/// A game as reported by the season schedule feed
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawScheduledGame {
    #[serde(default)]
    pub game_id: Option<String>,

    /// Tip-off in epoch milliseconds
    #[serde(default)]
    pub start_time: Option<i64>,

    #[serde(default)]
    pub home_team: Option<String>,

    #[serde(default)]
    pub away_team: Option<String>,

    #[serde(default)]
    pub week: Option<u32>,

    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub home_score: Option<u32>,

    #[serde(default)]
    pub away_score: Option<u32>,
}

impl RawScheduledGame {
    /// Convert to a scheduled game; `None` when a required field is missing
    pub fn into_game(self, fallback_id: &str) -> Option<ScheduledGame> {
        let status = match self.status.as_deref() {
            Some("complete") => GameStatus::Complete,
            Some("in_progress") => GameStatus::InProgress,
            _ => GameStatus::Upcoming,
        };

        Some(ScheduledGame {
            game_id: self.game_id.unwrap_or_else(|| fallback_id.to_string()),
            start_time: DateTime::from_timestamp_millis(self.start_time?)?,
            home_team: self.home_team?,
            away_team: self.away_team?,
            week: self.week?,
            status,
            home_score: self.home_score,
            away_score: self.away_score,
        })
    }
}

/// Entries of a payload that is either a JSON array or an object keyed by id
fn keyed_entries(payload: Value) -> Vec<(String, Value)> {
    match payload {
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => {
            items.into_iter().enumerate().map(|(index, item)| (index.to_string(), item)).collect()
        }
        _ => Vec::new(),
    }
}

/// Decode a stats or projections payload into per-player lines
///
/// The object form is keyed by player ID, which fills in a missing
/// `player_id`. Entries that fail to decode are skipped.
pub fn parse_stat_lines(payload: Value) -> Vec<PlayerStatLine> {
    let keyed_by_id = payload.is_object();

    keyed_entries(payload)
        .into_iter()
        .filter_map(|(key, entry)| match serde_json::from_value::<PlayerStatLine>(entry) {
            Ok(mut line) => {
                if line.player_id.is_empty() && keyed_by_id {
                    line.player_id = key;
                }
                Some(line)
            }
            Err(e) => {
                debug!("Skipping malformed stat line {}: {}", key, e);
                None
            }
        })
        .collect()
}

/// Decode the season schedule feed, skipping incomplete games
pub fn parse_schedule(payload: Value) -> Vec<ScheduledGame> {
    keyed_entries(payload)
        .into_iter()
        .filter_map(|(key, entry)| {
            let game = serde_json::from_value::<RawScheduledGame>(entry)
                .ok()
                .and_then(|raw| raw.into_game(&key));
            if game.is_none() {
                debug!("Skipping incomplete schedule entry {}", key);
            }
            game
        })
        .collect()
}
