use serde::{Deserialize, Serialize};
use std::fmt;

/// Team code used for players without an NBA team
pub const FREE_AGENT_TEAM: &str = "FA";

/// Position used when the feed carries no fantasy position
pub const DEFAULT_POSITION: &str = "UTIL";

/// A player entry as it appears in the Sleeper players dump
///
/// The dump is an object keyed by player ID; every field may be missing or null.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPlayer {
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub fantasy_positions: Option<Vec<String>>,
    #[serde(default)]
    pub injury_status: Option<String>,
    #[serde(default)]
    pub injury_note: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub years_exp: Option<u32>,
    #[serde(default)]
    pub college: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A resolved NBA player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Sleeper player ID (e.g., "4866")
    pub player_id: String,

    pub first_name: String,

    pub last_name: String,

    /// Team abbreviation (e.g., "DEN"), "FA" for free agents
    pub team: String,

    /// Primary fantasy position (e.g., "C", "F", "G"), "UTIL" when unknown
    pub position: String,

    pub injury_status: Option<String>,

    pub injury_note: Option<String>,

    pub age: Option<u32>,

    pub number: Option<u32>,

    pub years_exp: Option<u32>,

    pub college: Option<String>,

    /// Roster status reported by the feed (e.g., "Active", "Inactive")
    pub status: Option<String>,
}

impl Player {
    /// Build a player from a raw feed entry
    ///
    /// `key` is the object key the entry was stored under and wins over a
    /// missing `player_id` field.
    pub fn from_raw(key: &str, raw: RawPlayer) -> Self {
        let position = raw
            .fantasy_positions
            .as_ref()
            .and_then(|positions| positions.first().cloned())
            .or(raw.position)
            .unwrap_or_else(|| DEFAULT_POSITION.to_string());

        Self {
            player_id: raw.player_id.unwrap_or_else(|| key.to_string()),
            first_name: raw.first_name.unwrap_or_default(),
            last_name: raw.last_name.unwrap_or_default(),
            team: raw.team.unwrap_or_else(|| FREE_AGENT_TEAM.to_string()),
            position,
            injury_status: raw.injury_status,
            injury_note: raw.injury_note,
            age: raw.age,
            number: raw.number,
            years_exp: raw.years_exp,
            college: raw.college,
            status: raw.status,
        }
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether the player is on an NBA team and not marked inactive
    pub fn is_active(&self) -> bool {
        self.status.as_deref() != Some("Inactive") && self.team != FREE_AGENT_TEAM
    }

    pub fn is_injured(&self) -> bool {
        self.injury_status.is_some()
    }
}

/// Errors that can occur during player lookup
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerLookupError {
    /// Player ID not present in the registry
    PlayerNotFound(String),
}

impl fmt::Display for PlayerLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerLookupError::PlayerNotFound(id) => {
                write!(f, "Player '{id}' not found in registry")
            }
        }
    }
}

impl std::error::Error for PlayerLookupError {}

/// Errors that can occur while building the registry
#[derive(Debug)]
pub enum RegistryError {
    /// The players file could not be read
    Io(std::io::Error),

    /// The players file is not a valid players dump
    Parse(serde_json::Error),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Io(e) => write!(f, "Failed to read players file: {e}"),
            RegistryError::Parse(e) => write!(f, "Failed to parse players file: {e}"),
        }
    }
}

impl std::error::Error for RegistryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistryError::Io(e) => Some(e),
            RegistryError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for RegistryError {
    fn from(e: std::io::Error) -> Self {
        RegistryError::Io(e)
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        RegistryError::Parse(e)
    }
}
