use crate::types::{Player, PlayerLookupError, RawPlayer, RegistryError};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Player Registry - Immutable player identity table
///
/// Built once from the Sleeper players dump and shared by reference
/// (typically behind an `Arc`). All lookups are O(1) hash lookups or linear
/// scans over an immutable map; none of them mutate state.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    /// Map from Sleeper player ID to Player
    players_by_id: HashMap<String, Player>,
}

impl PlayerRegistry {
    /// Create a registry from already-resolved players
    pub fn from_players<I>(players: I) -> Self
    where
        I: IntoIterator<Item = Player>,
    {
        let players_by_id =
            players.into_iter().map(|player| (player.player_id.clone(), player)).collect();
        Self { players_by_id }
    }

    /// Parse the Sleeper players dump (an object keyed by player ID)
    pub fn from_json_str(json: &str) -> Result<Self, RegistryError> {
        let raw: HashMap<String, RawPlayer> = serde_json::from_str(json)?;
        let registry =
            Self::from_players(raw.into_iter().map(|(key, entry)| Player::from_raw(&key, entry)));

        info!("Built player registry with {} players", registry.len());
        Ok(registry)
    }

    /// Load the players dump from a JSON file
    pub async fn load_from_file<P: AsRef<Path>>(file_path: P) -> Result<Self, RegistryError> {
        info!("Loading player data from: {:?}", file_path.as_ref());

        let json_content = tokio::fs::read_to_string(&file_path).await?;
        Self::from_json_str(&json_content)
    }

    /// Get a player by Sleeper player ID
    pub fn get(&self, player_id: &str) -> Option<&Player> {
        let player = self.players_by_id.get(player_id);
        if player.is_none() {
            debug!("Player lookup miss: {}", player_id);
        }
        player
    }

    /// Get a player by ID, reporting a miss as an error
    pub fn lookup(&self, player_id: &str) -> Result<&Player, PlayerLookupError> {
        self.players_by_id
            .get(player_id)
            .ok_or_else(|| PlayerLookupError::PlayerNotFound(player_id.to_string()))
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.players_by_id.contains_key(player_id)
    }

    /// Display name for a player, falling back to the raw ID
    pub fn display_name(&self, player_id: &str) -> String {
        self.get(player_id).map(Player::full_name).unwrap_or_else(|| player_id.to_string())
    }

    /// Search for players by partial name match (case-insensitive)
    pub fn search_by_name(&self, query: &str) -> Vec<&Player> {
        let query_lower = query.to_lowercase();
        self.players_by_id
            .values()
            .filter(|player| player.full_name().to_lowercase().contains(&query_lower))
            .collect()
    }

    /// Players on a team (team code is matched case-insensitively)
    pub fn by_team(&self, team: &str) -> Vec<&Player> {
        let team_upper = team.to_uppercase();
        self.players_by_id.values().filter(|player| player.team == team_upper).collect()
    }

    /// Players at a position (matched case-insensitively)
    pub fn by_position(&self, position: &str) -> Vec<&Player> {
        let position_upper = position.to_uppercase();
        self.players_by_id.values().filter(|player| player.position == position_upper).collect()
    }

    /// Players on an NBA team who are not marked inactive
    pub fn active_players(&self) -> Vec<&Player> {
        self.players_by_id.values().filter(|player| player.is_active()).collect()
    }

    pub fn len(&self) -> usize {
        self.players_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players_by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PLAYERS_JSON: &str = r#"{
        "4866": {
            "player_id": "4866",
            "first_name": "Nikola",
            "last_name": "Jokic",
            "team": "DEN",
            "fantasy_positions": ["C"],
            "status": "Active"
        },
        "1054": {
            "first_name": "Jamal",
            "last_name": "Murray",
            "team": "DEN",
            "position": "PG",
            "injury_status": "Questionable",
            "injury_note": "Hamstring"
        },
        "9001": {
            "first_name": "Retired",
            "last_name": "Guy",
            "team": null,
            "status": "Inactive"
        }
    }"#;

    fn create_test_registry() -> PlayerRegistry {
        PlayerRegistry::from_json_str(PLAYERS_JSON).unwrap()
    }

    #[test]
    fn test_registry_creation() {
        let registry = create_test_registry();

        assert_eq!(registry.len(), 3);
        assert!(!registry.is_empty());
        assert!(registry.contains("4866"));
    }

    #[test]
    fn test_player_lookup() {
        let registry = create_test_registry();

        let jokic = registry.get("4866").unwrap();
        assert_eq!(jokic.full_name(), "Nikola Jokic");
        assert_eq!(jokic.position, "C");
        assert_eq!(jokic.team, "DEN");

        // Key is used when the entry has no player_id
        let murray = registry.get("1054").unwrap();
        assert_eq!(murray.player_id, "1054");
        assert_eq!(murray.position, "PG");
        assert!(murray.is_injured());

        assert!(registry.get("0000").is_none());
        assert_eq!(
            registry.lookup("0000").unwrap_err(),
            PlayerLookupError::PlayerNotFound("0000".to_string())
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let registry = create_test_registry();

        let retired = registry.get("9001").unwrap();
        assert_eq!(retired.team, "FA");
        assert_eq!(retired.position, "UTIL");
        assert!(!retired.is_active());
    }

    #[test]
    fn test_search_players() {
        let registry = create_test_registry();

        let results = registry.search_by_name("jok");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].last_name, "Jokic");

        assert_eq!(registry.by_team("den").len(), 2);
        assert_eq!(registry.by_position("c").len(), 1);
        assert_eq!(registry.active_players().len(), 2);
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let registry = create_test_registry();

        assert_eq!(registry.display_name("4866"), "Nikola Jokic");
        assert_eq!(registry.display_name("777"), "777");
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let err = PlayerRegistry::from_json_str("[1, 2, 3]").unwrap_err();
        assert!(matches!(err, RegistryError::Parse(_)));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PLAYERS_JSON.as_bytes()).unwrap();

        let registry = PlayerRegistry::load_from_file(file.path()).await.unwrap();
        assert_eq!(registry.len(), 3);

        let missing = PlayerRegistry::load_from_file("/nonexistent/players.json").await;
        assert!(matches!(missing, Err(RegistryError::Io(_))));
    }
}
