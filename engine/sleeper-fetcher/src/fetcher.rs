use crate::cache::ResponseCache;
use crate::config::{CacheConfig, SleeperConfig};
use crate::error::{FetchError, Result};
use crate::models::{parse_schedule, parse_stat_lines, SleeperLeague};
use league_engine::{GameSchedule, Matchup, PlayerStatLine, ResearchStat, Roster, User};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, info};

/// Positions requested from the projections feed
const PROJECTION_POSITIONS: [&str; 4] = ["C", "F", "G", "UTIL"];

/// A Sleeper endpoint and its path parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    League,
    Rosters,
    Users,
    Matchups { week: u32 },
    Research { week: u32 },
    Stats { week: u32 },
    Projections { week: u32 },
    Schedule,
}

impl Endpoint {
    pub fn url(&self, config: &SleeperConfig) -> String {
        let api = config.api_base.trim_end_matches('/');
        let projections = config.projections_base.trim_end_matches('/');
        let league = &config.league_id;
        let season = config.season;

        match self {
            Endpoint::League => format!("{api}/league/{league}"),
            Endpoint::Rosters => format!("{api}/league/{league}/rosters"),
            Endpoint::Users => format!("{api}/league/{league}/users"),
            Endpoint::Matchups { week } => format!("{api}/league/{league}/matchups/{week}"),
            Endpoint::Research { week } => {
                format!("{api}/players/nba/research/regular/{season}/{week}")
            }
            Endpoint::Stats { week } => format!("{api}/stats/nba/regular/{season}/{week}"),
            Endpoint::Projections { week } => {
                let positions: String =
                    PROJECTION_POSITIONS.iter().map(|p| format!("&position[]={p}")).collect();
                format!(
                    "{projections}/projections/nba/{season}/{week}?season_type=regular{positions}&order_by=std"
                )
            }
            Endpoint::Schedule => format!("{projections}/schedule/nba/regular/{season}"),
        }
    }

    /// Cache key; week-scoped endpoints embed the week
    pub fn cache_key(&self) -> String {
        match self {
            Endpoint::League => "league".to_string(),
            Endpoint::Rosters => "rosters".to_string(),
            Endpoint::Users => "users".to_string(),
            Endpoint::Matchups { week } => format!("matchups:{week}"),
            Endpoint::Research { week } => format!("research:{week}"),
            Endpoint::Stats { week } => format!("stats:{week}"),
            Endpoint::Projections { week } => format!("projections:{week}"),
            Endpoint::Schedule => "schedule".to_string(),
        }
    }
}

/// GET a URL and parse the body as JSON
async fn get_json(client: Client, url: String) -> Result<Value> {
    debug!("GET {}", url);

    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status { url, status: status.as_u16() });
    }

    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|source| FetchError::Decode { url, source })
}

/// Decode a payload, treating `null` as an empty result
fn decode<T>(url: &str, payload: Value) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if payload.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(payload)
        .map_err(|source| FetchError::Decode { url: url.to_string(), source })
}

/// Read-only client for the Sleeper API
///
/// Every response goes through the shared [`ResponseCache`]; clones share it.
#[derive(Debug, Clone)]
pub struct SleeperFetcher {
    config: SleeperConfig,
    client: Client,
    cache: ResponseCache,
}

impl SleeperFetcher {
    pub fn new(config: SleeperConfig, cache: CacheConfig) -> Result<Self> {
        config.validate()?;
        cache.validate()?;

        let client = Client::builder().timeout(config.timeout()).build()?;

        info!("Sleeper fetcher ready for league {} season {}", config.league_id, config.season);
        Ok(Self { config, client, cache: ResponseCache::new(cache) })
    }

    pub fn config(&self) -> &SleeperConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Raw JSON for an endpoint, served through the cache
    pub async fn fetch(&self, endpoint: Endpoint) -> Result<Value> {
        let url = endpoint.url(&self.config);
        let client = self.client.clone();
        self.cache.get_or_fetch(&endpoint.cache_key(), move || get_json(client, url)).await
    }

    async fn fetch_as<T>(&self, endpoint: Endpoint) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let payload = self.fetch(endpoint).await?;
        decode(&endpoint.url(&self.config), payload)
    }

    pub async fn league_info(&self) -> Result<SleeperLeague> {
        self.fetch_as(Endpoint::League).await
    }

    pub async fn rosters(&self) -> Result<Vec<Roster>> {
        self.fetch_as(Endpoint::Rosters).await
    }

    pub async fn users(&self) -> Result<Vec<User>> {
        self.fetch_as(Endpoint::Users).await
    }

    pub async fn matchups(&self, week: u32) -> Result<Vec<Matchup>> {
        self.fetch_as(Endpoint::Matchups { week }).await
    }

    /// Ownership and start percentages keyed by player ID
    pub async fn research(&self, week: u32) -> Result<HashMap<String, ResearchStat>> {
        self.fetch_as(Endpoint::Research { week }).await
    }

    /// Box-score lines for every player with stats in the week
    pub async fn week_stats(&self, week: u32) -> Result<Vec<PlayerStatLine>> {
        let payload = self.fetch(Endpoint::Stats { week }).await?;
        Ok(parse_stat_lines(payload))
    }

    /// Box-score lines for one player in the week
    pub async fn player_week_stats(
        &self,
        player_id: &str,
        week: u32,
    ) -> Result<Vec<PlayerStatLine>> {
        let lines = self.week_stats(week).await?;
        Ok(lines.into_iter().filter(|line| line.player_id == player_id).collect())
    }

    pub async fn projections(&self, week: u32) -> Result<Vec<PlayerStatLine>> {
        let payload = self.fetch(Endpoint::Projections { week }).await?;
        Ok(parse_stat_lines(payload))
    }

    pub async fn game_schedule(&self) -> Result<GameSchedule> {
        let payload = self.fetch(Endpoint::Schedule).await?;
        let games = parse_schedule(payload);
        info!("Loaded {} scheduled games for season {}", games.len(), self.config.season);
        Ok(GameSchedule::new(games))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> SleeperConfig {
        SleeperConfig {
            league_id: "1049".to_string(),
            season: 2024,
            ..Default::default()
        }
    }

    #[test]
    fn test_league_urls() {
        let config = config();

        assert_eq!(Endpoint::League.url(&config), "https://api.sleeper.app/v1/league/1049");
        assert_eq!(
            Endpoint::Rosters.url(&config),
            "https://api.sleeper.app/v1/league/1049/rosters"
        );
        assert_eq!(Endpoint::Users.url(&config), "https://api.sleeper.app/v1/league/1049/users");
        assert_eq!(
            Endpoint::Matchups { week: 3 }.url(&config),
            "https://api.sleeper.app/v1/league/1049/matchups/3"
        );
    }

    #[test]
    fn test_player_data_urls() {
        let config = config();

        assert_eq!(
            Endpoint::Research { week: 5 }.url(&config),
            "https://api.sleeper.app/v1/players/nba/research/regular/2024/5"
        );
        assert_eq!(
            Endpoint::Stats { week: 5 }.url(&config),
            "https://api.sleeper.app/v1/stats/nba/regular/2024/5"
        );
        assert_eq!(
            Endpoint::Projections { week: 5 }.url(&config),
            "https://api.sleeper.com/projections/nba/2024/5?season_type=regular&position[]=C&position[]=F&position[]=G&position[]=UTIL&order_by=std"
        );
        assert_eq!(
            Endpoint::Schedule.url(&config),
            "https://api.sleeper.com/schedule/nba/regular/2024"
        );
    }

    #[test]
    fn test_trailing_slash_in_base() {
        let config =
            SleeperConfig { api_base: "http://localhost:8080/v1/".to_string(), ..config() };
        assert_eq!(Endpoint::Users.url(&config), "http://localhost:8080/v1/league/1049/users");
    }

    #[test]
    fn test_cache_keys_scoped_by_week() {
        assert_ne!(
            Endpoint::Matchups { week: 3 }.cache_key(),
            Endpoint::Matchups { week: 4 }.cache_key()
        );
        assert_ne!(
            Endpoint::Stats { week: 3 }.cache_key(),
            Endpoint::Projections { week: 3 }.cache_key()
        );
        assert_eq!(Endpoint::Research { week: 7 }.cache_key(), "research:7");
    }

    #[test]
    fn test_decode_null_is_empty() {
        let matchups: Vec<Matchup> = decode("u", Value::Null).unwrap();
        assert!(matchups.is_empty());

        let research: HashMap<String, ResearchStat> =
            decode("u", json!({ "4866": { "owned": 99.5, "started": 97.0 } })).unwrap();
        assert_eq!(research["4866"].started, 97.0);

        let err =
            decode::<Vec<Roster>>("https://x.test/rosters", json!({ "oops": true })).unwrap_err();
        assert!(matches!(
            err,
            FetchError::Decode { ref url, .. } if url == "https://x.test/rosters"
        ));
    }

    #[test]
    fn test_new_rejects_missing_league() {
        let result = SleeperFetcher::new(SleeperConfig::default(), CacheConfig::default());
        assert!(matches!(result, Err(FetchError::Config(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cached_payload_served_without_network() {
        let fetcher = SleeperFetcher::new(config(), CacheConfig::default()).unwrap();
        fetcher
            .cache()
            .insert(
                &Endpoint::Matchups { week: 2 }.cache_key(),
                json!([{ "matchup_id": 1, "roster_id": 4, "points": 101.5 }]),
            )
            .await;

        let matchups = fetcher.matchups(2).await.unwrap();
        assert_eq!(matchups.len(), 1);
        assert_eq!(matchups[0].points, 101.5);
    }
}
