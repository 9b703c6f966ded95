//! Dashboard configuration management

use anyhow::{Context, Result};
use league_engine::{ScoringSettings, DEFAULT_FALLBACK_WEEK};
use serde::{Deserialize, Serialize};
use sleeper_fetcher::{CacheConfig, SleeperConfig};
use std::path::{Path, PathBuf};

/// Main dashboard configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Sleeper API configuration
    pub sleeper: SleeperConfig,

    /// Response cache windows
    pub cache: CacheConfig,

    /// League week resolution
    pub schedule: ScheduleSettings,

    /// League scoring weights
    pub scoring: ScoringSettings,

    /// Player registry source
    pub players: PlayersConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Week shown when today falls outside the schedule table
    pub fallback_week: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayersConfig {
    /// Sleeper players dump (JSON object keyed by player ID)
    pub file: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self { fallback_week: DEFAULT_FALLBACK_WEEK }
    }
}

impl Default for PlayersConfig {
    fn default() -> Self {
        Self { file: PathBuf::from("data/players.json") }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "compact".to_string() }
    }
}

/// Load configuration: defaults, then the optional TOML file, then environment
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    let mut config = match path {
        Some(path) => {
            tracing::debug!("Loading configuration from file: {:?}", path);
            load_from_file(path)?
        }
        None => DashboardConfig::default(),
    };

    load_from_env(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config)?;

    Ok(config)
}

/// Load configuration from a TOML file layered over the defaults
fn load_from_file(path: &Path) -> Result<DashboardConfig> {
    let defaults = ::config::Config::try_from(&DashboardConfig::default())
        .context("Failed to serialize default configuration")?;

    ::config::Config::builder()
        .add_source(defaults)
        .add_source(::config::File::from(path).format(::config::FileFormat::Toml))
        .build()
        .with_context(|| format!("Failed to read configuration file: {:?}", path))?
        .try_deserialize()
        .with_context(|| format!("Invalid configuration file: {:?}", path))
}

/// Apply environment overrides using `lookup` to read variables
pub fn load_from_env<F>(config: &mut DashboardConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(league_id) = lookup("SLEEPER_LEAGUE_ID") {
        config.sleeper.league_id = league_id;
    }

    if let Some(season) = lookup("DASHBOARD_SEASON") {
        config.sleeper.season =
            season.parse().with_context(|| format!("Invalid DASHBOARD_SEASON: {season}"))?;
    }

    if let Some(level) = lookup("DASHBOARD_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Some(format) = lookup("DASHBOARD_LOG_FORMAT") {
        config.logging.format = format;
    }

    if let Some(file) = lookup("DASHBOARD_PLAYERS_FILE") {
        config.players.file = PathBuf::from(file);
    }

    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &DashboardConfig) -> Result<()> {
    config.sleeper.validate().context("Invalid sleeper configuration")?;
    config.cache.validate().context("Invalid cache configuration")?;
    config.scoring.validate().context("Invalid scoring configuration")?;

    if config.schedule.fallback_week == 0 {
        return Err(anyhow::anyhow!("Fallback week must be at least 1"));
    }

    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow::anyhow!("Invalid log level: {}", config.logging.level)),
    }

    match config.logging.format.as_str() {
        "json" | "pretty" | "compact" => {}
        _ => return Err(anyhow::anyhow!("Invalid log format: {}", config.logging.format)),
    }

    Ok(())
}
