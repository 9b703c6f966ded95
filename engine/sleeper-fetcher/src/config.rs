use crate::error::{FetchError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Sleeper API client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SleeperConfig {
    /// League, stats and research endpoints
    pub api_base: String,

    /// Projections and season schedule endpoints
    pub projections_base: String,

    /// Sleeper league ID (opaque)
    pub league_id: String,

    /// NBA season year used in stats, projections and schedule paths
    pub season: u32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Response cache windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a response is served without refetching
    pub fresh_secs: u64,

    /// How long a stale response may still be served while it refreshes
    pub retain_secs: u64,
}

impl Default for SleeperConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.sleeper.app/v1".to_string(),
            projections_base: "https://api.sleeper.com".to_string(),
            league_id: String::new(),
            season: 2024,
            timeout_secs: 30,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { fresh_secs: 5 * 60, retain_secs: 60 * 60 }
    }
}

impl SleeperConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.league_id.trim().is_empty() {
            return Err(FetchError::Config("league_id is not set".to_string()));
        }
        if self.api_base.is_empty() || self.projections_base.is_empty() {
            return Err(FetchError::Config("API base URLs must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(FetchError::Config("timeout_secs must be greater than zero".to_string()));
        }
        Ok(())
    }
}

impl CacheConfig {
    pub fn fresh_for(&self) -> Duration {
        Duration::from_secs(self.fresh_secs)
    }

    pub fn retain_for(&self) -> Duration {
        Duration::from_secs(self.retain_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.retain_secs < self.fresh_secs {
            return Err(FetchError::Config(format!(
                "retain_secs ({}) must not be shorter than fresh_secs ({})",
                self.retain_secs, self.fresh_secs
            )));
        }
        Ok(())
    }
}
