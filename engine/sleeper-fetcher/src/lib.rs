//! Sleeper Fetcher
//!
//! Read-only client for the Sleeper fantasy API: league, rosters, users,
//! weekly matchups, research, box scores, projections and the NBA season
//! schedule. Responses are memoized with stale-while-revalidate semantics and
//! every week-scoped request is cached under its week.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod models;

pub use cache::{Freshness, ResponseCache};
pub use config::{CacheConfig, SleeperConfig};
pub use error::{FetchError, Result};
pub use fetcher::{Endpoint, SleeperFetcher};
pub use models::*;
