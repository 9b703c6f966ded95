//! League Dashboard Library
//!
//! Host for the league engine: configuration, logging, the Sleeper-backed
//! dashboard service, report rendering, and the command line interface.

use anyhow::{Context, Result};
use std::path::Path;

pub mod cli;
pub mod config;
pub mod logging;
pub mod report;
pub mod service;

pub use cli::{Cli, CliHandler, Commands};
pub use config::DashboardConfig;
pub use logging::initialize_logging;
pub use report::{render, OutputFormat, SliceResult, TextReport};
pub use service::DashboardService;

/// Load configuration from an optional file and environment variables
pub fn load_configuration(path: Option<&Path>) -> Result<DashboardConfig> {
    config::load_config(path).context("Failed to load dashboard configuration")
}
