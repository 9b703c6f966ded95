//! League Dashboard
//!
//! Entry point: loads configuration, builds the dashboard service, and runs
//! one CLI command against the configured Sleeper league.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use league_dashboard::{initialize_logging, load_configuration, Cli, CliHandler, DashboardService};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = load_configuration(cli.config.as_deref())?;

    initialize_logging(&config.logging).context("Failed to initialize logging")?;
    info!("Starting League Dashboard v{}", env!("CARGO_PKG_VERSION"));

    let service = DashboardService::new(&config).await.context("Failed to initialize dashboard")?;

    let handler = CliHandler::new(service, cli.format);
    let output = handler.handle_command(cli.command, cli.week).await?;
    println!("{output}");

    Ok(())
}
