//! # Command Line Interface
//!
//! CLI for querying league scores, matchups, and player research.

use crate::report::{render, OutputFormat};
use crate::service::DashboardService;
use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use league_engine::ResearchSort;
use std::path::PathBuf;

/// Fantasy basketball league dashboard
#[derive(Parser)]
#[command(name = "league-dashboard")]
#[command(about = "Scores, matchups, and research for a Sleeper fantasy basketball league")]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// League week; defaults to the week containing today
    #[arg(short, long, global = true)]
    pub week: Option<u32>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show season standings
    Standings,
    /// Show every team's score for the week, ranked against the median
    Scorecard,
    /// Show head-to-head matchups for the week
    Matchups,
    /// Show ownership research
    Research {
        /// Column to sort by (descending)
        #[arg(long, value_enum, default_value_t = SortColumn::Owned)]
        sort: SortColumn,

        /// Only players no league team has rostered
        #[arg(long)]
        free_agents: bool,
    },
    /// Show the highest projected fantasy scores
    TopPerformers {
        /// Number of players to show
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one player's games for the week
    PlayerWeek {
        /// Sleeper player ID
        player_id: String,
    },
    /// Show the current league week
    CurrentWeek,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortColumn {
    Name,
    Owned,
    Started,
    Ratio,
    TeamOwned,
}

impl From<SortColumn> for ResearchSort {
    fn from(column: SortColumn) -> Self {
        match column {
            SortColumn::Name => ResearchSort::Name,
            SortColumn::Owned => ResearchSort::Owned,
            SortColumn::Started => ResearchSort::Started,
            SortColumn::Ratio => ResearchSort::Ratio,
            SortColumn::TeamOwned => ResearchSort::TeamOwned,
        }
    }
}

/// CLI handler
pub struct CliHandler {
    service: DashboardService,
    format: OutputFormat,
}

impl CliHandler {
    pub fn new(service: DashboardService, format: OutputFormat) -> Self {
        Self { service, format }
    }

    /// Run a command and return its rendered output
    pub async fn handle_command(&self, command: Commands, week: Option<u32>) -> Result<String> {
        let week = self.service.resolve_week(week);

        match command {
            Commands::Standings => render(&self.service.standings().await, self.format),
            Commands::Scorecard => render(&self.service.scorecard(week).await, self.format),
            Commands::Matchups => render(&self.service.matchups(week).await, self.format),
            Commands::Research { sort, free_agents } => {
                let report = self.service.research(week, sort.into(), free_agents).await;
                render(&report, self.format)
            }
            Commands::TopPerformers { limit } => {
                render(&self.service.top_performers(week, limit).await, self.format)
            }
            Commands::PlayerWeek { player_id } => {
                render(&self.service.player_week(&player_id, week).await, self.format)
            }
            Commands::CurrentWeek => render(&self.service.current_week(), self.format),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_research_command() {
        let cli = Cli::try_parse_from([
            "league-dashboard",
            "--week",
            "3",
            "research",
            "--sort",
            "team-owned",
            "--free-agents",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.week, Some(3));
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Research { sort, free_agents } => {
                assert_eq!(ResearchSort::from(sort), ResearchSort::TeamOwned);
                assert!(free_agents);
            }
            _ => panic!("expected research command"),
        }
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["league-dashboard", "player-week", "4866"]).unwrap();

        assert!(cli.week.is_none());
        assert!(cli.config.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(matches!(
            cli.command,
            Commands::PlayerWeek { ref player_id } if player_id == "4866"
        ));
    }

    #[test]
    fn test_unknown_sort_rejected() {
        assert!(Cli::try_parse_from(["league-dashboard", "research", "--sort", "age"]).is_err());
    }
}
