//! Dashboard service: fetches league data and runs it through the engine

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::report::{
    CurrentWeekReport, MatchupBoard, MatchupsReport, PlayerWeekReport, ResearchReport,
    ResearchTable, ScorecardReport, SliceResult, StandingsReport, TopPerformersReport,
};
use league_engine::{
    free_agents, group_matchups, head_to_heads, merge_ownership, rank_and_band, research_rows,
    standings, FantasyCalculator, ResearchSort, ScoringSettings, WeekSchedule,
    TOP_PERFORMER_LIMIT,
};
use player_registry::PlayerRegistry;
use sleeper_fetcher::SleeperFetcher;

/// Everything the dashboard needs to answer a query
pub struct DashboardService {
    fetcher: SleeperFetcher,

    /// Shared read-only player table
    registry: Arc<PlayerRegistry>,

    calculator: FantasyCalculator,

    schedule: WeekSchedule,
}

/// Turn a fetch failure into an unavailable slice, logging why
fn unavailable<T, E: Display>(section: &str, error: E) -> SliceResult<T> {
    warn!("{} unavailable: {}", section, error);
    SliceResult::Unavailable(format!("{section}: {error}"))
}

/// Auxiliary data that only decorates a section degrades to empty
fn or_empty<T: Default, E: Display>(section: &str, result: Result<T, E>) -> T {
    result.unwrap_or_else(|e| {
        warn!("{} unavailable, continuing without it: {}", section, e);
        T::default()
    })
}

/// Load the player table, falling back to an empty one
///
/// A missing dump only costs names and teams in the output.
async fn load_registry(path: &Path) -> PlayerRegistry {
    match PlayerRegistry::load_from_file(path).await {
        Ok(registry) => {
            info!("Loaded {} players from {:?}", registry.len(), path);
            registry
        }
        Err(e) => {
            warn!(
                "Failed to load players from {:?}: {}; continuing with an empty registry",
                path, e
            );
            PlayerRegistry::from_players(Vec::new())
        }
    }
}

impl DashboardService {
    /// Build the service from configuration
    pub async fn new(config: &DashboardConfig) -> Result<Self> {
        info!("Initializing dashboard components...");

        info!("Initializing Sleeper fetcher...");
        let fetcher = SleeperFetcher::new(config.sleeper.clone(), config.cache)
            .context("Failed to create Sleeper fetcher")?;

        info!("Loading player registry...");
        let registry = Arc::new(load_registry(&config.players.file).await);

        let schedule = WeekSchedule::league_default()
            .with_fallback(config.schedule.fallback_week)
            .context("Invalid fallback week")?;

        config.scoring.validate().context("Invalid scoring settings")?;
        let scoring = Arc::new(config.scoring.clone());

        info!("Dashboard ready");
        Ok(Self::from_parts(fetcher, registry, scoring, schedule))
    }

    pub fn from_parts(
        fetcher: SleeperFetcher,
        registry: Arc<PlayerRegistry>,
        scoring: Arc<ScoringSettings>,
        schedule: WeekSchedule,
    ) -> Self {
        Self { fetcher, registry, calculator: FantasyCalculator::new(scoring), schedule }
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn schedule(&self) -> &WeekSchedule {
        &self.schedule
    }

    /// The requested week, or the week containing today
    pub fn resolve_week(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or_else(|| self.schedule.current_week())
    }

    fn date_range(&self, week: u32) -> Option<String> {
        self.schedule.window(week).map(|window| window.date_range_label())
    }

    pub fn current_week(&self) -> CurrentWeekReport {
        self.current_week_at(Utc::now())
    }

    pub fn current_week_at(&self, now: DateTime<Utc>) -> CurrentWeekReport {
        let week = self.schedule.resolve_week(now);
        CurrentWeekReport {
            week,
            date_range: self.date_range(week),
            in_schedule: self.schedule.windows().iter().any(|window| window.contains(now)),
            total_weeks: self.schedule.total_weeks(),
        }
    }

    /// Season standings, most wins first
    pub async fn standings(&self) -> StandingsReport {
        let (league, rosters, users) =
            tokio::join!(self.fetcher.league_info(), self.fetcher.rosters(), self.fetcher.users());

        let league_name = league.ok().map(|league| league.name).filter(|name| !name.is_empty());
        let users = or_empty("users", users);

        let rows = match rosters {
            Ok(rosters) => SliceResult::Ready(standings(&rosters, &users)),
            Err(e) => unavailable("rosters", e),
        };

        StandingsReport { league_name, rows }
    }

    /// Every team's score for the week, ranked and banded around the median
    pub async fn scorecard(&self, week: u32) -> ScorecardReport {
        let (matchups, rosters, users) =
            tokio::join!(self.fetcher.matchups(week), self.fetcher.rosters(), self.fetcher.users());

        let teams = match matchups {
            Ok(matchups) => {
                let rosters = or_empty("rosters", rosters);
                let users = or_empty("users", users);
                debug!("Ranking {} teams for week {}", matchups.len(), week);
                SliceResult::Ready(rank_and_band(&matchups, &rosters, &users))
            }
            Err(e) => unavailable("matchups", e),
        };

        ScorecardReport { week, date_range: self.date_range(week), teams }
    }

    /// Head-to-head pairings for the week plus teams on a bye
    pub async fn matchups(&self, week: u32) -> MatchupsReport {
        let (matchups, rosters, users) =
            tokio::join!(self.fetcher.matchups(week), self.fetcher.rosters(), self.fetcher.users());

        let board = match matchups {
            Ok(matchups) => {
                let rosters = or_empty("rosters", rosters);
                let users = or_empty("users", users);
                let groups = group_matchups(&matchups);
                SliceResult::Ready(MatchupBoard {
                    head_to_heads: head_to_heads(&groups, &rosters, &users),
                    byes: groups.unpaired.iter().map(|record| record.roster_id).collect(),
                })
            }
            Err(e) => unavailable("matchups", e),
        };

        MatchupsReport { week, date_range: self.date_range(week), board }
    }

    /// Ownership research merged with league rosters
    ///
    /// Rosters decide the owned flag, so the table is unavailable without them.
    pub async fn research(
        &self,
        week: u32,
        sort: ResearchSort,
        free_agents_only: bool,
    ) -> ResearchReport {
        let (research, rosters) = tokio::join!(self.fetcher.research(week), self.fetcher.rosters());

        let table = match (research, rosters) {
            (Ok(research), Ok(rosters)) => {
                let outcome = merge_ownership(&research, &rosters, &self.registry);
                let mut rows = research_rows(&outcome, &self.registry, sort);
                if free_agents_only {
                    rows = free_agents(&rows).into_iter().cloned().collect();
                }
                SliceResult::Ready(ResearchTable { rows, missing: outcome.missing })
            }
            (Err(e), _) => unavailable("research", e),
            (_, Err(e)) => unavailable("rosters", e),
        };

        ResearchReport { week, sort, table }
    }

    /// Highest projected fantasy scores for the week
    pub async fn top_performers(&self, week: u32, limit: Option<usize>) -> TopPerformersReport {
        let limit = limit.unwrap_or(TOP_PERFORMER_LIMIT);

        let performers = match self.fetcher.projections(week).await {
            Ok(lines) => {
                SliceResult::Ready(self.calculator.top_performers(&lines, &self.registry, limit))
            }
            Err(e) => unavailable("projections", e),
        };

        TopPerformersReport { week, performers }
    }

    /// One player's games and fantasy totals for the week
    pub async fn player_week(&self, player_id: &str, week: u32) -> PlayerWeekReport {
        self.player_week_at(player_id, week, Utc::now()).await
    }

    /// No stat line for the player is reported as missing data, not a zero week
    pub async fn player_week_at(
        &self,
        player_id: &str,
        week: u32,
        now: DateTime<Utc>,
    ) -> PlayerWeekReport {
        let (lines, schedule) = tokio::join!(
            self.fetcher.player_week_stats(player_id, week),
            self.fetcher.game_schedule()
        );

        let summary = match lines {
            Ok(lines) if lines.iter().all(|line| line.stats.is_none()) => {
                debug!("No stats for player {} in week {}", player_id, week);
                SliceResult::Unavailable(format!(
                    "stats: no stats for player {player_id} in week {week}"
                ))
            }
            Ok(lines) => {
                // Remaining games are informational; no schedule means zero
                let schedule = or_empty("schedule", schedule);
                let games_remaining = self
                    .registry
                    .get(player_id)
                    .map(|player| schedule.remaining_games_in_week(&player.team, week, now).len())
                    .unwrap_or(0);
                let name = self.registry.display_name(player_id);
                SliceResult::Ready(
                    self.calculator.summarize_week(player_id, name, week, &lines, games_remaining),
                )
            }
            Err(e) => unavailable("stats", e),
        };

        PlayerWeekReport { player_id: player_id.to_string(), week, summary }
    }
}
