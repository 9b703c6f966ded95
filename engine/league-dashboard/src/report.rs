//! Report types produced by the dashboard and their text/JSON rendering

use anyhow::{Context, Result};
use league_engine::{
    HeadToHead, MatchupMargin, MedianBand, PlayerWeekSummary, ResearchRow, ResearchSort,
    StandingRow, TeamScore, TopPerformer,
};
use serde::Serialize;
use std::fmt::Write;

/// Output of one upstream-backed section
///
/// `Unavailable` means the data could not be fetched. It is never rendered
/// as an empty or zeroed result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum SliceResult<T> {
    Ready(T),
    Unavailable(String),
}

impl<T> SliceResult<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            SliceResult::Ready(value) => Some(value),
            SliceResult::Unavailable(_) => None,
        }
    }
}

/// Output format for rendered reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub trait TextReport {
    fn render_text(&self) -> String;
}

/// Render a report in the requested format
pub fn render<R>(report: &R, format: OutputFormat) -> Result<String>
where
    R: TextReport + Serialize,
{
    match format {
        OutputFormat::Text => Ok(report.render_text()),
        OutputFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report")
        }
    }
}

fn header(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(50));
}

fn unavailable(out: &mut String, reason: &str) {
    let _ = writeln!(out, "Unavailable: {reason}");
}

fn week_title(name: &str, week: u32, date_range: &Option<String>) -> String {
    match date_range {
        Some(range) => format!("{name} - Week {week} ({range})"),
        None => format!("{name} - Week {week}"),
    }
}

fn name_or(owner: &Option<String>, fallback: String) -> String {
    owner.clone().unwrap_or(fallback)
}

#[derive(Debug, Clone, Serialize)]
pub struct StandingsReport {
    pub league_name: Option<String>,
    pub rows: SliceResult<Vec<StandingRow>>,
}

impl TextReport for StandingsReport {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let title = match &self.league_name {
            Some(name) => format!("{name} Standings"),
            None => "League Standings".to_string(),
        };
        header(&mut out, &title);

        match &self.rows {
            SliceResult::Ready(rows) => {
                for (index, row) in rows.iter().enumerate() {
                    let name = row
                        .team_name
                        .clone()
                        .or_else(|| row.owner_name.clone())
                        .unwrap_or_else(|| "Unknown Team".to_string());
                    let streak = row.streak.map(|s| s.to_string()).unwrap_or_default();
                    let _ = writeln!(
                        out,
                        "{:>2}. {:<24} {:>7} {:>6.1}% {:>9.2} PF {:>7.2} PPG {:>4}",
                        index + 1,
                        name,
                        row.record(),
                        row.win_percentage,
                        row.points_for,
                        row.points_per_game,
                        streak
                    );
                }
            }
            SliceResult::Unavailable(reason) => unavailable(&mut out, reason),
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScorecardReport {
    pub week: u32,
    pub date_range: Option<String>,
    pub teams: SliceResult<Vec<TeamScore>>,
}

impl TextReport for ScorecardReport {
    fn render_text(&self) -> String {
        let mut out = String::new();
        header(&mut out, &week_title("Weekly Scorecard", self.week, &self.date_range));

        match &self.teams {
            SliceResult::Ready(teams) if teams.is_empty() => {
                let _ = writeln!(out, "No scores for this week");
            }
            SliceResult::Ready(teams) => {
                for team in teams {
                    let band = match team.band {
                        MedianBand::Above => "above median",
                        MedianBand::At => "median",
                        MedianBand::Below => "below median",
                    };
                    let name = name_or(&team.owner_name, format!("Team {}", team.roster_id));
                    let _ = writeln!(
                        out,
                        "{:>2}. {:<24} {:>8.2}  {}",
                        team.rank, name, team.points, band
                    );
                }
            }
            SliceResult::Unavailable(reason) => unavailable(&mut out, reason),
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchupBoard {
    pub head_to_heads: Vec<HeadToHead>,
    /// Roster ids with no opponent this week
    pub byes: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchupsReport {
    pub week: u32,
    pub date_range: Option<String>,
    pub board: SliceResult<MatchupBoard>,
}

impl TextReport for MatchupsReport {
    fn render_text(&self) -> String {
        let mut out = String::new();
        header(&mut out, &week_title("Matchups", self.week, &self.date_range));

        match &self.board {
            SliceResult::Ready(board) => {
                for matchup in &board.head_to_heads {
                    let sides: Vec<String> = matchup
                        .sides
                        .iter()
                        .map(|side| {
                            let name = name_or(&side.owner_name, "TBD".to_string());
                            format!("{} {:.2}", name, side.points)
                        })
                        .collect();
                    let margin = match matchup.margin {
                        Some(MatchupMargin::Close) => " [close]",
                        Some(MatchupMargin::Blowout) => " [blowout]",
                        Some(MatchupMargin::Standard) | None => "",
                    };
                    let _ = writeln!(
                        out,
                        "#{:<3} {}{}",
                        matchup.matchup_id,
                        sides.join("  vs  "),
                        margin
                    );
                }
                if !board.byes.is_empty() {
                    let byes: Vec<String> = board.byes.iter().map(u32::to_string).collect();
                    let _ = writeln!(out, "Byes: {}", byes.join(", "));
                }
            }
            SliceResult::Unavailable(reason) => unavailable(&mut out, reason),
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResearchTable {
    pub rows: Vec<ResearchRow>,
    /// Research entries dropped because the player is unknown
    pub missing: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResearchReport {
    pub week: u32,
    pub sort: ResearchSort,
    pub table: SliceResult<ResearchTable>,
}

impl TextReport for ResearchReport {
    fn render_text(&self) -> String {
        let mut out = String::new();
        header(&mut out, &format!("Player Research - Week {}", self.week));

        match &self.table {
            SliceResult::Ready(table) => {
                let _ = writeln!(
                    out,
                    "{:<24} {:<4} {:>8} {:>10} {:>8}  {}",
                    "Player", "Team", "Owned %", "Started %", "Ratio", "Status"
                );
                for row in &table.rows {
                    let status = if row.team_owned { "Owned" } else { "Free Agent" };
                    let _ = writeln!(
                        out,
                        "{:<24} {:<4} {:>7.1}% {:>9.1}% {:>8.2}  {}",
                        row.name, row.team, row.owned, row.started, row.ratio, status
                    );
                }
                if table.missing > 0 {
                    let _ = writeln!(out, "({} unknown players omitted)", table.missing);
                }
            }
            SliceResult::Unavailable(reason) => unavailable(&mut out, reason),
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopPerformersReport {
    pub week: u32,
    pub performers: SliceResult<Vec<TopPerformer>>,
}

impl TextReport for TopPerformersReport {
    fn render_text(&self) -> String {
        let mut out = String::new();
        header(&mut out, &format!("Top Performers - Week {}", self.week));

        match &self.performers {
            SliceResult::Ready(performers) => {
                for (index, performer) in performers.iter().enumerate() {
                    let player = &performer.player;
                    let _ = writeln!(
                        out,
                        "{:>2}. {:<24} {:<4} {:<4} {:>7}",
                        index + 1,
                        player.full_name(),
                        player.team,
                        player.position,
                        performer.fantasy_points.to_string()
                    );
                }
            }
            SliceResult::Unavailable(reason) => unavailable(&mut out, reason),
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerWeekReport {
    pub player_id: String,
    pub week: u32,
    pub summary: SliceResult<PlayerWeekSummary>,
}

impl TextReport for PlayerWeekReport {
    fn render_text(&self) -> String {
        let mut out = String::new();

        match &self.summary {
            SliceResult::Ready(summary) => {
                header(&mut out, &format!("{} - Week {}", summary.player_name, self.week));
                for game in &summary.games {
                    let stats = &game.stats;
                    let _ = writeln!(
                        out,
                        "{:<12} {:>3} pts {:>3} reb {:>3} ast {:>2} stl {:>2} blk {:>2} to  {:>7} fp",
                        game.date.as_deref().unwrap_or("-"),
                        stats.points,
                        stats.rebounds,
                        stats.assists,
                        stats.steals,
                        stats.blocks,
                        stats.turnovers,
                        game.fantasy_points.to_string()
                    );
                }
                let _ = writeln!(
                    out,
                    "Total {} | Avg {} | Played {} | Remaining {}",
                    summary.total, summary.average, summary.games_played, summary.games_remaining
                );
            }
            SliceResult::Unavailable(reason) => {
                header(&mut out, &format!("Player {} - Week {}", self.player_id, self.week));
                unavailable(&mut out, reason);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentWeekReport {
    pub week: u32,
    pub date_range: Option<String>,
    /// False when today is outside the schedule and the fallback week is shown
    pub in_schedule: bool,
    pub total_weeks: u32,
}

impl TextReport for CurrentWeekReport {
    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = write!(out, "Week {} of {}", self.week, self.total_weeks);
        if let Some(range) = &self.date_range {
            let _ = write!(out, " ({range})");
        }
        if !self.in_schedule {
            let _ = write!(out, " [outside schedule, showing fallback week]");
        }
        out.push('\n');
        out
    }
}
