//! Per-roster analytics: lineup lock state, nicknames, per-game scoring,
//! win rate and streaks.

use crate::models::Roster;
use serde::Serialize;

/// Starting lineup size in this league
pub const STARTER_SLOTS: usize = 6;

/// Maximum players on a roster
pub const MAX_ROSTER_SPOTS: usize = 10;

/// Which players are locked into which roster positions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterLockInfo {
    pub roster_id: u32,
    pub owner_id: String,
    pub total_players: usize,
    pub active_players: Vec<String>,
    pub reserve_players: Vec<String>,
    pub bench_players: Vec<String>,
    pub has_full_lineup: bool,
    pub has_open_slots: bool,
    pub has_ir_player: bool,
}

pub fn roster_lock_info(roster: &Roster) -> RosterLockInfo {
    let active_players = roster.starters.clone();
    let reserve_players = roster.reserve.clone().unwrap_or_default();

    let bench_players = roster
        .players
        .iter()
        .filter(|id| !active_players.contains(*id) && !reserve_players.contains(*id))
        .cloned()
        .collect();

    RosterLockInfo {
        roster_id: roster.roster_id,
        owner_id: roster.owner_id.clone(),
        total_players: roster.players.len(),
        has_full_lineup: active_players.len() == STARTER_SLOTS,
        has_open_slots: roster.players.len() < MAX_ROSTER_SPOTS,
        has_ir_player: !reserve_players.is_empty(),
        active_players,
        reserve_players,
        bench_players,
    }
}

/// Owner-assigned nickname, stored under `p_nick_<player_id>`
pub fn player_nickname<'a>(roster: &'a Roster, player_id: &str) -> Option<&'a str> {
    roster.metadata_str(&format!("p_nick_{player_id}"))
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Season points for divided by games played, to two places
pub fn fantasy_points_per_game(roster: &Roster) -> f64 {
    let games = roster.settings.games_played();
    if games == 0 {
        return 0.0;
    }
    round_to(roster.settings.points_for() / games as f64, 2)
}

/// Wins as a percentage of games played, to one place
pub fn win_percentage(roster: &Roster) -> f64 {
    let games = roster.settings.games_played();
    if games == 0 {
        return 0.0;
    }
    round_to(roster.settings.wins as f64 / games as f64 * 100.0, 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StreakKind {
    Win,
    Loss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub count: u32,
    pub kind: StreakKind,
}

impl std::fmt::Display for Streak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suffix = match self.kind {
            StreakKind::Win => 'W',
            StreakKind::Loss => 'L',
        };
        write!(f, "{}{}", self.count, suffix)
    }
}

/// Parse the `streak` metadata value, e.g. "3W" or "2L"
pub fn parse_streak(roster: &Roster) -> Option<Streak> {
    let raw = roster.metadata_str("streak")?.trim();

    let digits_end = raw.find(|c: char| !c.is_ascii_digit())?;
    let count = raw[..digits_end].parse().ok()?;
    let kind = match &raw[digits_end..] {
        "W" => StreakKind::Win,
        "L" => StreakKind::Loss,
        _ => return None,
    };

    Some(Streak { count, kind })
}
