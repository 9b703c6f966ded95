//! NBA season game schedule, indexed by league week and by team

use crate::schedule::WeekWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

const NBA_TEAMS: [(&str, &str); 30] = [
    ("ATL", "Atlanta Hawks"),
    ("BOS", "Boston Celtics"),
    ("BKN", "Brooklyn Nets"),
    ("CHA", "Charlotte Hornets"),
    ("CHI", "Chicago Bulls"),
    ("CLE", "Cleveland Cavaliers"),
    ("DAL", "Dallas Mavericks"),
    ("DEN", "Denver Nuggets"),
    ("DET", "Detroit Pistons"),
    ("GSW", "Golden State Warriors"),
    ("HOU", "Houston Rockets"),
    ("IND", "Indiana Pacers"),
    ("LAC", "Los Angeles Clippers"),
    ("LAL", "Los Angeles Lakers"),
    ("MEM", "Memphis Grizzlies"),
    ("MIA", "Miami Heat"),
    ("MIL", "Milwaukee Bucks"),
    ("MIN", "Minnesota Timberwolves"),
    ("NOP", "New Orleans Pelicans"),
    ("NYK", "New York Knicks"),
    ("OKC", "Oklahoma City Thunder"),
    ("ORL", "Orlando Magic"),
    ("PHI", "Philadelphia 76ers"),
    ("PHX", "Phoenix Suns"),
    ("POR", "Portland Trail Blazers"),
    ("SAC", "Sacramento Kings"),
    ("SAS", "San Antonio Spurs"),
    ("TOR", "Toronto Raptors"),
    ("UTA", "Utah Jazz"),
    ("WAS", "Washington Wizards"),
];

/// Full team name for an NBA team code, or the code itself when unknown
pub fn team_name(team: &str) -> &str {
    NBA_TEAMS
        .iter()
        .find(|(code, _)| *code == team)
        .map(|(_, name)| *name)
        .unwrap_or(team)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    #[default]
    Upcoming,
    InProgress,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub game_id: String,
    pub start_time: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    pub week: u32,
    pub status: GameStatus,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
}

impl ScheduledGame {
    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }
}

/// Season schedule grouped by league week and by team
#[derive(Debug, Clone, Default)]
pub struct GameSchedule {
    /// Games per week, each list sorted by start time
    weeks: BTreeMap<u32, Vec<ScheduledGame>>,
    /// Team code -> week -> that team's games
    teams: HashMap<String, BTreeMap<u32, Vec<ScheduledGame>>>,
}

impl GameSchedule {
    pub fn new<I>(games: I) -> Self
    where
        I: IntoIterator<Item = ScheduledGame>,
    {
        let mut weeks: BTreeMap<u32, Vec<ScheduledGame>> = BTreeMap::new();
        let mut teams: HashMap<String, BTreeMap<u32, Vec<ScheduledGame>>> = HashMap::new();

        for game in games {
            for team in [&game.home_team, &game.away_team] {
                teams
                    .entry(team.clone())
                    .or_default()
                    .entry(game.week)
                    .or_default()
                    .push(game.clone());
            }
            weeks.entry(game.week).or_default().push(game);
        }

        for games in weeks.values_mut() {
            games.sort_by_key(|game| game.start_time);
        }
        for games in teams.values_mut().flat_map(|by_week| by_week.values_mut()) {
            games.sort_by_key(|game| game.start_time);
        }

        Self { weeks, teams }
    }

    pub fn games_in_week(&self, week: u32) -> &[ScheduledGame] {
        self.weeks.get(&week).map(Vec::as_slice).unwrap_or(&[])
    }

    /// One window per scheduled week, spanning its first to last tip-off
    pub fn week_windows(&self) -> Vec<WeekWindow> {
        self.weeks
            .iter()
            .filter_map(|(week, games)| {
                let first = games.first()?;
                let last = games.last()?;
                Some(WeekWindow { week: *week, start: first.start_time, end: last.start_time })
            })
            .collect()
    }

    pub fn team_games_in_week(&self, team: &str, week: u32) -> &[ScheduledGame] {
        self.teams
            .get(team)
            .and_then(|by_week| by_week.get(&week))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Team games in a week that tip off after `now`
    pub fn remaining_games_in_week(
        &self,
        team: &str,
        week: u32,
        now: DateTime<Utc>,
    ) -> Vec<&ScheduledGame> {
        self.team_games_in_week(team, week).iter().filter(|game| game.start_time > now).collect()
    }

    pub fn completed_games_in_week(&self, team: &str, week: u32) -> Vec<&ScheduledGame> {
        self.team_games_in_week(team, week)
            .iter()
            .filter(|game| game.status == GameStatus::Complete)
            .collect()
    }

    /// Total games on a team's season schedule
    pub fn total_games(&self, team: &str) -> usize {
        self.teams.get(team).map(|by_week| by_week.values().map(Vec::len).sum()).unwrap_or(0)
    }

    pub fn weeks(&self) -> impl Iterator<Item = u32> + '_ {
        self.weeks.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn game(
        id: &str,
        day: u32,
        home: &str,
        away: &str,
        week: u32,
        status: GameStatus,
    ) -> ScheduledGame {
        ScheduledGame {
            game_id: id.to_string(),
            start_time: Utc.with_ymd_and_hms(2023, 11, day, 0, 30, 0).unwrap(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            week,
            status,
            home_score: None,
            away_score: None,
        }
    }

    fn sample_schedule() -> GameSchedule {
        GameSchedule::new(vec![
            game("g3", 9, "DEN", "LAL", 3, GameStatus::Upcoming),
            game("g1", 7, "DEN", "BOS", 3, GameStatus::Complete),
            game("g2", 8, "LAL", "MIA", 3, GameStatus::InProgress),
            game("g4", 15, "BOS", "DEN", 4, GameStatus::Upcoming),
        ])
    }

    #[test]
    fn test_team_names() {
        assert_eq!(team_name("DEN"), "Denver Nuggets");
        assert_eq!(team_name("WAS"), "Washington Wizards");
        assert_eq!(team_name("XYZ"), "XYZ");
    }

    #[test]
    fn test_games_grouped_and_sorted_by_week() {
        let schedule = sample_schedule();

        let ids: Vec<_> = schedule.games_in_week(3).iter().map(|g| g.game_id.as_str()).collect();
        assert_eq!(ids, vec!["g1", "g2", "g3"]);
        assert!(schedule.games_in_week(9).is_empty());
        assert_eq!(schedule.weeks().collect::<Vec<_>>(), vec![3, 4]);
    }

    #[test]
    fn test_week_windows_span_first_to_last_game() {
        let windows = sample_schedule().week_windows();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].week, 3);
        assert_eq!(windows[0].start, Utc.with_ymd_and_hms(2023, 11, 7, 0, 30, 0).unwrap());
        assert_eq!(windows[0].end, Utc.with_ymd_and_hms(2023, 11, 9, 0, 30, 0).unwrap());
    }

    #[test]
    fn test_team_queries() {
        let schedule = sample_schedule();

        assert_eq!(schedule.team_games_in_week("DEN", 3).len(), 2);
        assert_eq!(schedule.total_games("DEN"), 3);
        assert_eq!(schedule.total_games("NYK"), 0);

        let now = Utc.with_ymd_and_hms(2023, 11, 8, 12, 0, 0).unwrap();
        let remaining = schedule.remaining_games_in_week("DEN", 3, now);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].game_id, "g3");

        let completed = schedule.completed_games_in_week("DEN", 3);
        assert_eq!(completed.len(), 1);
        assert!(completed[0].involves("BOS"));
    }
}
