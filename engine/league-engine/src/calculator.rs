use crate::config::{BonusKind, ScoringSettings, DOUBLE_DIGIT_THRESHOLD};
use crate::models::{BoxScoreStats, FantasyPoints, PlayerStatLine};
use player_registry::{Player, PlayerRegistry};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// How many players the top performers board shows
pub const TOP_PERFORMER_LIMIT: usize = 20;

/// Points awarded by each part of the scoring formula, before rounding
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub base: Decimal,
    pub shot_penalty: Decimal,
    pub bonus: Decimal,
    pub bonus_kind: Option<BonusKind>,
    pub total: FantasyPoints,
}

/// One game (or one week's aggregate line) with its fantasy value
#[derive(Debug, Clone, Serialize)]
pub struct GameLine {
    pub date: Option<String>,
    pub stats: BoxScoreStats,
    pub fantasy_points: FantasyPoints,
}

/// A player's fantasy production across one league week
#[derive(Debug, Clone, Serialize)]
pub struct PlayerWeekSummary {
    pub player_id: String,
    pub player_name: String,
    pub week: u32,
    pub games: Vec<GameLine>,
    pub total: FantasyPoints,
    pub average: FantasyPoints,
    pub games_played: usize,
    pub games_remaining: usize,
}

/// A player and the fantasy points their projection is worth
#[derive(Debug, Clone, Serialize)]
pub struct TopPerformer {
    pub player: Player,
    pub fantasy_points: FantasyPoints,
}

/// Counts become decimals; negative or non-finite counts score as zero
fn stat(value: f64) -> Decimal {
    if value.is_finite() && value > 0.0 {
        Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
    } else {
        Decimal::ZERO
    }
}

/// Number of tracked categories at or above ten
fn double_digit_categories(stats: &BoxScoreStats) -> usize {
    [stats.points, stats.rebounds, stats.assists, stats.blocks, stats.steals]
        .iter()
        .filter(|value| **value >= DOUBLE_DIGIT_THRESHOLD)
        .count()
}

/// Bonus for double-digit categories
///
/// Rules are checked highest threshold first and the first match wins, so the
/// triple-double and double-double bonuses are never summed.
pub fn calculate_special_bonuses(
    stats: &BoxScoreStats,
    settings: &ScoringSettings,
) -> (Decimal, Option<BonusKind>) {
    let count = double_digit_categories(stats);

    settings
        .bonus_rules()
        .iter()
        .find(|rule| count >= rule.min_categories)
        .map(|rule| (rule.bonus, Some(rule.kind)))
        .unwrap_or((Decimal::ZERO, None))
}

/// Score one game, keeping each component of the formula
pub fn score_breakdown(stats: &BoxScoreStats, settings: &ScoringSettings) -> ScoreBreakdown {
    let base = stat(stats.points) * settings.points
        + stat(stats.rebounds) * settings.rebounds
        + stat(stats.assists) * settings.assists
        + stat(stats.steals) * settings.steals
        + stat(stats.blocks) * settings.blocks
        + stat(stats.turnovers) * settings.turnovers
        + stat(stats.three_pointers_made) * settings.three_point_made;

    // Made above attempted is a malformed row; it never earns points
    let missed_field_goals =
        (stat(stats.field_goals_attempted) - stat(stats.field_goals_made)).max(Decimal::ZERO);
    let missed_free_throws =
        (stat(stats.free_throws_attempted) - stat(stats.free_throws_made)).max(Decimal::ZERO);
    let shot_penalty = missed_field_goals * settings.missed_field_goal
        + missed_free_throws * settings.missed_free_throw;

    let (bonus, bonus_kind) = calculate_special_bonuses(stats, settings);
    let total = FantasyPoints::from_decimal(base + shot_penalty + bonus);

    debug!(
        "Scored game: base {} penalty {} bonus {} ({:?}) total {}",
        base, shot_penalty, bonus, bonus_kind, total
    );

    ScoreBreakdown { base, shot_penalty, bonus, bonus_kind, total }
}

/// Fantasy points for one player-game, rounded to two places
pub fn score_game(stats: &BoxScoreStats, settings: &ScoringSettings) -> FantasyPoints {
    score_breakdown(stats, settings).total
}

/// Fantasy point calculator bound to one immutable ruleset
#[derive(Debug, Clone)]
pub struct FantasyCalculator {
    settings: Arc<ScoringSettings>,
}

impl FantasyCalculator {
    /// Create a calculator sharing the given ruleset
    pub fn new(settings: Arc<ScoringSettings>) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ScoringSettings {
        &self.settings
    }

    pub fn score(&self, stats: &BoxScoreStats) -> FantasyPoints {
        score_game(stats, &self.settings)
    }

    pub fn breakdown(&self, stats: &BoxScoreStats) -> ScoreBreakdown {
        score_breakdown(stats, &self.settings)
    }

    /// Summarize a player's week from their game lines
    ///
    /// Lines without a stats block are skipped. The average is zero when no
    /// game was played.
    pub fn summarize_week(
        &self,
        player_id: &str,
        player_name: String,
        week: u32,
        lines: &[PlayerStatLine],
        games_remaining: usize,
    ) -> PlayerWeekSummary {
        let games: Vec<GameLine> = lines
            .iter()
            .filter_map(|line| {
                let stats = BoxScoreStats::from(line.stats.as_ref()?);
                Some(GameLine {
                    date: line.date.clone(),
                    stats,
                    fantasy_points: self.score(&stats),
                })
            })
            .collect();

        let total: Decimal = games.iter().map(|game| game.fantasy_points.value()).sum();
        let games_played = games.len();
        let average = if games_played > 0 {
            total / Decimal::from(games_played)
        } else {
            Decimal::ZERO
        };

        PlayerWeekSummary {
            player_id: player_id.to_string(),
            player_name,
            week,
            games,
            total: FantasyPoints::from_decimal(total),
            average: FantasyPoints::from_decimal(average),
            games_played,
            games_remaining,
        }
    }

    /// Rank projected lines by fantasy value
    ///
    /// Lines for unknown players, lines without stats, and repeated player IDs
    /// are skipped; only positive scores are kept.
    pub fn top_performers(
        &self,
        lines: &[PlayerStatLine],
        registry: &PlayerRegistry,
        limit: usize,
    ) -> Vec<TopPerformer> {
        let mut processed: HashSet<&str> = HashSet::new();
        let mut performers = Vec::new();

        for line in lines {
            let Some(player) = registry.get(&line.player_id) else {
                continue;
            };
            let Some(raw) = line.stats.as_ref() else {
                debug!("Skipping player {} without stats", line.player_id);
                continue;
            };
            if !processed.insert(line.player_id.as_str()) {
                debug!("Skipping duplicate projection for player {}", line.player_id);
                continue;
            }

            let fantasy_points = self.score(&BoxScoreStats::from(raw));
            if fantasy_points.is_positive() {
                performers.push(TopPerformer { player: player.clone(), fantasy_points });
            }
        }

        performers.sort_by(|a, b| b.fantasy_points.cmp(&a.fantasy_points));
        performers.truncate(limit);

        debug!("Ranked {} top performers", performers.len());
        performers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawStatLine;

    fn settings() -> ScoringSettings {
        ScoringSettings::default()
    }

    fn sample_stats() -> BoxScoreStats {
        BoxScoreStats {
            points: 25.0,
            rebounds: 11.0,
            assists: 3.0,
            steals: 1.0,
            blocks: 0.0,
            turnovers: 2.0,
            field_goals_made: 10.0,
            field_goals_attempted: 20.0,
            free_throws_made: 4.0,
            free_throws_attempted: 5.0,
            three_pointers_made: 2.0,
        }
    }

    #[test]
    fn test_zero_stats_score_zero() {
        let total = score_game(&BoxScoreStats::default(), &settings());
        assert_eq!(total, FantasyPoints::ZERO);
        assert_eq!(total.to_string(), "0.00");
    }

    #[test]
    fn test_reference_stat_line() {
        let breakdown = score_breakdown(&sample_stats(), &settings());

        assert_eq!(breakdown.base, Decimal::new(435, 1));
        assert_eq!(breakdown.shot_penalty, Decimal::new(-55, 1));
        assert_eq!(breakdown.bonus, Decimal::from(3));
        assert_eq!(breakdown.bonus_kind, Some(BonusKind::DoubleDouble));
        assert_eq!(breakdown.total.to_string(), "41.00");
    }

    #[test]
    fn test_double_double_counted_once() {
        let stats = BoxScoreStats { points: 10.0, rebounds: 10.0, ..Default::default() };
        let (bonus, kind) = calculate_special_bonuses(&stats, &settings());

        assert_eq!(bonus, Decimal::from(3));
        assert_eq!(kind, Some(BonusKind::DoubleDouble));
        // 10 + 10 + 3
        assert_eq!(score_game(&stats, &settings()).value(), Decimal::from(23));
    }

    #[test]
    fn test_triple_double_replaces_double_double() {
        let stats = BoxScoreStats {
            points: 12.0,
            rebounds: 10.0,
            assists: 10.0,
            ..Default::default()
        };
        let (bonus, kind) = calculate_special_bonuses(&stats, &settings());

        assert_eq!(bonus, Decimal::from(7));
        assert_eq!(kind, Some(BonusKind::TripleDouble));

        let quadruple = BoxScoreStats { steals: 10.0, ..stats };
        assert_eq!(calculate_special_bonuses(&quadruple, &settings()).0, Decimal::from(7));
    }

    #[test]
    fn test_turnovers_and_threes_do_not_count_toward_bonus() {
        let stats = BoxScoreStats {
            points: 30.0,
            turnovers: 10.0,
            three_pointers_made: 10.0,
            ..Default::default()
        };
        assert_eq!(calculate_special_bonuses(&stats, &settings()), (Decimal::ZERO, None));
    }

    #[test]
    fn test_custom_bonus_weights() {
        let custom = ScoringSettings {
            double_double: Decimal::from(5),
            triple_double: Decimal::from(12),
            ..Default::default()
        };
        let stats = BoxScoreStats { points: 10.0, assists: 10.0, ..Default::default() };
        assert_eq!(calculate_special_bonuses(&stats, &custom).0, Decimal::from(5));
    }

    #[test]
    fn test_fractional_projection_rounds() {
        // 12.125 is exact in binary, so the midpoint is a true midpoint
        let stats = BoxScoreStats { points: 12.125, ..Default::default() };
        assert_eq!(score_game(&stats, &settings()).to_string(), "12.13");
    }

    #[test]
    fn test_malformed_counts_do_not_panic() {
        let stats = BoxScoreStats {
            points: f64::NAN,
            field_goals_made: 8.0,
            field_goals_attempted: 5.0,
            turnovers: -3.0,
            ..Default::default()
        };
        assert_eq!(score_game(&stats, &settings()), FantasyPoints::ZERO);
    }

    #[test]
    fn test_made_above_attempted_has_no_shot_penalty() {
        // Inconsistent feed rows never turn missed shots into a bonus
        let stats = BoxScoreStats {
            points: 10.0,
            field_goals_made: 6.0,
            field_goals_attempted: 4.0,
            free_throws_made: 3.0,
            free_throws_attempted: 1.0,
            ..Default::default()
        };
        let breakdown = score_breakdown(&stats, &settings());
        assert_eq!(breakdown.shot_penalty, Decimal::ZERO);
        assert_eq!(breakdown.total.to_string(), "10.00");

        // Only the inconsistent category is clamped
        let stats = BoxScoreStats { free_throws_attempted: 5.0, ..stats };
        assert_eq!(score_breakdown(&stats, &settings()).total.to_string(), "9.00");
    }

    fn line(player_id: &str, pts: Option<f64>) -> PlayerStatLine {
        PlayerStatLine {
            player_id: player_id.to_string(),
            date: Some("2023-11-14".to_string()),
            stats: pts.map(|pts| RawStatLine { pts: Some(pts), ..Default::default() }),
        }
    }

    #[test]
    fn test_summarize_week() {
        let calculator = FantasyCalculator::new(Arc::new(settings()));
        let lines = vec![line("1", Some(20.0)), line("1", None), line("1", Some(15.0))];

        let summary = calculator.summarize_week("1", "Test Player".to_string(), 4, &lines, 2);

        assert_eq!(summary.games_played, 2);
        assert_eq!(summary.total.value(), Decimal::from(35));
        assert_eq!(summary.average.to_string(), "17.50");
        assert_eq!(summary.games_remaining, 2);
    }

    #[test]
    fn test_summarize_empty_week_averages_zero() {
        let calculator = FantasyCalculator::new(Arc::new(settings()));
        let summary = calculator.summarize_week("1", "Test Player".to_string(), 4, &[], 0);

        assert_eq!(summary.games_played, 0);
        assert_eq!(summary.average, FantasyPoints::ZERO);
    }

    #[test]
    fn test_top_performers() {
        let registry = PlayerRegistry::from_json_str(
            r#"{
                "1": { "first_name": "A", "last_name": "One", "team": "BOS" },
                "2": { "first_name": "B", "last_name": "Two", "team": "LAL" },
                "3": { "first_name": "C", "last_name": "Three", "team": "MIA" },
                "4": { "first_name": "D", "last_name": "Four", "team": "NYK" }
            }"#,
        )
        .unwrap();
        let calculator = FantasyCalculator::new(Arc::new(settings()));
        let lines = vec![
            line("1", Some(12.0)),
            line("2", Some(30.0)),
            line("2", Some(5.0)),   // duplicate
            line("3", Some(0.0)),   // not positive
            line("4", None),        // no stats
            line("99", Some(50.0)), // unknown player
        ];

        let top = calculator.top_performers(&lines, &registry, TOP_PERFORMER_LIMIT);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].player.player_id, "2");
        assert_eq!(top[0].fantasy_points.value(), Decimal::from(30));
        assert_eq!(top[1].player.player_id, "1");

        assert_eq!(calculator.top_performers(&lines, &registry, 1).len(), 1);
    }
}
