//! League Engine
//!
//! Pure scoring and weekly aggregation core for the league dashboard. Turns
//! box scores into fantasy points, resolves league weeks, ranks weekly scores
//! against the median and merges league ownership into research data.
//!
//! Nothing here performs I/O; callers hand in already-fetched payloads.

pub mod aggregation;
pub mod calculator;
pub mod config;
pub mod error;
pub mod games;
pub mod models;
pub mod research;
pub mod roster;
pub mod schedule;

pub use aggregation::{
    classify_margin, group_matchups, head_to_heads, rank_and_band, standings, HeadToHead,
    MatchupGroups, MatchupMargin, MedianBand, StandingRow, TeamScore,
};
pub use calculator::{
    calculate_special_bonuses, score_game, FantasyCalculator, GameLine, PlayerWeekSummary,
    ScoreBreakdown, TopPerformer, TOP_PERFORMER_LIMIT,
};
pub use config::{BonusKind, BonusRule, ScoringSettings};
pub use error::{EngineError, Result, ScheduleError};
pub use games::{team_name, GameSchedule, GameStatus, ScheduledGame};
pub use models::*;
pub use research::{
    free_agents, merge_ownership, ownership_ratio, research_rows, MergeOutcome, OwnershipEntry,
    ResearchRow, ResearchSort, ResearchStat,
};
pub use roster::{
    fantasy_points_per_game, parse_streak, player_nickname, roster_lock_info, win_percentage,
    RosterLockInfo, Streak, StreakKind,
};
pub use schedule::{resolve_week, WeekSchedule, WeekWindow, DEFAULT_FALLBACK_WEEK};
