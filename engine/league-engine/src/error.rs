//! Error types for the league engine

use thiserror::Error;

/// Errors raised while building a week schedule
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Week schedule has no windows")]
    EmptyTable,

    #[error("Week number must start at 1, got {week}")]
    InvalidWeekNumber { week: u32 },

    #[error("Week {week} ends before it starts")]
    InvertedWindow { week: u32 },

    #[error("Week {week} overlaps or precedes the previous window")]
    OverlappingWindow { week: u32 },

    #[error("Fallback week must be at least 1, got {week}")]
    InvalidFallback { week: u32 },
}

/// Errors that can occur in the league engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Schedule error: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
