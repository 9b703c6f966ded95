//! Week schedule resolution
//!
//! Maps an instant to the league week that contains it. Every caller works
//! with the one canonical [`WeekWindow`] type.

use crate::error::ScheduleError;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Week used when the league's current week cannot be determined
pub const DEFAULT_FALLBACK_WEEK: u32 = 6;

/// A league week: inclusive [start, end]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekWindow {
    pub week: u32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WeekWindow {
    /// Window from the first instant of `start` through the last millisecond of `end`
    pub fn from_dates(week: u32, start: NaiveDate, end: NaiveDate) -> Self {
        let start = Utc.from_utc_datetime(&start.and_time(chrono::NaiveTime::MIN));
        let end = Utc.from_utc_datetime(&end.and_time(chrono::NaiveTime::MIN))
            + Duration::days(1)
            - Duration::milliseconds(1);
        Self { week, start, end }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// Short label such as "Oct 24 - Oct 30"
    pub fn date_range_label(&self) -> String {
        format!("{} - {}", self.start.format("%b %-d"), self.end.format("%b %-d"))
    }
}

/// Week of the first window containing `instant`, or `fallback_week`
///
/// Windows are checked in table order. Total: any instant outside the table
/// (before the season, after it, or in a gap) resolves to the fallback.
pub fn resolve_week(instant: DateTime<Utc>, table: &[WeekWindow], fallback_week: u32) -> u32 {
    match table.iter().find(|window| window.contains(instant)) {
        Some(window) => window.week,
        None => {
            debug!("No week window contains {}, using fallback week {}", instant, fallback_week);
            fallback_week
        }
    }
}

/// Validated week table plus its fallback week
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekSchedule {
    windows: Vec<WeekWindow>,
    fallback_week: u32,
}

impl WeekSchedule {
    /// Build a schedule, checking the table is ordered and non-overlapping
    pub fn new(windows: Vec<WeekWindow>, fallback_week: u32) -> Result<Self, ScheduleError> {
        if windows.is_empty() {
            return Err(ScheduleError::EmptyTable);
        }
        if fallback_week == 0 {
            return Err(ScheduleError::InvalidFallback { week: fallback_week });
        }

        for (index, window) in windows.iter().enumerate() {
            if window.week == 0 {
                return Err(ScheduleError::InvalidWeekNumber { week: window.week });
            }
            if window.end < window.start {
                return Err(ScheduleError::InvertedWindow { week: window.week });
            }
            if index > 0 && window.start <= windows[index - 1].end {
                return Err(ScheduleError::OverlappingWindow { week: window.week });
            }
        }

        Ok(Self { windows, fallback_week })
    }

    /// Build a schedule from (week, first day, last day) triples
    pub fn from_date_ranges(
        ranges: &[(u32, NaiveDate, NaiveDate)],
        fallback_week: u32,
    ) -> Result<Self, ScheduleError> {
        let windows = ranges
            .iter()
            .map(|(week, start, end)| WeekWindow::from_dates(*week, *start, *end))
            .collect();
        Self::new(windows, fallback_week)
    }

    /// The league's 2023-24 schedule: Tuesday-to-Monday weeks from Oct 24
    pub fn league_default() -> Self {
        let season_start = NaiveDate::from_ymd_opt(2023, 10, 24).unwrap_or_default();
        let windows = (0..8u32)
            .map(|offset| {
                let start = season_start + Duration::weeks(offset as i64);
                WeekWindow::from_dates(offset + 1, start, start + Duration::days(6))
            })
            .collect();

        Self { windows, fallback_week: DEFAULT_FALLBACK_WEEK }
    }

    /// Replace the fallback week
    pub fn with_fallback(mut self, fallback_week: u32) -> Result<Self, ScheduleError> {
        if fallback_week == 0 {
            return Err(ScheduleError::InvalidFallback { week: fallback_week });
        }
        self.fallback_week = fallback_week;
        Ok(self)
    }

    pub fn resolve_week(&self, instant: DateTime<Utc>) -> u32 {
        resolve_week(instant, &self.windows, self.fallback_week)
    }

    pub fn current_week(&self) -> u32 {
        self.resolve_week(Utc::now())
    }

    pub fn window(&self, week: u32) -> Option<&WeekWindow> {
        self.windows.iter().find(|window| window.week == week)
    }

    pub fn windows(&self) -> &[WeekWindow] {
        &self.windows
    }

    pub fn fallback_week(&self) -> u32 {
        self.fallback_week
    }

    pub fn total_weeks(&self) -> u32 {
        self.windows.len() as u32
    }

    /// Previous week, clamped to week 1
    pub fn previous_week(&self, week: u32) -> u32 {
        week.saturating_sub(1).max(1)
    }

    /// Next week, clamped to the last week in the table
    pub fn next_week(&self, week: u32) -> u32 {
        (week + 1).min(self.total_weeks()).max(1)
    }
}

impl Default for WeekSchedule {
    fn default() -> Self {
        Self::league_default()
    }
}
