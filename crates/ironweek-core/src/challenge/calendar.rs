//! Challenge calendar: resolving "now" into a 1-based challenge week.
//!
//! The challenge runs on fixed 7-day weeks counted from a configured start
//! date, interpreted in one fixed reference offset so every participant sees
//! the same week boundary regardless of where they log from. The engine
//! treats the resolved number as an opaque input; only this module knows
//! about dates.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Resolves wall-clock time to challenge week numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeCalendar {
    start_date: NaiveDate,
    utc_offset_hours: i32,
    duration_weeks: u32,
}

impl ChallengeCalendar {
    pub fn new(start_date: NaiveDate, utc_offset_hours: i32, duration_weeks: u32) -> Self {
        Self {
            start_date,
            utc_offset_hours,
            duration_weeks,
        }
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn duration_weeks(&self) -> u32 {
        self.duration_weeks
    }

    /// The challenge week containing `now`, or 0 before the start date.
    ///
    /// Capped at `duration_weeks + 1` so a recalculation run long after the
    /// challenge ended still replays exactly the challenge's weeks.
    pub fn current_week(&self, now: DateTime<Utc>) -> u32 {
        let local_date = (now + Duration::hours(i64::from(self.utc_offset_hours))).date_naive();
        let days = (local_date - self.start_date).num_days();
        if days < 0 {
            return 0;
        }
        let week = (days / 7) as u32 + 1;
        week.min(self.duration_weeks + 1)
    }

    /// Weeks that are strictly over as of `now` (what the engine evaluates).
    pub fn completed_weeks(&self, now: DateTime<Utc>) -> u32 {
        self.current_week(now).saturating_sub(1)
    }

    /// First calendar date of a 1-based challenge week.
    pub fn week_start(&self, week: u32) -> NaiveDate {
        self.start_date + Duration::days(7 * i64::from(week.saturating_sub(1)))
    }
}
