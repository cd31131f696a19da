//! Challenge domain models: participants, workout records, and goals.
//!
//! These are the persisted shapes the engine reads and the write path
//! mutates. The engine itself never stores anything derived: the snapshot
//! fields on [`Participant`] are outputs, overwritten wholesale on every
//! recalculation.

pub mod calendar;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::progression::Tier;

/// Days in a challenge week (day indexes are 1 through 7).
pub const DAYS_PER_WEEK: u8 = 7;

/// A challenge participant, including the persisted engine snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Stable identity (UUID v4).
    pub id: String,
    /// Display name, unique per challenge.
    pub name: String,
    /// The least-demanding tier a regression may ever return them to.
    /// Defaults to the hardest tier; a head start earns a lower ceiling.
    pub ceiling: Tier,
    /// Weeks strictly before this index are excluded from elimination
    /// accounting. Set by the reactivate admin action, never by the engine.
    pub reactivation_checkpoint: Option<u32>,
    /// Snapshot: tier as of the last recalculation.
    pub tier: Tier,
    /// Snapshot: clean weeks across the whole history.
    pub clean_weeks: u32,
    /// Snapshot: missed weeks across the whole history.
    pub missed_weeks: u32,
    /// Snapshot: clean weeks + completed goals.
    pub total_points: u32,
    /// Snapshot: false once eliminated, until reactivated.
    pub active: bool,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Participant {
    /// Create a new participant starting at `ceiling` with empty counters.
    pub fn new(name: impl Into<String>, ceiling: Tier) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            ceiling,
            reactivation_checkpoint: None,
            tier: ceiling,
            clean_weeks: 0,
            missed_weeks: 0,
            total_points: 0,
            active: true,
            joined_at: now,
            updated_at: now,
        }
    }

    /// The persisted snapshot fields, for diffing against a fresh result.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tier: self.tier,
            clean_weeks: self.clean_weeks,
            missed_weeks: self.missed_weeks,
            total_points: self.total_points,
            active: self.active,
        }
    }
}

/// The five engine outputs persisted per participant.
///
/// Applied as a single whole-record replace so readers never observe a
/// half-updated snapshot (a new tier with stale points).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tier: Tier,
    pub clean_weeks: u32,
    pub missed_weeks: u32,
    pub total_points: u32,
    pub active: bool,
}

/// How a workout was performed. Step-count workouts can be restricted by
/// the counting rules; everything else is standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutKind {
    Standard,
    Steps,
}

impl Default for WorkoutKind {
    fn default() -> Self {
        WorkoutKind::Standard
    }
}

/// One logged workout day for a participant.
///
/// At most one record exists per (participant, week, day); logging the same
/// day again replaces it, which is how the write path toggles a day on and
/// off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub participant_id: String,
    /// 1-based challenge week.
    pub week: u32,
    /// Day within the week, 1 (Monday) through 7 (Sunday).
    pub day: u8,
    #[serde(default)]
    pub kind: WorkoutKind,
    pub completed: bool,
    pub logged_at: DateTime<Utc>,
}

impl WorkoutRecord {
    /// Record a completed standard workout.
    pub fn completed(participant_id: impl Into<String>, week: u32, day: u8) -> Self {
        Self {
            participant_id: participant_id.into(),
            week,
            day,
            kind: WorkoutKind::Standard,
            completed: true,
            logged_at: Utc::now(),
        }
    }

    pub fn with_kind(mut self, kind: WorkoutKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// A personal goal. Only the completed count feeds the engine; everything
/// else is bookkeeping for the participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Stable identity (UUID v4).
    pub id: String,
    pub participant_id: String,
    pub title: String,
    /// Free-text category label ("strength", "mobility", ...).
    pub category: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Goal {
    pub fn new(
        participant_id: impl Into<String>,
        title: impl Into<String>,
        category: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            participant_id: participant_id.into(),
            title: title.into(),
            category,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        }
    }
}

/// Validate a 1-based week index coming in from the write path.
pub fn validate_week(week: i64) -> Result<u32, ValidationError> {
    if week >= 1 {
        Ok(week as u32)
    } else {
        Err(ValidationError::InvalidWeek(week))
    }
}

/// Validate a day index (1-7) coming in from the write path.
pub fn validate_day(day: i64) -> Result<u8, ValidationError> {
    if (1..=i64::from(DAYS_PER_WEEK)).contains(&day) {
        Ok(day as u8)
    } else {
        Err(ValidationError::InvalidDay(day))
    }
}

/// The built-in rulebook shown by `challenge rules`.
pub fn rulebook() -> &'static str {
    indoc::indoc! {"
        Ironweek runs in fixed weeks, day 1 (Monday) through day 7 (Sunday).

        Every participant owes a weekly workout count set by their current
        tier: tiers 3 and 4 owe 4 workouts, tier 5 owes 5. A week is clean
        when the completed workouts that week meet or beat the requirement
        that was active during that week; extra workouts carry no bonus.

        Three clean weeks in a row earn the next easier tier and restart the
        streak. Tier 3 is the summit: it owes the same 4 workouts as tier 4
        but takes longer to fall from. A missed week pushes you one tier
        harder, but never past your ceiling, so a head start is never fully
        lost.

        Elimination happens only on tier 5: miss two weeks during the same
        stay there and you are out. Climbing off tier 5 and being demoted
        back later starts a fresh count. An organizer can reactivate an
        eliminated participant; past misses then stop counting.

        Points are one per clean week plus one per completed goal.
    "}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_participant_starts_at_ceiling_with_empty_counters() {
        let p = Participant::new("Avery", Tier::Four);
        assert_eq!(p.tier, Tier::Four);
        assert_eq!(p.ceiling, Tier::Four);
        assert_eq!(p.clean_weeks, 0);
        assert_eq!(p.missed_weeks, 0);
        assert_eq!(p.total_points, 0);
        assert!(p.active);
        assert!(p.reactivation_checkpoint.is_none());
    }

    #[test]
    fn snapshot_diff_detects_changes() {
        let p = Participant::new("Avery", Tier::Five);
        let mut snapshot = p.snapshot();
        assert_eq!(snapshot, p.snapshot());
        snapshot.total_points = 7;
        assert_ne!(snapshot, p.snapshot());
    }

    #[test]
    fn week_and_day_validation() {
        assert_eq!(validate_week(1).unwrap(), 1);
        assert_eq!(validate_week(12).unwrap(), 12);
        assert!(validate_week(0).is_err());
        assert!(validate_week(-3).is_err());

        assert_eq!(validate_day(1).unwrap(), 1);
        assert_eq!(validate_day(7).unwrap(), 7);
        assert!(validate_day(0).is_err());
        assert!(validate_day(8).is_err());
    }

    #[test]
    fn rulebook_mentions_every_tier() {
        let text = rulebook();
        assert!(text.contains("tier 5"));
        assert!(text.contains("tiers 3 and 4"));
    }
}
