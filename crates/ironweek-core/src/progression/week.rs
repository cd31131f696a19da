//! Week evaluation: counting completed workouts against a requirement.
//!
//! A week is clean when the workouts completed in it meet or beat the
//! requirement the caller supplies. Meeting the bar exactly and blowing past
//! it are the same clean week; extra workouts earn nothing.

use serde::{Deserialize, Serialize};

use crate::challenge::{WorkoutKind, WorkoutRecord};
use crate::progression::Tier;

/// Derived outcome of one completed week. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekStatus {
    /// 1-based week index.
    pub week: u32,
    /// Requirement that was active during the week.
    pub required: u32,
    /// Completed workouts counted under the rules.
    pub completed: u32,
    /// `completed >= required`.
    pub clean: bool,
}

/// Optional restrictions on what counts as a completed workout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountingRules {
    /// When set, step workouts count at most once per week and only while
    /// the simulated tier for that week is the hardest.
    #[serde(default)]
    pub steps_count_once_at_hardest_tier: bool,
}

/// Counts one participant's completed workouts week by week.
///
/// The history slice carries no ordering guarantee; the evaluator matches
/// (participant, week) pairs itself. Requirements are always supplied by the
/// caller, never derived here, because the requirement owed in a week
/// belongs to the tier simulated as active then.
#[derive(Debug, Clone)]
pub struct WeekEvaluator<'a> {
    records: &'a [WorkoutRecord],
    rules: CountingRules,
}

impl<'a> WeekEvaluator<'a> {
    /// Evaluator with default rules (every completed workout counts).
    pub fn new(records: &'a [WorkoutRecord]) -> Self {
        Self {
            records,
            rules: CountingRules::default(),
        }
    }

    pub fn with_rules(records: &'a [WorkoutRecord], rules: CountingRules) -> Self {
        Self { records, rules }
    }

    /// Completed workouts for (participant, week) under the counting rules.
    ///
    /// `tier` is the tier simulated as active during the week; it only
    /// matters when the step-workout restriction is enabled.
    pub fn completed_in_week(&self, participant_id: &str, week: u32, tier: Tier) -> u32 {
        let mut standard = 0u32;
        let mut steps = 0u32;
        for record in self.records {
            if !record.completed || record.week != week || record.participant_id != participant_id
            {
                continue;
            }
            match record.kind {
                WorkoutKind::Standard => standard += 1,
                WorkoutKind::Steps => steps += 1,
            }
        }
        if self.rules.steps_count_once_at_hardest_tier {
            if tier.is_hardest() {
                standard + steps.min(1)
            } else {
                standard
            }
        } else {
            standard + steps
        }
    }

    /// Evaluate one week against a supplied requirement.
    pub fn evaluate(&self, participant_id: &str, week: u32, required: u32, tier: Tier) -> WeekStatus {
        let completed = self.completed_in_week(participant_id, week, tier);
        WeekStatus {
            week,
            required,
            completed,
            clean: completed >= required,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pid: &str, week: u32, day: u8, completed: bool) -> WorkoutRecord {
        WorkoutRecord::completed(pid, week, day).with_completed(completed)
    }

    #[test]
    fn counts_only_matching_completed_records() {
        let records = vec![
            record("a", 1, 1, true),
            record("a", 1, 2, true),
            record("a", 1, 3, false), // logged then toggled off
            record("a", 2, 1, true),  // different week
            record("b", 1, 4, true),  // different participant
        ];
        let evaluator = WeekEvaluator::new(&records);
        assert_eq!(evaluator.completed_in_week("a", 1, Tier::Five), 2);
    }

    #[test]
    fn empty_history_is_a_zero_count_not_an_error() {
        let records: Vec<WorkoutRecord> = Vec::new();
        let evaluator = WeekEvaluator::new(&records);
        let status = evaluator.evaluate("a", 1, 4, Tier::Five);
        assert_eq!(status.completed, 0);
        assert!(!status.clean);
    }

    #[test]
    fn clean_at_exactly_the_requirement() {
        let records: Vec<WorkoutRecord> =
            (1..=4).map(|day| record("a", 1, day, true)).collect();
        let evaluator = WeekEvaluator::new(&records);
        assert!(evaluator.evaluate("a", 1, 4, Tier::Four).clean);
        assert!(!evaluator.evaluate("a", 1, 5, Tier::Five).clean);
    }

    #[test]
    fn extra_workouts_do_not_change_the_status_shape() {
        let records: Vec<WorkoutRecord> =
            (1..=7).map(|day| record("a", 1, day, true)).collect();
        let evaluator = WeekEvaluator::new(&records);
        let status = evaluator.evaluate("a", 1, 5, Tier::Five);
        assert_eq!(status.completed, 7);
        assert!(status.clean);
    }

    #[test]
    fn step_rule_off_counts_steps_like_anything_else() {
        let records = vec![
            record("a", 1, 1, true),
            record("a", 1, 2, true).with_kind(WorkoutKind::Steps),
            record("a", 1, 3, true).with_kind(WorkoutKind::Steps),
        ];
        let evaluator = WeekEvaluator::new(&records);
        assert_eq!(evaluator.completed_in_week("a", 1, Tier::Four), 3);
    }

    #[test]
    fn step_rule_caps_steps_at_one_on_the_hardest_tier() {
        let records = vec![
            record("a", 1, 1, true),
            record("a", 1, 2, true).with_kind(WorkoutKind::Steps),
            record("a", 1, 3, true).with_kind(WorkoutKind::Steps),
        ];
        let rules = CountingRules {
            steps_count_once_at_hardest_tier: true,
        };
        let evaluator = WeekEvaluator::with_rules(&records, rules);
        assert_eq!(evaluator.completed_in_week("a", 1, Tier::Five), 2);
    }

    #[test]
    fn step_rule_drops_steps_entirely_below_the_hardest_tier() {
        let records = vec![
            record("a", 1, 1, true),
            record("a", 1, 2, true).with_kind(WorkoutKind::Steps),
        ];
        let rules = CountingRules {
            steps_count_once_at_hardest_tier: true,
        };
        let evaluator = WeekEvaluator::with_rules(&records, rules);
        assert_eq!(evaluator.completed_in_week("a", 1, Tier::Four), 1);
    }
}
