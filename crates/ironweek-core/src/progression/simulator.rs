//! Full-history replay that derives a participant's progression state.
//!
//! The replay is the single source of truth: nothing incremental is stored
//! between runs. Every derivation starts from the signup ceiling and folds
//! the completed weeks in ascending order, so editing a workout from three
//! weeks ago simply changes what the next replay produces.
//!
//! Only completed weeks are replayed. With the challenge in week `w`, weeks
//! `1..=w-1` are in scope; the week in progress never counts for or against
//! anyone.

use serde::{Deserialize, Serialize};

use crate::challenge::WorkoutRecord;
use crate::progression::elimination::StintTracker;
use crate::progression::tier::{Tier, TierMachine, TierShift};
use crate::progression::week::{CountingRules, WeekEvaluator, WeekStatus};

/// Everything a replay needs, borrowed from the caller.
#[derive(Debug, Clone)]
pub struct ProgressionContext<'a> {
    /// Participant whose records are being replayed.
    pub participant_id: &'a str,
    /// Signup ceiling; also the starting tier.
    pub ceiling: Tier,
    /// 1-based week the challenge is currently in. Week 0 means the
    /// challenge has not started.
    pub current_week: u32,
    /// Reactivation checkpoint, when an admin has granted one.
    pub checkpoint: Option<u32>,
    /// Workout history. Order does not matter; records outside the completed
    /// range are ignored.
    pub records: &'a [WorkoutRecord],
    /// Counting rules in force for this challenge.
    pub rules: CountingRules,
}

impl<'a> ProgressionContext<'a> {
    pub fn new(
        participant_id: &'a str,
        ceiling: Tier,
        current_week: u32,
        records: &'a [WorkoutRecord],
    ) -> Self {
        Self {
            participant_id,
            ceiling,
            current_week,
            checkpoint: None,
            records,
            rules: CountingRules::default(),
        }
    }

    pub fn with_checkpoint(mut self, checkpoint: Option<u32>) -> Self {
        self.checkpoint = checkpoint;
        self
    }

    pub fn with_rules(mut self, rules: CountingRules) -> Self {
        self.rules = rules;
        self
    }

    /// Number of weeks the replay will consume.
    pub fn completed_weeks(&self) -> u32 {
        self.current_week.saturating_sub(1)
    }
}

/// One completed week as the replay saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekOutcome {
    /// Count and clean/missed call for the week.
    pub status: WeekStatus,
    /// Tier the week was played at. This is what set the requirement.
    pub tier: Tier,
    /// Transition applied after the week was judged.
    pub shift: TierShift,
}

/// Derived progression state after replaying every completed week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Tier the participant sits on now.
    pub tier: Tier,
    pub clean_weeks: u32,
    pub missed_weeks: u32,
    /// Per-week trace, ascending. Empty before any week has completed.
    pub weeks: Vec<WeekOutcome>,
    pub eliminated: bool,
    /// Misses in the current hardest-tier stint.
    pub stint_misses: u32,
}

impl SimulationResult {
    /// Week statuses without the tier trace.
    pub fn statuses(&self) -> impl Iterator<Item = &WeekStatus> {
        self.weeks.iter().map(|outcome| &outcome.status)
    }
}

/// Replays a participant's history week by week.
pub struct ProgressionSimulator;

impl ProgressionSimulator {
    /// Run a full replay for one participant.
    pub fn run(ctx: &ProgressionContext) -> SimulationResult {
        let completed = ctx.completed_weeks();
        let mut machine = TierMachine::new(ctx.ceiling);
        let mut tracker = StintTracker::with_checkpoint(ctx.checkpoint);
        let evaluator = WeekEvaluator::with_rules(ctx.records, ctx.rules);

        let mut weeks = Vec::with_capacity(completed as usize);
        let mut clean_weeks = 0;
        let mut missed_weeks = 0;

        for week in 1..=completed {
            let tier = machine.tier();
            let status =
                evaluator.evaluate(ctx.participant_id, week, tier.required_workouts(), tier);
            if status.clean {
                clean_weeks += 1;
            } else {
                missed_weeks += 1;
            }
            let shift = machine.advance(status.clean);
            tracker.observe(week, tier, status.clean, shift, machine.tier());
            weeks.push(WeekOutcome {
                status,
                tier,
                shift,
            });
        }

        let verdict = tracker.verdict(machine.tier());
        SimulationResult {
            tier: machine.tier(),
            clean_weeks,
            missed_weeks,
            weeks,
            eliminated: verdict.eliminated,
            stint_misses: verdict.stint_misses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One completed standard workout per listed day count, week by week.
    fn week_records(pid: &str, counts: &[u32]) -> Vec<WorkoutRecord> {
        let mut records = Vec::new();
        for (index, count) in counts.iter().enumerate() {
            let week = index as u32 + 1;
            for day in 1..=*count {
                records.push(WorkoutRecord::completed(pid, week, day as u8));
            }
        }
        records
    }

    #[test]
    fn before_the_first_completed_week_nothing_is_derived() {
        let records = week_records("a", &[5]);
        for current_week in [0, 1] {
            let ctx = ProgressionContext::new("a", Tier::Five, current_week, &records);
            let result = ProgressionSimulator::run(&ctx);
            assert_eq!(result.tier, Tier::Five);
            assert!(result.weeks.is_empty());
            assert_eq!(result.clean_weeks, 0);
            assert_eq!(result.missed_weeks, 0);
            assert!(!result.eliminated);
        }
    }

    #[test]
    fn the_week_in_progress_is_never_judged() {
        // Week 2 is underway with no workouts yet; only week 1 counts.
        let records = week_records("a", &[5]);
        let ctx = ProgressionContext::new("a", Tier::Five, 2, &records);
        let result = ProgressionSimulator::run(&ctx);
        assert_eq!(result.weeks.len(), 1);
        assert_eq!(result.clean_weeks, 1);
        assert_eq!(result.missed_weeks, 0);
    }

    #[test]
    fn requirement_follows_the_tier_the_week_was_played_at() {
        // Three clean weeks at Five earn Four. A miss there demotes back to
        // Five, so the next week owes 5 again and 4 workouts no longer cut it.
        let records = week_records("a", &[5, 5, 5, 0, 4]);
        let ctx = ProgressionContext::new("a", Tier::Five, 6, &records);
        let result = ProgressionSimulator::run(&ctx);
        assert_eq!(result.weeks[2].shift, TierShift::Promoted);
        assert_eq!(result.weeks[3].tier, Tier::Four);
        assert_eq!(result.weeks[3].status.required, 4);
        assert_eq!(result.weeks[3].shift, TierShift::Demoted);
        assert_eq!(result.weeks[4].tier, Tier::Five);
        assert_eq!(result.weeks[4].status.required, 5);
        assert!(!result.weeks[4].status.clean);
        assert_eq!(result.tier, Tier::Five);
    }

    #[test]
    fn trace_length_always_matches_completed_weeks() {
        let records = week_records("a", &[5, 0, 5, 0]);
        let ctx = ProgressionContext::new("a", Tier::Five, 5, &records);
        let result = ProgressionSimulator::run(&ctx);
        assert_eq!(result.weeks.len(), 4);
        assert_eq!(result.clean_weeks + result.missed_weeks, 4);
        assert_eq!(result.statuses().count(), 4);
    }

    #[test]
    fn checkpoint_spares_old_strikes_but_not_new_ones() {
        // Two misses, then a checkpoint at week 3, then two more misses.
        let records = week_records("a", &[0, 0, 0, 0]);
        let ctx = ProgressionContext::new("a", Tier::Five, 5, &records).with_checkpoint(Some(3));
        let result = ProgressionSimulator::run(&ctx);
        assert_eq!(result.stint_misses, 2);
        assert!(result.eliminated);

        let ctx = ProgressionContext::new("a", Tier::Five, 3, &records).with_checkpoint(Some(3));
        let result = ProgressionSimulator::run(&ctx);
        assert_eq!(result.stint_misses, 0);
        assert!(!result.eliminated);
    }

    #[test]
    fn other_participants_records_are_invisible() {
        let mut records = week_records("a", &[5, 5]);
        records.extend(week_records("b", &[0, 0]));
        let ctx = ProgressionContext::new("a", Tier::Five, 3, &records);
        let result = ProgressionSimulator::run(&ctx);
        assert_eq!(result.clean_weeks, 2);
        assert!(!result.eliminated);
    }

    #[test]
    fn replay_is_deterministic() {
        let records = week_records("a", &[5, 0, 4, 4, 4, 0, 5]);
        let ctx = ProgressionContext::new("a", Tier::Five, 8, &records);
        let first = ProgressionSimulator::run(&ctx);
        let second = ProgressionSimulator::run(&ctx);
        assert_eq!(first, second);
    }
}
