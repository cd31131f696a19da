//! Property-based tests for the progression replay.
//!
//! Seasons are generated as arbitrary per-week workout counts, then replayed
//! to check the laws the engine is supposed to hold regardless of input:
//! determinism, trace shape, ceiling clamping, elimination scoping, and
//! the linkage between consecutive tier shifts.

use proptest::prelude::*;

use ironweek_core::progression::TierShift;
use ironweek_core::{
    PointsBreakdown, ProgressionContext, ProgressionSimulator, Tier, WorkoutRecord,
};

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

/// Per-week workout counts for up to fourteen scripted weeks.
fn arb_counts() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(0u32..=7, 0..=14)
}

fn arb_ceiling() -> impl Strategy<Value = Tier> {
    prop_oneof![Just(Tier::Three), Just(Tier::Four), Just(Tier::Five)]
}

proptest! {
    #[test]
    fn replay_is_deterministic(counts in arb_counts(), ceiling in arb_ceiling(), current_week in 0u32..=16) {
        let records = week_records("p", &counts);
        let ctx = ProgressionContext::new("p", ceiling, current_week, &records);
        let first = ProgressionSimulator::run(&ctx);
        let second = ProgressionSimulator::run(&ctx);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn trace_covers_exactly_the_completed_weeks(counts in arb_counts(), ceiling in arb_ceiling(), current_week in 0u32..=16) {
        let records = week_records("p", &counts);
        let ctx = ProgressionContext::new("p", ceiling, current_week, &records);
        let result = ProgressionSimulator::run(&ctx);

        prop_assert_eq!(result.weeks.len() as u32, current_week.saturating_sub(1));
        prop_assert_eq!(result.clean_weeks + result.missed_weeks, result.weeks.len() as u32);
        for (index, outcome) in result.weeks.iter().enumerate() {
            prop_assert_eq!(outcome.status.week, index as u32 + 1);
            prop_assert_eq!(outcome.status.required, outcome.tier.required_workouts());
            // Scripted weeks count exactly their workouts; unscripted ones zero.
            let expected = counts.get(index).copied().unwrap_or(0);
            prop_assert_eq!(outcome.status.completed, expected);
        }
    }

    #[test]
    fn tier_never_regresses_past_the_ceiling(counts in arb_counts(), ceiling in arb_ceiling(), current_week in 0u32..=16) {
        let records = week_records("p", &counts);
        let ctx = ProgressionContext::new("p", ceiling, current_week, &records);
        let result = ProgressionSimulator::run(&ctx);

        prop_assert!(result.tier <= ceiling);
        for outcome in &result.weeks {
            prop_assert!(outcome.tier <= ceiling);
        }
    }

    #[test]
    fn elimination_requires_the_hardest_tier_and_two_strikes(counts in arb_counts(), ceiling in arb_ceiling(), current_week in 0u32..=16) {
        let records = week_records("p", &counts);
        let ctx = ProgressionContext::new("p", ceiling, current_week, &records);
        let result = ProgressionSimulator::run(&ctx);

        prop_assert_eq!(
            result.eliminated,
            result.tier == Tier::Five && result.stint_misses >= 2
        );
        // Leaving tier 5 always closes the stint.
        if result.tier != Tier::Five {
            prop_assert_eq!(result.stint_misses, 0);
        }
    }

    #[test]
    fn shifts_link_consecutive_weeks(counts in arb_counts(), ceiling in arb_ceiling(), current_week in 0u32..=16) {
        let records = week_records("p", &counts);
        let ctx = ProgressionContext::new("p", ceiling, current_week, &records);
        let result = ProgressionSimulator::run(&ctx);

        for pair in result.weeks.windows(2) {
            let next_tier = pair[1].tier;
            match pair[0].shift {
                TierShift::Promoted => prop_assert_eq!(Some(next_tier), pair[0].tier.easier()),
                TierShift::Demoted => prop_assert_eq!(Some(next_tier), pair[0].tier.harder()),
                TierShift::Held => prop_assert_eq!(next_tier, pair[0].tier),
            }
        }
        if let Some(last) = result.weeks.last() {
            match last.shift {
                TierShift::Promoted => prop_assert_eq!(Some(result.tier), last.tier.easier()),
                TierShift::Demoted => prop_assert_eq!(Some(result.tier), last.tier.harder()),
                TierShift::Held => prop_assert_eq!(result.tier, last.tier),
            }
        }
    }

    #[test]
    fn a_reactivation_checkpoint_never_adds_strikes(counts in arb_counts(), checkpoint in 1u32..=16, current_week in 0u32..=16) {
        let records = week_records("p", &counts);
        let unchecked = ProgressionSimulator::run(&ProgressionContext::new(
            "p", Tier::Five, current_week, &records,
        ));
        let checked = ProgressionSimulator::run(
            &ProgressionContext::new("p", Tier::Five, current_week, &records)
                .with_checkpoint(Some(checkpoint)),
        );
        prop_assert!(checked.stint_misses <= unchecked.stint_misses);
    }

    #[test]
    fn points_are_clean_weeks_plus_goals(counts in arb_counts(), current_week in 0u32..=16, goals in 0u32..=20) {
        let records = week_records("p", &counts);
        let ctx = ProgressionContext::new("p", Tier::Five, current_week, &records);
        let result = ProgressionSimulator::run(&ctx);

        let points = PointsBreakdown::new(result.clean_weeks, goals);
        prop_assert_eq!(points.consistency, result.clean_weeks);
        prop_assert_eq!(points.total, result.clean_weeks + goals);
    }
}
