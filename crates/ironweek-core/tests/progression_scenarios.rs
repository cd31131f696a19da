//! Integration tests for the progression replay.
//!
//! Each test scripts a participant's season as a list of per-week workout
//! counts and checks the derived state against the challenge rulebook.

use ironweek_core::progression::TierShift;
use ironweek_core::{ProgressionContext, ProgressionSimulator, Tier, WorkoutRecord};

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
fn test_three_clean_weeks_earn_tier_four() {
    let records = week_records("ada", &[5, 5, 5]);
    let ctx = ProgressionContext::new("ada", Tier::Five, 4, &records);
    let result = ProgressionSimulator::run(&ctx);

    assert_eq!(result.tier, Tier::Four);
    assert_eq!(result.clean_weeks, 3);
    assert_eq!(result.missed_weeks, 0);
    assert!(!result.eliminated);
    assert_eq!(result.weeks[2].shift, TierShift::Promoted);
}

#[test]
fn test_six_clean_weeks_earn_tier_three() {
    let records = week_records("ada", &[5, 5, 5, 4, 4, 4]);
    let ctx = ProgressionContext::new("ada", Tier::Five, 7, &records);
    let result = ProgressionSimulator::run(&ctx);

    assert_eq!(result.tier, Tier::Three);
    assert_eq!(result.clean_weeks, 6);
    assert_eq!(result.missed_weeks, 0);
    // Weeks four through six were owed only 4 workouts.
    for outcome in &result.weeks[3..] {
        assert_eq!(outcome.tier, Tier::Four);
        assert_eq!(outcome.status.required, 4);
    }
}

#[test]
fn test_two_misses_at_the_hardest_tier_eliminate() {
    let records = week_records("bo", &[3, 3]);
    let ctx = ProgressionContext::new("bo", Tier::Five, 3, &records);
    let result = ProgressionSimulator::run(&ctx);

    assert_eq!(result.tier, Tier::Five);
    assert_eq!(result.missed_weeks, 2);
    assert_eq!(result.stint_misses, 2);
    assert!(result.eliminated);
}

#[test]
fn test_one_miss_at_the_hardest_tier_is_only_a_strike() {
    let records = week_records("bo", &[3, 5]);
    let ctx = ProgressionContext::new("bo", Tier::Five, 3, &records);
    let result = ProgressionSimulator::run(&ctx);

    assert_eq!(result.stint_misses, 1);
    assert!(!result.eliminated);
}

#[test]
fn test_demotion_back_to_the_hardest_tier_starts_a_fresh_trial() {
    // Miss at 5, climb to 4 over three clean weeks, then miss at 4. The
    // demotion lands back on tier 5 with a clean slate: the week-1 strike
    // belongs to the previous stint and the week-5 miss happened at tier 4.
    let records = week_records("cy", &[3, 5, 5, 5, 3]);
    let ctx = ProgressionContext::new("cy", Tier::Five, 6, &records);
    let result = ProgressionSimulator::run(&ctx);

    assert_eq!(result.weeks[3].shift, TierShift::Promoted);
    assert_eq!(result.weeks[4].tier, Tier::Four);
    assert_eq!(result.weeks[4].shift, TierShift::Demoted);
    assert_eq!(result.tier, Tier::Five);
    assert_eq!(result.clean_weeks, 3);
    assert_eq!(result.missed_weeks, 2);
    assert_eq!(result.stint_misses, 0);
    assert!(!result.eliminated);
}

#[test]
fn test_lenient_ceiling_limits_regression_never_progression() {
    // A ceiling-4 participant starts at tier 4 and can still climb to 3.
    let records = week_records("di", &[4, 4, 4]);
    let ctx = ProgressionContext::new("di", Tier::Four, 4, &records);
    let result = ProgressionSimulator::run(&ctx);
    assert_eq!(result.tier, Tier::Three);
    assert_eq!(result.clean_weeks, 3);

    // Missing every week never pushes them past their ceiling, and a
    // participant who never reaches tier 5 cannot be eliminated.
    let empty: Vec<WorkoutRecord> = Vec::new();
    let ctx = ProgressionContext::new("di", Tier::Four, 5, &empty);
    let result = ProgressionSimulator::run(&ctx);
    assert_eq!(result.tier, Tier::Four);
    assert_eq!(result.missed_weeks, 4);
    assert_eq!(result.stint_misses, 0);
    assert!(!result.eliminated);
}

#[test]
fn test_promotion_streak_interrupted_by_a_miss_starts_over() {
    // Two cleans, a miss, then three cleans. Only the final run of three
    // counts toward promotion.
    let records = week_records("eva", &[5, 5, 0, 5, 5, 5]);
    let ctx = ProgressionContext::new("eva", Tier::Five, 7, &records);
    let result = ProgressionSimulator::run(&ctx);

    assert_eq!(result.weeks[1].shift, TierShift::Held);
    assert_eq!(result.weeks[5].shift, TierShift::Promoted);
    assert_eq!(result.tier, Tier::Four);
    assert_eq!(result.clean_weeks, 5);
    assert_eq!(result.missed_weeks, 1);
}

#[test]
fn test_extra_workouts_carry_no_credit_forward() {
    // Seven workouts in week 1 still leave week 2 owing its full quota.
    let records = week_records("fay", &[7, 4]);
    let ctx = ProgressionContext::new("fay", Tier::Five, 3, &records);
    let result = ProgressionSimulator::run(&ctx);

    assert!(result.weeks[0].status.clean);
    assert_eq!(result.weeks[0].status.completed, 7);
    assert!(!result.weeks[1].status.clean);
    assert_eq!(result.clean_weeks, 1);
    assert_eq!(result.missed_weeks, 1);
}
