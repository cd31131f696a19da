//! Elimination bookkeeping for the hardest tier.
//!
//! Strikes accrue only while the simulated tier for the week is the hardest,
//! and only from the reactivation checkpoint on when one is set. A stint ends
//! the moment the participant leaves the hardest tier; returning to it later
//! starts a fresh stint with zero strikes.

use serde::{Deserialize, Serialize};

use crate::progression::tier::{Tier, TierShift};

/// Missed weeks at the hardest tier before a participant is out.
pub const ELIMINATION_STRIKES: u32 = 2;

/// Outcome of the elimination check after a full replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EliminationVerdict {
    pub eliminated: bool,
    /// Misses accumulated in the current hardest-tier stint.
    pub stint_misses: u32,
}

/// Tracks misses within the current hardest-tier stint of a replay.
#[derive(Debug, Clone, Copy, Default)]
pub struct StintTracker {
    checkpoint: Option<u32>,
    misses: u32,
}

impl StintTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Weeks strictly before `checkpoint` never contribute strikes.
    pub fn with_checkpoint(checkpoint: Option<u32>) -> Self {
        Self {
            checkpoint,
            misses: 0,
        }
    }

    pub fn misses(&self) -> u32 {
        self.misses
    }

    /// Fold one replayed week into the stint.
    ///
    /// `during` is the tier the week was played at; `after` is the tier the
    /// shift left the participant on.
    pub fn observe(&mut self, week: u32, during: Tier, clean: bool, shift: TierShift, after: Tier) {
        if !clean && during.is_hardest() && self.week_counts(week) {
            self.misses += 1;
        }
        match shift {
            TierShift::Promoted if during.is_hardest() => self.misses = 0,
            TierShift::Demoted if after.is_hardest() => self.misses = 0,
            _ => {}
        }
    }

    /// Verdict once the replay has consumed every completed week.
    pub fn verdict(&self, final_tier: Tier) -> EliminationVerdict {
        EliminationVerdict {
            eliminated: final_tier.is_hardest() && self.misses >= ELIMINATION_STRIKES,
            stint_misses: self.misses,
        }
    }

    fn week_counts(&self, week: u32) -> bool {
        self.checkpoint.map_or(true, |checkpoint| week >= checkpoint)
    }
}
