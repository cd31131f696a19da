//! Difficulty tiers and the week-by-week tier machine.
//!
//! A participant sits on one of three difficulty tiers. Lower numbers are
//! easier to hold: tiers 3 and 4 both require 4 workouts a week (tier 3 is a
//! reward position that takes longer to fall from, not a lighter workload),
//! while tier 5 requires 5. Three consecutive clean weeks earn the next
//! easier tier; a single missed week pushes the participant one tier harder,
//! clamped at their personal ceiling.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Consecutive clean weeks required to earn the next easier tier.
pub const PROMOTION_STREAK_WEEKS: u32 = 3;

/// A participant's difficulty tier.
///
/// The domain is closed: only 3, 4, and 5 exist, and the engine can neither
/// produce nor consume anything else. Serialized as its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Tier {
    /// Easiest to hold: 4 workouts/week, two promotions from the start.
    Three = 3,
    /// Middle tier: 4 workouts/week.
    Four = 4,
    /// Hardest tier: 5 workouts/week. Misses here count toward elimination.
    Five = 5,
}

impl Tier {
    /// Weekly workout count required to keep a week clean at this tier.
    ///
    /// Tiers 3 and 4 share the 4-workout minimum; tier 5 requires 5.
    pub fn required_workouts(self) -> u32 {
        match self {
            Tier::Three | Tier::Four => 4,
            Tier::Five => 5,
        }
    }

    /// The next easier tier, if any.
    pub fn easier(self) -> Option<Tier> {
        match self {
            Tier::Three => None,
            Tier::Four => Some(Tier::Three),
            Tier::Five => Some(Tier::Four),
        }
    }

    /// The next harder tier, if any.
    pub fn harder(self) -> Option<Tier> {
        match self {
            Tier::Three => Some(Tier::Four),
            Tier::Four => Some(Tier::Five),
            Tier::Five => None,
        }
    }

    /// Whether this is the hardest tier (the only one misses are scoped to).
    pub fn is_hardest(self) -> bool {
        self == Tier::Five
    }
}

/// The default tier doubles as the default ceiling: everybody starts at the
/// hardest tier unless they earned a head start.
impl Default for Tier {
    fn default() -> Self {
        Tier::Five
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier as u8
    }
}

impl TryFrom<u8> for Tier {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Tier::Three),
            4 => Ok(Tier::Four),
            5 => Ok(Tier::Five),
            other => Err(ValidationError::InvalidTier(i64::from(other))),
        }
    }
}

impl TryFrom<i64> for Tier {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Tier::Three),
            4 => Ok(Tier::Four),
            5 => Ok(Tier::Five),
            other => Err(ValidationError::InvalidTier(other)),
        }
    }
}

/// What a single simulated week did to the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierShift {
    /// Tier unchanged.
    Held,
    /// Three clean weeks in a row earned the next easier tier.
    Promoted,
    /// A missed week pushed the participant one tier harder.
    Demoted,
}

/// The sequential tier state machine.
///
/// Both the progression simulator and the elimination tracker drive this
/// machine week by week, so the two replays cannot drift apart. The
/// requirement for any week is read off `tier()` *before* advancing, because
/// the workload owed in a week is the one that was active during it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierMachine {
    tier: Tier,
    streak: u32,
    ceiling: Tier,
}

impl TierMachine {
    /// Start a fresh replay at the participant's ceiling.
    pub fn new(ceiling: Tier) -> Self {
        Self {
            tier: ceiling,
            streak: 0,
            ceiling,
        }
    }

    /// Tier currently active (the one the next week is evaluated against).
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Clean weeks accumulated toward the next promotion.
    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// The least-demanding tier a regression may return this participant to.
    pub fn ceiling(&self) -> Tier {
        self.ceiling
    }

    /// Advance one completed week and report the resulting shift.
    ///
    /// A clean week extends the streak and, at three, promotes (streak
    /// resets; no floor, so even a participant below their ceiling keeps
    /// climbing). A missed week resets the streak and demotes one step,
    /// never past the ceiling. A miss at tier 5 changes nothing here; the
    /// elimination tracker owns its consequences.
    pub fn advance(&mut self, clean: bool) -> TierShift {
        if clean {
            self.streak += 1;
            if self.streak >= PROMOTION_STREAK_WEEKS {
                if let Some(easier) = self.tier.easier() {
                    self.tier = easier;
                    self.streak = 0;
                    return TierShift::Promoted;
                }
            }
            TierShift::Held
        } else {
            self.streak = 0;
            match self.tier.harder() {
                Some(harder) if harder <= self.ceiling => {
                    self.tier = harder;
                    TierShift::Demoted
                }
                _ => TierShift::Held,
            }
        }
    }
}
