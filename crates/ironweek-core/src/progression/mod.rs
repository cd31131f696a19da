//! Consistency progression engine.
//!
//! Derives every participant's difficulty tier, clean and missed week counts,
//! and elimination verdict by replaying their workout history from the start
//! of the challenge. The engine is pure: it reads records, writes nothing,
//! and produces the same result for the same history every time.

mod elimination;
mod simulator;
mod tier;
mod week;

pub use elimination::{EliminationVerdict, StintTracker, ELIMINATION_STRIKES};
pub use simulator::{ProgressionContext, ProgressionSimulator, SimulationResult, WeekOutcome};
pub use tier::{Tier, TierMachine, TierShift, PROMOTION_STREAK_WEEKS};
pub use week::{CountingRules, WeekEvaluator, WeekStatus};
