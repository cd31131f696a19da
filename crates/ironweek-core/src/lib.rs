//! # Ironweek Core Library
//!
//! This library provides the core business logic for the Ironweek group
//! fitness challenge. It implements a CLI-first philosophy where every
//! operation is available via a standalone CLI binary over this library;
//! presentation layers (leaderboards, calendars, heatmaps) consume the
//! snapshots and events it produces.
//!
//! ## Architecture
//!
//! - **Progression Engine**: a pure week-by-week replay that derives each
//!   participant's difficulty tier, clean/missed week counts, and
//!   elimination verdict from raw workout history on every recalculation
//! - **Storage**: SQLite-based challenge storage and TOML-based configuration
//! - **Orchestrator**: batch recalculation that diffs replay results against
//!   persisted snapshots and applies whole-record updates
//! - **Scoring**: points (clean weeks + completed goals) and standings order
//!
//! ## Key Components
//!
//! - [`ProgressionSimulator`]: the full-history replay
//! - [`Orchestrator`]: recalculation driver over a [`ChallengeStore`]
//! - [`Database`]: roster, workout, and goal persistence
//! - [`Config`]: challenge configuration management

pub mod challenge;
pub mod progression;
pub mod scoring;
pub mod orchestrator;
pub mod events;
pub mod storage;
pub mod error;

pub use challenge::calendar::ChallengeCalendar;
pub use challenge::{Goal, Participant, Snapshot, WorkoutKind, WorkoutRecord};
pub use progression::{
    CountingRules, ProgressionContext, ProgressionSimulator, SimulationResult, Tier, WeekStatus,
};
pub use scoring::{standings, PointsBreakdown, StandingsRow};
pub use orchestrator::{ChallengeStore, Orchestrator, ParticipantDetail, RecalcReport};
pub use events::Event;
pub use storage::{Config, Database};
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
