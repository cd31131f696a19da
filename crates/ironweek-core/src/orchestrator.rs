//! Batch recalculation across the roster.
//!
//! The orchestrator is the only writer of derived participant state. It asks
//! the store for active participants, replays each one, and persists the new
//! snapshot only when it differs from what is already stored, so running it
//! twice in a row is a no-op. One participant failing never stops the batch.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::challenge::{Participant, Snapshot, WorkoutRecord};
use crate::error::Result;
use crate::events::Event;
use crate::progression::{
    CountingRules, ProgressionContext, ProgressionSimulator, SimulationResult,
};
use crate::scoring::PointsBreakdown;

/// Storage the orchestrator drives. The bundled SQLite database implements
/// it; tests plug in an in-memory fake.
pub trait ChallengeStore {
    /// Participants still in the running.
    fn active_participants(&self) -> Result<Vec<Participant>>;

    /// One participant by id, active or not.
    fn participant(&self, participant_id: &str) -> Result<Participant>;

    /// Workout records for one participant with `week <= through_week`.
    fn workout_history(
        &self,
        participant_id: &str,
        through_week: u32,
    ) -> Result<Vec<WorkoutRecord>>;

    /// How many of the participant's goals are completed.
    fn completed_goal_count(&self, participant_id: &str) -> Result<u32>;

    /// Replace the participant's persisted snapshot in one write.
    fn apply_snapshot(&self, participant_id: &str, snapshot: &Snapshot) -> Result<()>;
}

/// A participant the batch could not settle. The rest of the batch ran.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecalcFailure {
    pub participant_id: String,
    pub error: String,
}

/// What one recalculation pass did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecalcReport {
    /// Participants the pass looked at.
    pub processed: usize,
    /// Snapshots rewritten because the replay disagreed with the store.
    pub changed: usize,
    /// Snapshots already matching the replay.
    pub unchanged: usize,
    /// Participants deactivated by this pass.
    pub eliminated: Vec<String>,
    pub events: Vec<Event>,
    pub failures: Vec<RecalcFailure>,
}

/// Full derivation for one participant, nothing persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantDetail {
    pub participant: Participant,
    pub result: SimulationResult,
    pub points: PointsBreakdown,
}

/// Drives replays against a store.
pub struct Orchestrator<'a, S> {
    store: &'a S,
    rules: CountingRules,
}

impl<'a, S: ChallengeStore> Orchestrator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            rules: CountingRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: CountingRules) -> Self {
        self.rules = rules;
        self
    }

    /// Replay and settle every active participant.
    pub fn recalculate_all(&self, current_week: u32) -> Result<RecalcReport> {
        let participants = self.store.active_participants()?;
        let mut report = RecalcReport::default();
        for participant in &participants {
            report.processed += 1;
            if let Err(error) = self.settle(participant, current_week, &mut report) {
                report.failures.push(RecalcFailure {
                    participant_id: participant.id.clone(),
                    error: error.to_string(),
                });
            }
        }
        Ok(report)
    }

    /// Replay and settle a single participant, active or not.
    pub fn recalculate_one(&self, participant_id: &str, current_week: u32) -> Result<RecalcReport> {
        let participant = self.store.participant(participant_id)?;
        let mut report = RecalcReport {
            processed: 1,
            ..RecalcReport::default()
        };
        self.settle(&participant, current_week, &mut report)?;
        Ok(report)
    }

    /// Derive a participant's state for display without touching the store.
    pub fn preview(&self, participant_id: &str, current_week: u32) -> Result<ParticipantDetail> {
        let participant = self.store.participant(participant_id)?;
        let (result, points) = self.derive(&participant, current_week)?;
        Ok(ParticipantDetail {
            participant,
            result,
            points,
        })
    }

    fn derive(
        &self,
        participant: &Participant,
        current_week: u32,
    ) -> Result<(SimulationResult, PointsBreakdown)> {
        let completed = current_week.saturating_sub(1);
        let records = self.store.workout_history(&participant.id, completed)?;
        let ctx = ProgressionContext::new(
            &participant.id,
            participant.ceiling,
            current_week,
            &records,
        )
        .with_checkpoint(participant.reactivation_checkpoint)
        .with_rules(self.rules);
        let result = ProgressionSimulator::run(&ctx);
        let goals = self.store.completed_goal_count(&participant.id)?;
        let points = PointsBreakdown::new(result.clean_weeks, goals);
        Ok((result, points))
    }

    fn settle(
        &self,
        participant: &Participant,
        current_week: u32,
        report: &mut RecalcReport,
    ) -> Result<()> {
        let (result, points) = self.derive(participant, current_week)?;
        let snapshot = Snapshot {
            tier: result.tier,
            clean_weeks: result.clean_weeks,
            missed_weeks: result.missed_weeks,
            total_points: points.total,
            // Elimination deactivates; nothing here reactivates. That takes
            // an explicit admin action.
            active: participant.active && !result.eliminated,
        };

        let previous = participant.snapshot();
        if snapshot == previous {
            report.unchanged += 1;
            return Ok(());
        }

        self.store.apply_snapshot(&participant.id, &snapshot)?;
        let now = Utc::now();
        report.changed += 1;
        report.events.push(Event::SnapshotUpdated {
            participant_id: participant.id.clone(),
            previous,
            current: snapshot,
            at: now,
        });
        if previous.active && !snapshot.active {
            report.eliminated.push(participant.id.clone());
            report.events.push(Event::ParticipantEliminated {
                participant_id: participant.id.clone(),
                stint_misses: result.stint_misses,
                at: now,
            });
        }
        Ok(())
    }
}
