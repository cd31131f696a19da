//! Workout logging commands.
//!
//! Logging is the challenge's main write path: every log triggers a
//! synchronous recalculation of the participant's snapshot, so the
//! leaderboard catches up immediately rather than waiting for an admin
//! `challenge recalc`.

use chrono::Utc;
use clap::Subcommand;
use ironweek_core::challenge::{validate_day, validate_week};
use ironweek_core::{ChallengeStore, Database, Event, WorkoutKind, WorkoutRecord};

#[derive(Subcommand)]
pub enum WorkoutAction {
    /// Log a workout day (logging the same day again replaces it)
    Log {
        /// Participant id or name
        participant: String,
        /// Challenge week, numbered from 1
        week: i64,
        /// Day within the week, 1 (Monday) through 7 (Sunday)
        day: i64,
        /// Record a step-count workout instead of a standard one
        #[arg(long)]
        steps: bool,
        /// Clear the day (mark it not completed)
        #[arg(long)]
        missed: bool,
    },
    /// Show one week's per-day records
    Week {
        /// Participant id or name
        participant: String,
        /// Challenge week, numbered from 1
        week: i64,
    },
    /// Show every logged workout
    History {
        /// Participant id or name
        participant: String,
    },
}

pub fn run(action: WorkoutAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        WorkoutAction::Log {
            participant,
            week,
            day,
            steps,
            missed,
        } => {
            let p = db.resolve_participant(&participant)?;
            let week = validate_week(week)?;
            let day = validate_day(day)?;
            let kind = if steps {
                WorkoutKind::Steps
            } else {
                WorkoutKind::Standard
            };
            let record = WorkoutRecord::completed(&p.id, week, day)
                .with_kind(kind)
                .with_completed(!missed);
            db.log_workout(&record)?;

            let (orchestrator, current_week) = super::orchestrator(&db);
            orchestrator.recalculate_one(&p.id, current_week)?;

            let event = Event::WorkoutLogged {
                participant_id: p.id,
                week,
                day,
                completed: record.completed,
                at: Utc::now(),
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        WorkoutAction::Week { participant, week } => {
            let p = db.resolve_participant(&participant)?;
            let week = validate_week(week)?;
            let days = db.workouts_for_week(&p.id, week)?;
            let completed = days.iter().filter(|r| r.completed).count();
            let value = serde_json::json!({
                "participant": p.name,
                "week": week,
                "completed": completed,
                "days": days,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        WorkoutAction::History { participant } => {
            let p = db.resolve_participant(&participant)?;
            let records = db.workout_history(&p.id, u32::MAX)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}
