//! Challenge state and admin commands.

use chrono::Utc;
use clap::Subcommand;
use ironweek_core::challenge::rulebook;
use ironweek_core::storage::Config;
use ironweek_core::{standings, Database, Event};

#[derive(Subcommand)]
pub enum ChallengeAction {
    /// Current challenge week and dates
    Week,
    /// Challenge dashboard, or one participant's derived state
    Status {
        /// Participant id or name
        participant: Option<String>,
    },
    /// Replay and settle every active participant
    Recalc,
    /// Ranked snapshot rows for the leaderboard
    Standings,
    /// Let an eliminated participant back in from the current week on
    Reactivate {
        /// Participant id or name
        participant: String,
    },
    /// Print the challenge rulebook
    Rules,
}

pub fn run(action: ChallengeAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ChallengeAction::Week => {
            let config = Config::load_or_default();
            let calendar = config.calendar();
            let now = Utc::now();
            let week = calendar.current_week(now);
            let value = serde_json::json!({
                "current_week": week,
                "completed_weeks": calendar.completed_weeks(now),
                "week_start": if week >= 1 { Some(calendar.week_start(week)) } else { None },
                "start_date": calendar.start_date(),
                "duration_weeks": calendar.duration_weeks(),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        ChallengeAction::Status { participant } => {
            let db = Database::open()?;
            match participant {
                Some(key) => {
                    let p = db.resolve_participant(&key)?;
                    let (orchestrator, week) = super::orchestrator(&db);
                    let detail = orchestrator.preview(&p.id, week)?;
                    println!("{}", serde_json::to_string_pretty(&detail)?);
                }
                None => {
                    let config = Config::load_or_default();
                    let week = config.calendar().current_week(Utc::now());
                    let rows = standings(&db.list_participants()?);
                    let value = serde_json::json!({
                        "current_week": week,
                        "standings": rows,
                    });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
            }
        }
        ChallengeAction::Recalc => {
            let db = Database::open()?;
            let (orchestrator, week) = super::orchestrator(&db);
            let report = orchestrator.recalculate_all(week)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        ChallengeAction::Standings => {
            let db = Database::open()?;
            let rows = standings(&db.list_participants()?);
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        ChallengeAction::Reactivate { participant } => {
            let db = Database::open()?;
            let p = db.resolve_participant(&participant)?;
            let (orchestrator, week) = super::orchestrator(&db);
            db.reactivate(&p.id, week)?;
            orchestrator.recalculate_one(&p.id, week)?;

            let event = Event::ParticipantReactivated {
                participant_id: p.id,
                checkpoint: week,
                at: Utc::now(),
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        ChallengeAction::Rules => {
            println!("{}", rulebook());
        }
    }
    Ok(())
}
