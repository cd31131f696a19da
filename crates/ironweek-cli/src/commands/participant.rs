//! Roster management commands.

use clap::Subcommand;
use ironweek_core::{Database, Participant, Tier};

#[derive(Subcommand)]
pub enum ParticipantAction {
    /// Register a new participant
    Add {
        /// Display name, unique per challenge
        name: String,
        /// Signup ceiling tier: 3, 4, or 5
        #[arg(long, default_value = "5")]
        ceiling: u8,
    },
    /// List the roster
    List {
        /// Print raw JSON instead of summary lines
        #[arg(long)]
        json: bool,
    },
    /// Show one participant's full derived state
    Show {
        /// Participant id or name
        participant: String,
    },
    /// Correct a participant's signup ceiling
    SetCeiling {
        /// Participant id or name
        participant: String,
        /// New ceiling tier: 3, 4, or 5
        ceiling: u8,
    },
    /// Remove a participant along with their workouts and goals
    Remove {
        /// Participant id or name
        participant: String,
    },
}

pub fn run(action: ParticipantAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ParticipantAction::Add { name, ceiling } => {
            let ceiling = Tier::try_from(ceiling)?;
            let participant = Participant::new(name, ceiling);
            db.add_participant(&participant)?;
            println!("Participant added: {}", participant.id);
            println!("{}", serde_json::to_string_pretty(&participant)?);
        }
        ParticipantAction::List { json } => {
            let participants = db.list_participants()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&participants)?);
            } else {
                for p in &participants {
                    println!(
                        "{}  tier {}  {} pts  {} clean  {} missed  {}",
                        p.name,
                        p.tier,
                        p.total_points,
                        p.clean_weeks,
                        p.missed_weeks,
                        if p.active { "active" } else { "out" }
                    );
                }
            }
        }
        ParticipantAction::Show { participant } => {
            let p = db.resolve_participant(&participant)?;
            let (orchestrator, week) = super::orchestrator(&db);
            let detail = orchestrator.preview(&p.id, week)?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        ParticipantAction::SetCeiling {
            participant,
            ceiling,
        } => {
            let ceiling = Tier::try_from(ceiling)?;
            let p = db.resolve_participant(&participant)?;
            db.set_ceiling(&p.id, ceiling)?;
            // The ceiling changes every week's simulated requirement, so the
            // snapshot is stale until a fresh replay lands.
            let (orchestrator, week) = super::orchestrator(&db);
            orchestrator.recalculate_one(&p.id, week)?;
            println!("Ceiling updated: {} -> {ceiling}", p.name);
        }
        ParticipantAction::Remove { participant } => {
            let p = db.resolve_participant(&participant)?;
            db.remove_participant(&p.id)?;
            println!("Participant removed: {}", p.name);
        }
    }
    Ok(())
}
