//! Personal goal commands.

use chrono::Utc;
use clap::Subcommand;
use ironweek_core::{Database, Event, Goal};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Add a goal
    Add {
        /// Participant id or name
        participant: String,
        /// Goal title
        title: String,
        /// Free-text category label ("strength", "mobility", ...)
        #[arg(long)]
        category: Option<String>,
    },
    /// Mark a goal completed (worth one point)
    Complete {
        /// Goal ID
        id: String,
    },
    /// List a participant's goals
    List {
        /// Participant id or name
        participant: String,
    },
    /// Delete a goal
    Remove {
        /// Goal ID
        id: String,
    },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        GoalAction::Add {
            participant,
            title,
            category,
        } => {
            let p = db.resolve_participant(&participant)?;
            let goal = Goal::new(&p.id, title, category);
            db.add_goal(&goal)?;
            println!("Goal added: {}", goal.id);
            println!("{}", serde_json::to_string_pretty(&goal)?);
        }
        GoalAction::Complete { id } => {
            let goal = db.complete_goal(&id)?;
            let (orchestrator, current_week) = super::orchestrator(&db);
            orchestrator.recalculate_one(&goal.participant_id, current_week)?;

            let event = Event::GoalCompleted {
                participant_id: goal.participant_id,
                goal_id: goal.id,
                at: Utc::now(),
            };
            println!("{}", serde_json::to_string_pretty(&event)?);
        }
        GoalAction::List { participant } => {
            let p = db.resolve_participant(&participant)?;
            let goals = db.list_goals(&p.id)?;
            println!("{}", serde_json::to_string_pretty(&goals)?);
        }
        GoalAction::Remove { id } => {
            db.remove_goal(&id)?;
            println!("Goal removed: {id}");
        }
    }
    Ok(())
}
