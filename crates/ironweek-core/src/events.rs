use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::challenge::Snapshot;

/// Every durable change in the challenge produces an Event.
/// Consumers render them; nothing in the core acts on them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    WorkoutLogged {
        participant_id: String,
        week: u32,
        day: u8,
        completed: bool,
        at: DateTime<Utc>,
    },
    GoalCompleted {
        participant_id: String,
        goal_id: String,
        at: DateTime<Utc>,
    },
    /// A recalculation changed the participant's persisted snapshot.
    SnapshotUpdated {
        participant_id: String,
        previous: Snapshot,
        current: Snapshot,
        at: DateTime<Utc>,
    },
    /// The participant struck out at the hardest tier and was deactivated.
    ParticipantEliminated {
        participant_id: String,
        stint_misses: u32,
        at: DateTime<Utc>,
    },
    /// An admin let an eliminated participant back in from `checkpoint` on.
    ParticipantReactivated {
        participant_id: String,
        checkpoint: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn participant_id(&self) -> &str {
        match self {
            Event::WorkoutLogged { participant_id, .. }
            | Event::GoalCompleted { participant_id, .. }
            | Event::SnapshotUpdated { participant_id, .. }
            | Event::ParticipantEliminated { participant_id, .. }
            | Event::ParticipantReactivated { participant_id, .. } => participant_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_tag_their_type() {
        let event = Event::ParticipantEliminated {
            participant_id: "p1".into(),
            stint_misses: 2,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ParticipantEliminated");
        assert_eq!(json["participant_id"], "p1");
    }

    #[test]
    fn participant_id_reaches_into_every_variant() {
        let event = Event::GoalCompleted {
            participant_id: "p2".into(),
            goal_id: "g1".into(),
            at: Utc::now(),
        };
        assert_eq!(event.participant_id(), "p2");
    }
}
