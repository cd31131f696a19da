//! Point scoring and challenge standings.
//!
//! Points are deliberately simple: one per clean week, one per completed
//! goal. Difficulty tier never multiplies anything; a clean week at the
//! easiest tier is worth the same as one at the hardest.

use serde::{Deserialize, Serialize};

use crate::challenge::Participant;
use crate::progression::Tier;

/// Where a participant's points came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsBreakdown {
    /// One point per clean week.
    pub consistency: u32,
    /// One point per completed goal.
    pub goals: u32,
    pub total: u32,
}

impl PointsBreakdown {
    pub fn new(clean_weeks: u32, completed_goals: u32) -> Self {
        Self {
            consistency: clean_weeks,
            goals: completed_goals,
            total: clean_weeks + completed_goals,
        }
    }
}

/// One line of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub rank: u32,
    pub participant_id: String,
    pub name: String,
    pub tier: Tier,
    pub clean_weeks: u32,
    pub missed_weeks: u32,
    pub total_points: u32,
    pub active: bool,
}

/// Rank participants for display.
///
/// Active participants come first. Within each group the order is points,
/// then clean weeks, then name, so ties resolve the same way every run.
pub fn standings(participants: &[Participant]) -> Vec<StandingsRow> {
    let mut ordered: Vec<&Participant> = participants.iter().collect();
    ordered.sort_by(|a, b| {
        b.active
            .cmp(&a.active)
            .then(b.total_points.cmp(&a.total_points))
            .then(b.clean_weeks.cmp(&a.clean_weeks))
            .then(a.name.cmp(&b.name))
    });
    ordered
        .into_iter()
        .enumerate()
        .map(|(index, participant)| StandingsRow {
            rank: index as u32 + 1,
            participant_id: participant.id.clone(),
            name: participant.name.clone(),
            tier: participant.tier,
            clean_weeks: participant.clean_weeks,
            missed_weeks: participant.missed_weeks,
            total_points: participant.total_points,
            active: participant.active,
        })
        .collect()
}
