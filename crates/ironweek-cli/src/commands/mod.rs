pub mod challenge;
pub mod config;
pub mod goal;
pub mod participant;
pub mod workout;

use chrono::Utc;
use ironweek_core::storage::Config;
use ironweek_core::{Database, Orchestrator};

/// Orchestrator wired to the on-disk config, plus the resolved current week.
///
/// Every command that replays history goes through here so the counting
/// rules and the week boundary always come from the same configuration.
pub(crate) fn orchestrator(db: &Database) -> (Orchestrator<'_, Database>, u32) {
    let config = Config::load_or_default();
    let week = config.calendar().current_week(Utc::now());
    (Orchestrator::new(db).with_rules(config.counting_rules()), week)
}
