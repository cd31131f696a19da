mod config;
pub mod database;
pub mod migrations;

pub use config::{ChallengeSection, Config, RulesSection};
pub use database::Database;

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/ironweek[-dev]/` based on IRONWEEK_ENV.
///
/// Set IRONWEEK_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("IRONWEEK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("ironweek-dev")
    } else {
        base_dir.join("ironweek")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
