//! TOML-based challenge configuration.
//!
//! Stores the organizer-set parameters:
//! - Challenge timing (start date, reference UTC offset, duration)
//! - Optional counting rules (the step-workout restriction)
//!
//! Configuration is stored at `~/.config/ironweek/config.toml`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::challenge::calendar::ChallengeCalendar;
use crate::error::{ConfigError, Result};
use crate::progression::CountingRules;

/// Challenge timing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChallengeSection {
    /// First day of week 1, interpreted in the reference offset.
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    /// Fixed reference UTC offset in hours. Week boundaries fall at midnight
    /// in this offset no matter where a participant logs from.
    #[serde(default)]
    pub utc_offset_hours: i32,
    #[serde(default = "default_duration_weeks")]
    pub duration_weeks: u32,
}

/// Optional counting rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesSection {
    /// Count step workouts at most once per week, and only while the
    /// participant's simulated tier is the hardest. Off by default.
    #[serde(default)]
    pub steps_count_once_at_hardest_tier: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/ironweek/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub challenge: ChallengeSection,
    #[serde(default)]
    pub rules: RulesSection,
}

// Default functions
fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 5).unwrap_or_default()
}
fn default_duration_weeks() -> u32 {
    12
}

impl Default for ChallengeSection {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            utc_offset_hours: 0,
            duration_weeks: default_duration_weeks(),
        }
    }
}

impl Default for RulesSection {
    fn default() -> Self {
        Self {
            steps_count_once_at_hardest_tier: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            challenge: ChallengeSection::default(),
            rules: RulesSection::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => {
                        let parsed =
                            value
                                .parse::<bool>()
                                .map_err(|_| ConfigError::InvalidValue {
                                    key: key.to_string(),
                                    message: format!("cannot parse '{value}' as bool"),
                                })?;
                        serde_json::Value::Bool(parsed)
                    }
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| ConfigError::InvalidValue {
                                    key: key.to_string(),
                                    message: format!("cannot parse '{value}' as number"),
                                })?
                        } else {
                            return Err(ConfigError::InvalidValue {
                                key: key.to_string(),
                                message: format!("cannot parse '{value}' as number"),
                            });
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the default file when none exists.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path,
                        message: e.to_string(),
                    })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key and persist.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// into the field's type, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.save()?;
        Ok(())
    }

    /// The calendar resolving "now" into challenge week numbers.
    pub fn calendar(&self) -> ChallengeCalendar {
        ChallengeCalendar::new(
            self.challenge.start_date,
            self.challenge.utc_offset_hours,
            self.challenge.duration_weeks,
        )
    }

    /// The counting rules in force for this challenge.
    pub fn counting_rules(&self) -> CountingRules {
        CountingRules {
            steps_count_once_at_hardest_tier: self.rules.steps_count_once_at_hardest_tier,
        }
    }
}
