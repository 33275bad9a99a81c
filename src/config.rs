//! Runtime configuration
//!
//! Environment-only. Every binary reads the same variables:
//!
//! - `BMT_DATABASE_PATH`: SQLite file (default `<project>/data/bmt.db`)
//! - `BMT_WEIGHT_HISTORY_DAYS`: dashboard weight window (default 7)
//! - `BMT_BMI_HISTORY_DAYS`: dashboard BMI window (default 30)

use std::path::PathBuf;

use thiserror::Error;

pub const DATABASE_PATH_VAR: &str = "BMT_DATABASE_PATH";
pub const WEIGHT_HISTORY_DAYS_VAR: &str = "BMT_WEIGHT_HISTORY_DAYS";
pub const BMI_HISTORY_DAYS_VAR: &str = "BMT_BMI_HISTORY_DAYS";

pub const DEFAULT_WEIGHT_HISTORY_DAYS: i64 = 7;
pub const DEFAULT_BMI_HISTORY_DAYS: i64 = 30;
/// Longest history window accepted anywhere (about a century)
pub const MAX_HISTORY_DAYS: i64 = 36_500;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' (expected 1 to 36500 days)")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub weight_history_days: i64,
    pub bmi_history_days: i64,
}

impl Config {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup(DATABASE_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_database_path);

        let weight_history_days = parse_days(
            WEIGHT_HISTORY_DAYS_VAR,
            lookup(WEIGHT_HISTORY_DAYS_VAR),
            DEFAULT_WEIGHT_HISTORY_DAYS,
        )?;
        let bmi_history_days = parse_days(
            BMI_HISTORY_DAYS_VAR,
            lookup(BMI_HISTORY_DAYS_VAR),
            DEFAULT_BMI_HISTORY_DAYS,
        )?;

        Ok(Self {
            database_path,
            weight_history_days,
            bmi_history_days,
        })
    }
}

fn parse_days(key: &'static str, raw: Option<String>, default: i64) -> Result<i64, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => match value.trim().parse::<i64>() {
            Ok(days) if (1..=MAX_HISTORY_DAYS).contains(&days) => Ok(days),
            _ => Err(ConfigError::InvalidValue { key, value }),
        },
    }
}

/// `<project root>/data/bmt.db`, where the project root is the executable's
/// directory with any trailing `target/{debug,release}` removed
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("bmt.db");
    path
}
