//! BMT Tools module
//!
//! MCP tool implementations for the Body Metrics Tracker.

pub mod account;
pub mod calculator;
pub mod dashboard;
pub mod profile;
pub mod status;

use uuid::Uuid;

use crate::bmi::{HeightUnit, WeightUnit};
use crate::config::MAX_HISTORY_DAYS;
use crate::db::days_ago_timestamp;

/// Normalize a user id from the auth provider to lowercase hyphenated UUID form
pub fn normalize_user_id(user_id: &str) -> Result<String, String> {
    Uuid::parse_str(user_id.trim())
        .map(|id| id.hyphenated().to_string())
        .map_err(|_| format!("Invalid user id: '{}'. Expected a UUID", user_id))
}

pub fn parse_weight_unit(unit: &str) -> Result<WeightUnit, String> {
    WeightUnit::from_str(unit)
        .ok_or_else(|| format!("Invalid weight unit: '{}'. Valid units: kg, lbs", unit))
}

pub fn parse_height_unit(unit: &str) -> Result<HeightUnit, String> {
    HeightUnit::from_str(unit)
        .ok_or_else(|| format!("Invalid height unit: '{}'. Valid units: cm, inches", unit))
}

/// History windows cover 1 to `MAX_HISTORY_DAYS` days
pub fn check_days(days: i64) -> Result<i64, String> {
    if !(1..=MAX_HISTORY_DAYS).contains(&days) {
        return Err(format!(
            "days out of range: must be between 1 and {} (got {})",
            MAX_HISTORY_DAYS, days
        ));
    }
    Ok(days)
}

/// Validate a window and return the timestamp it starts at
pub fn history_cutoff(days: i64) -> Result<String, String> {
    let days = check_days(days)?;
    days_ago_timestamp(days).ok_or_else(|| format!("days out of range (got {})", days))
}

#[cfg(test)]
pub(crate) mod test_support {
    use tempfile::TempDir;

    use crate::db::Database;

    pub const USER: &str = "7f9c2ba4-e88f-4a7b-a1c3-0b2f5e6d9a10";

    /// File-backed database in a temp dir; keep the dir alive for the test
    pub fn test_db() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::open(dir.path().join("bmt.db")).unwrap();
        (dir, database)
    }
}
