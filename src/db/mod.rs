//! Database module
//!
//! Handles SQLite connection and migrations.

pub mod connection;
pub mod migrations;

pub use connection::{Database, DbError, DbResult};

/// Timestamp format used for every stored time column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Current UTC time in [`TIMESTAMP_FORMAT`]
pub fn now_timestamp() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Cutoff timestamp `days` before now, for history windows.
///
/// `None` when the window reaches outside chrono's representable range.
pub fn days_ago_timestamp(days: i64) -> Option<String> {
    let window = chrono::TimeDelta::try_days(days)?;
    chrono::Utc::now()
        .checked_sub_signed(window)
        .map(|cutoff| cutoff.format(TIMESTAMP_FORMAT).to_string())
}
