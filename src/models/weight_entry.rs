//! Weight entry model
//!
//! Time series of weights a user has saved.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use super::profile::decode_column;
use crate::bmi::WeightUnit;
use crate::db::{now_timestamp, DbError, DbResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: i64,
    pub user_id: String,
    pub weight: f64,
    pub unit: WeightUnit,
    pub recorded_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntryCreate {
    pub user_id: String,
    pub weight: f64,
    pub unit: WeightUnit,
    /// Defaults to now
    pub recorded_at: Option<String>,
}

impl WeightEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            weight: row.get("weight")?,
            unit: decode_column(row, "unit", WeightUnit::from_str)?,
            recorded_at: row.get("recorded_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &WeightEntryCreate) -> DbResult<Self> {
        let recorded_at = data.recorded_at.clone().unwrap_or_else(now_timestamp);

        conn.execute(
            "INSERT INTO weight_history (user_id, weight, unit, recorded_at) VALUES (?1, ?2, ?3, ?4)",
            params![data.user_id, data.weight, data.unit.as_str(), recorded_at],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM weight_history WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries recorded at or after `since`, oldest first
    pub fn list_since(conn: &Connection, user_id: &str, since: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM weight_history WHERE user_id = ?1 AND recorded_at >= ?2 ORDER BY recorded_at ASC, id ASC",
        )?;
        let entries = stmt
            .query_map(params![user_id, since], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM weight_history", [], |row| row.get(0))?)
    }

    /// e.g. "70.5 kg"
    pub fn format_value(&self) -> String {
        format!("{:.1} {}", self.weight, self.unit.as_str())
    }
}
