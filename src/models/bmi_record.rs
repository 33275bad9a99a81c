//! BMI record model
//!
//! One row per BMI calculation, so the dashboard can show a trend.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use super::profile::decode_column;
use crate::bmi::{BmiCategory, BmiResult};
use crate::db::{now_timestamp, DbError, DbResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiRecord {
    pub id: i64,
    pub user_id: String,
    pub bmi: f64,
    pub category: BmiCategory,
    pub calculated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiRecordCreate {
    pub user_id: String,
    pub bmi: f64,
    pub category: BmiCategory,
    /// Defaults to now
    pub calculated_at: Option<String>,
}

impl BmiRecordCreate {
    pub fn from_result(user_id: &str, result: &BmiResult) -> Self {
        Self {
            user_id: user_id.to_string(),
            bmi: result.value,
            category: result.category,
            calculated_at: None,
        }
    }
}

impl BmiRecord {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            bmi: row.get("bmi")?,
            category: decode_column(row, "category", BmiCategory::from_str)?,
            calculated_at: row.get("calculated_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &BmiRecordCreate) -> DbResult<Self> {
        let calculated_at = data.calculated_at.clone().unwrap_or_else(now_timestamp);

        conn.execute(
            "INSERT INTO bmi_records (user_id, bmi, category, calculated_at) VALUES (?1, ?2, ?3, ?4)",
            params![data.user_id, data.bmi, data.category.as_str(), calculated_at],
        )?;

        let id = conn.last_insert_rowid();
        let mut stmt = conn.prepare("SELECT * FROM bmi_records WHERE id = ?1")?;
        stmt.query_row([id], Self::from_row)
            .optional()?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Most recently calculated record for a user
    pub fn latest(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM bmi_records WHERE user_id = ?1 ORDER BY calculated_at DESC, id DESC LIMIT 1",
        )?;
        Ok(stmt.query_row([user_id], Self::from_row).optional()?)
    }

    /// Records calculated at or after `since`, oldest first
    pub fn list_since(conn: &Connection, user_id: &str, since: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM bmi_records WHERE user_id = ?1 AND calculated_at >= ?2 ORDER BY calculated_at ASC, id ASC",
        )?;
        let records = stmt
            .query_map(params![user_id, since], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM bmi_records", [], |row| row.get(0))?)
    }

    pub fn description(&self) -> &'static str {
        self.category.description()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    const USER: &str = "7f9c2ba4-e88f-4a7b-a1c3-0b2f5e6d9a10";

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn record_at(bmi: f64, calculated_at: &str) -> BmiRecordCreate {
        BmiRecordCreate {
            user_id: USER.to_string(),
            bmi,
            category: BmiCategory::from_bmi(bmi).unwrap(),
            calculated_at: Some(calculated_at.to_string()),
        }
    }

    #[test]
    fn test_latest_is_most_recent_calculation() {
        let conn = setup();
        assert!(BmiRecord::latest(&conn, USER).unwrap().is_none());

        BmiRecord::create(&conn, &record_at(26.1, "2026-01-18T09:00:00Z")).unwrap();
        BmiRecord::create(&conn, &record_at(24.2, "2026-01-20T09:00:00Z")).unwrap();
        BmiRecord::create(&conn, &record_at(25.3, "2026-01-19T09:00:00Z")).unwrap();

        let latest = BmiRecord::latest(&conn, USER).unwrap().unwrap();
        assert_eq!(latest.bmi, 24.2);
        assert_eq!(latest.category, BmiCategory::Normal);
        assert_eq!(latest.description(), BmiCategory::Normal.description());
    }

    #[test]
    fn test_list_since_window() {
        let conn = setup();
        BmiRecord::create(&conn, &record_at(31.0, "2025-11-01T09:00:00Z")).unwrap();
        BmiRecord::create(&conn, &record_at(29.0, "2026-01-02T09:00:00Z")).unwrap();
        BmiRecord::create(&conn, &record_at(28.0, "2026-01-01T09:00:00Z")).unwrap();

        let records = BmiRecord::list_since(&conn, USER, "2025-12-20T00:00:00Z").unwrap();
        let values: Vec<f64> = records.iter().map(|r| r.bmi).collect();
        assert_eq!(values, vec![28.0, 29.0]);
        assert_eq!(BmiRecord::count(&conn).unwrap(), 3);
    }

    #[test]
    fn test_from_result() {
        let result = BmiResult::from_value(22.0).unwrap();
        let data = BmiRecordCreate::from_result(USER, &result);
        assert_eq!(data.category, BmiCategory::Normal);
        assert!(data.calculated_at.is_none());
    }
}
