//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        let tx = conn.unchecked_transaction()?;
        migrate_v1(&tx)?;
        tx.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tx.commit()?;
    }

    Ok(())
}

/// Migration v1: profiles, weight history and BMI records
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USER PROFILES
        -- One row per user id handed over by the auth provider
        -- ============================================
        CREATE TABLE user_profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL UNIQUE,        -- UUID string
            weight REAL NOT NULL,                -- in weight_unit
            height REAL NOT NULL,                -- in height_unit
            gender TEXT NOT NULL CHECK(gender IN ('Male', 'Female', 'Other')),
            weight_unit TEXT NOT NULL DEFAULT 'kg' CHECK(weight_unit IN ('kg', 'lbs')),
            height_unit TEXT NOT NULL DEFAULT 'cm' CHECK(height_unit IN ('cm', 'inches')),
            created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now')),
            updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        -- ============================================
        -- WEIGHT HISTORY
        -- One entry per saved weight
        -- ============================================
        CREATE TABLE weight_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            weight REAL NOT NULL,
            unit TEXT NOT NULL CHECK(unit IN ('kg', 'lbs')),
            recorded_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        CREATE INDEX idx_weight_history_user_time ON weight_history(user_id, recorded_at);

        -- ============================================
        -- BMI RECORDS
        -- One record per BMI calculation
        -- ============================================
        CREATE TABLE bmi_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            bmi REAL NOT NULL,
            category TEXT NOT NULL CHECK(category IN ('Underweight', 'Normal', 'Overweight', 'Obese')),
            calculated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        );

        CREATE INDEX idx_bmi_records_user_time ON bmi_records(user_id, calculated_at);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version (0 before any migration ran)
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_database_needs_migration() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
        assert!(needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_run_migrations_twice() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_check_constraints() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let bad_unit = conn.execute(
            "INSERT INTO weight_history (user_id, weight, unit) VALUES ('u', 70, 'stone')",
            [],
        );
        assert!(bad_unit.is_err());

        let bad_category = conn.execute(
            "INSERT INTO bmi_records (user_id, bmi, category) VALUES ('u', 22, 'Unknown')",
            [],
        );
        assert!(bad_category.is_err());
    }
}
