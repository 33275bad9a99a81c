//! User profile model
//!
//! Body metrics for one user: latest weight and height, the units they were
//! entered in, and gender.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::bmi::{HeightUnit, HeightValue, WeightUnit, WeightValue};
use crate::db::{now_timestamp, DbError, DbResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Gender::Male),
            "female" | "f" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

/// Stored user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub user_id: String,
    pub weight: f64,
    pub height: f64,
    pub gender: Gender,
    pub weight_unit: WeightUnit,
    pub height_unit: HeightUnit,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating or replacing a profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileCreate {
    pub user_id: String,
    pub weight: f64,
    pub height: f64,
    pub gender: Gender,
    pub weight_unit: WeightUnit,
    pub height_unit: HeightUnit,
}

/// Data for updating a profile. Units are never changed by an update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfileUpdate {
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub gender: Option<Gender>,
}

impl UserProfile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            weight: row.get("weight")?,
            height: row.get("height")?,
            gender: decode_column(row, "gender", Gender::from_str)?,
            weight_unit: decode_column(row, "weight_unit", WeightUnit::from_str)?,
            height_unit: decode_column(row, "height_unit", HeightUnit::from_str)?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Get the profile for a user
    pub fn get_by_user(conn: &Connection, user_id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profiles WHERE user_id = ?1")?;
        Ok(stmt.query_row([user_id], Self::from_row).optional()?)
    }

    /// Insert a profile, or replace every field of an existing one
    pub fn upsert(conn: &Connection, data: &UserProfileCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO user_profiles (user_id, weight, height, gender, weight_unit, height_unit)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(user_id) DO UPDATE SET
                weight = excluded.weight,
                height = excluded.height,
                gender = excluded.gender,
                weight_unit = excluded.weight_unit,
                height_unit = excluded.height_unit,
                updated_at = ?7
            "#,
            params![
                data.user_id,
                data.weight,
                data.height,
                data.gender.as_str(),
                data.weight_unit.as_str(),
                data.height_unit.as_str(),
                now_timestamp(),
            ],
        )?;

        Self::get_by_user(conn, &data.user_id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Update weight, height or gender. Returns `None` if the user has no profile.
    pub fn update(
        conn: &Connection,
        user_id: &str,
        data: &UserProfileUpdate,
    ) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(weight) = data.weight {
            updates.push(format!("weight = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(weight));
        }
        if let Some(height) = data.height {
            updates.push(format!("height = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(height));
        }
        if let Some(gender) = data.gender {
            updates.push(format!("gender = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(gender.as_str()));
        }

        if updates.is_empty() {
            return Self::get_by_user(conn, user_id);
        }

        updates.push(format!("updated_at = ?{}", params_vec.len() + 1));
        params_vec.push(Box::new(now_timestamp()));

        let sql = format!(
            "UPDATE user_profiles SET {} WHERE user_id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );
        params_vec.push(Box::new(user_id.to_string()));

        let params_refs: Vec<&dyn rusqlite::ToSql> =
            params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_user(conn, user_id)
    }

    /// All profiles, oldest first
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM user_profiles ORDER BY id")?;
        let profiles = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(profiles)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM user_profiles", [], |row| row.get(0))?)
    }

    pub fn weight_value(&self) -> WeightValue {
        WeightValue::new(self.weight, self.weight_unit)
    }

    pub fn height_value(&self) -> HeightValue {
        HeightValue::new(self.height, self.height_unit)
    }
}

/// Read a TEXT column and decode it, reporting unknown values as a conversion error
pub(crate) fn decode_column<T>(
    row: &Row,
    column: &'static str,
    decode: fn(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(column)?;
    decode(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(DbError::InvalidData { column, value: raw }),
        )
    })
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

    fn sample() -> UserProfileCreate {
        UserProfileCreate {
            user_id: USER.to_string(),
            weight: 70.0,
            height: 175.0,
            gender: Gender::Female,
            weight_unit: WeightUnit::Kilograms,
            height_unit: HeightUnit::Centimeters,
        }
    }

    #[test]
    fn test_upsert_creates_then_replaces() {
        let conn = setup();
        let created = UserProfile::upsert(&conn, &sample()).unwrap();
        assert_eq!(created.user_id, USER);
        assert_eq!(created.gender, Gender::Female);

        let replaced = UserProfile::upsert(
            &conn,
            &UserProfileCreate {
                weight: 160.0,
                weight_unit: WeightUnit::Pounds,
                height: 68.0,
                height_unit: HeightUnit::Inches,
                ..sample()
            },
        )
        .unwrap();
        assert_eq!(replaced.id, created.id);
        assert_eq!(replaced.weight_unit, WeightUnit::Pounds);
        assert_eq!(replaced.height_unit, HeightUnit::Inches);
        assert_eq!(UserProfile::count(&conn).unwrap(), 1);
    }

    #[test]
    fn test_get_missing_profile() {
        let conn = setup();
        assert!(UserProfile::get_by_user(&conn, USER).unwrap().is_none());
    }

    #[test]
    fn test_update_keeps_units() {
        let conn = setup();
        UserProfile::upsert(&conn, &sample()).unwrap();

        let updated = UserProfile::update(
            &conn,
            USER,
            &UserProfileUpdate {
                weight: Some(72.5),
                height: None,
                gender: Some(Gender::Other),
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(updated.weight, 72.5);
        assert_eq!(updated.height, 175.0);
        assert_eq!(updated.gender, Gender::Other);
        assert_eq!(updated.weight_unit, WeightUnit::Kilograms);
    }

    #[test]
    fn test_update_missing_profile() {
        let conn = setup();
        let result = UserProfile::update(
            &conn,
            USER,
            &UserProfileUpdate {
                weight: Some(80.0),
                ..Default::default()
            },
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_value_accessors() {
        let conn = setup();
        let profile = UserProfile::upsert(&conn, &sample()).unwrap();
        assert_eq!(profile.weight_value().to_kilograms(), 70.0);
        assert!((profile.height_value().to_meters() - 1.75).abs() < 1e-12);
    }

    #[test]
    fn test_gender_parsing() {
        assert_eq!(Gender::from_str("female"), Some(Gender::Female));
        assert_eq!(Gender::from_str("Other"), Some(Gender::Other));
        assert_eq!(Gender::from_str("unknown"), None);
        assert_eq!(Gender::Male.as_str(), "Male");
    }
}
