//! Profile MCP Tools
//!
//! Save and update a user's body metrics. Every save also appends a weight
//! entry and a BMI record so the dashboard history stays current.

use rusqlite::Connection;
use serde::Serialize;
use tracing::{info, warn};

use super::calculator::{formula_breakdown, FormulaBreakdown};
use super::{normalize_user_id, parse_height_unit, parse_weight_unit};
use crate::bmi::{BmiResult, HeightValue, WeightValue};
use crate::db::{Database, DbResult};
use crate::models::{
    BmiRecord, BmiRecordCreate, Gender, UserProfile, UserProfileCreate, UserProfileUpdate,
    WeightEntry, WeightEntryCreate,
};
use crate::validation::{parse_height, parse_weight};

/// Response for save_profile and update_profile
#[derive(Debug, Serialize)]
pub struct SaveProfileResponse {
    pub success: bool,
    pub message: String,
    pub profile: UserProfile,
    pub bmi: BmiRecord,
    pub description: &'static str,
    pub weight_entry: WeightEntry,
}

/// Response for get_profile
#[derive(Debug, Serialize)]
pub struct ProfileDetail {
    pub profile: UserProfile,
    pub bmi: Option<f64>,
    pub breakdown: FormulaBreakdown,
}

fn parse_gender(gender: &str) -> Result<Gender, String> {
    Gender::from_str(gender)
        .ok_or_else(|| format!("Invalid gender: '{}'. Valid values: Male, Female, Other", gender))
}

fn compute(weight: WeightValue, height: HeightValue) -> Result<BmiResult, String> {
    BmiResult::calculate(weight, height)
        .ok_or_else(|| "BMI could not be calculated from the given values".to_string())
}

/// Append the weight entry and BMI record that go with a profile change
fn record_measurement(
    conn: &Connection,
    user_id: &str,
    weight: WeightValue,
    result: &BmiResult,
) -> DbResult<(WeightEntry, BmiRecord)> {
    let entry = WeightEntry::create(
        conn,
        &WeightEntryCreate {
            user_id: user_id.to_string(),
            weight: weight.magnitude,
            unit: weight.unit,
            recorded_at: None,
        },
    )?;
    let record = BmiRecord::create(conn, &BmiRecordCreate::from_result(user_id, result))?;
    Ok((entry, record))
}

/// Create or replace a profile from raw form input
pub fn save_profile(
    db: &Database,
    user_id: &str,
    weight: &str,
    weight_unit: &str,
    height: &str,
    height_unit: &str,
    gender: Option<&str>,
) -> Result<SaveProfileResponse, String> {
    let user_id = normalize_user_id(user_id)?;
    let weight_unit = parse_weight_unit(weight_unit)?;
    let height_unit = parse_height_unit(height_unit)?;
    let gender = gender.map(parse_gender).transpose()?.unwrap_or_default();

    let parsed = parse_weight(weight, weight_unit)
        .and_then(|w| parse_height(height, height_unit).map(|h| (w, h)));
    let (weight, height) = match parsed {
        Ok(values) => values,
        Err(message) => {
            warn!(user_id = %user_id, reason = message, "Profile rejected");
            return Err(message.to_string());
        }
    };
    let result = compute(weight, height)?;

    let (profile, entry, record) = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let profile = UserProfile::upsert(
                &tx,
                &UserProfileCreate {
                    user_id: user_id.clone(),
                    weight: weight.magnitude,
                    height: height.magnitude,
                    gender,
                    weight_unit,
                    height_unit,
                },
            )?;
            let (entry, record) = record_measurement(&tx, &user_id, weight, &result)?;
            tx.commit()?;
            Ok((profile, entry, record))
        })
        .map_err(|e| format!("Database error: {}", e))?;

    info!(
        user_id = %user_id,
        bmi = result.value,
        category = result.category.as_str(),
        "Profile saved"
    );

    Ok(SaveProfileResponse {
        success: true,
        message: "Profile saved successfully!".to_string(),
        profile,
        description: result.description,
        bmi: record,
        weight_entry: entry,
    })
}

/// Update weight, height or gender of an existing profile.
///
/// Values are read in the units stored on the profile; units never change here.
pub fn update_profile(
    db: &Database,
    user_id: &str,
    weight: Option<&str>,
    height: Option<&str>,
    gender: Option<&str>,
) -> Result<SaveProfileResponse, String> {
    let user_id = normalize_user_id(user_id)?;
    let gender = gender.map(parse_gender).transpose()?;

    let mut conn = db
        .get_conn()
        .map_err(|e| format!("Database error: {}", e))?;

    let existing = UserProfile::get_by_user(&conn, &user_id)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("No profile found for user {}", user_id))?;

    let new_weight = match weight {
        Some(text) => parse_weight(text, existing.weight_unit)?,
        None => existing.weight_value(),
    };
    let new_height = match height {
        Some(text) => parse_height(text, existing.height_unit)?,
        None => existing.height_value(),
    };
    let result = compute(new_weight, new_height)?;

    let update = UserProfileUpdate {
        weight: weight.map(|_| new_weight.magnitude),
        height: height.map(|_| new_height.magnitude),
        gender,
    };

    let tx = conn
        .transaction()
        .map_err(|e| format!("Database error: {}", e))?;
    let profile = UserProfile::update(&tx, &user_id, &update)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("No profile found for user {}", user_id))?;
    let (entry, record) = record_measurement(&tx, &user_id, new_weight, &result)
        .map_err(|e| format!("Database error: {}", e))?;
    tx.commit().map_err(|e| format!("Database error: {}", e))?;

    info!(user_id = %user_id, bmi = result.value, "Profile updated");

    Ok(SaveProfileResponse {
        success: true,
        message: "Profile updated successfully!".to_string(),
        profile,
        description: result.description,
        bmi: record,
        weight_entry: entry,
    })
}

/// Stored profile with BMI derived from its current values
pub fn get_profile(db: &Database, user_id: &str) -> Result<Option<ProfileDetail>, String> {
    let user_id = normalize_user_id(user_id)?;
    let profile = db
        .with_conn(|conn| UserProfile::get_by_user(conn, &user_id))
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(profile.map(|profile| {
        let weight = profile.weight_value();
        let height = profile.height_value();
        ProfileDetail {
            bmi: BmiResult::calculate(weight, height).map(|r| r.value),
            breakdown: formula_breakdown(weight, height),
            profile,
        }
    }))
}
