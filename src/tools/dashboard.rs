//! Dashboard MCP Tools
//!
//! Everything the home screen shows for one user: the latest BMI, how it was
//! computed, the ideal weight range, recent weight and BMI history, and the
//! category reference table.

use serde::Serialize;

use super::calculator::{formula_breakdown, ideal_weight_response, FormulaBreakdown, IdealWeightResponse};
use super::{history_cutoff, normalize_user_id};
use crate::bmi::{ideal_weight_range, BmiCategory};
use crate::db::Database;
use crate::models::{BmiRecord, UserProfile, WeightEntry};

#[derive(Debug, Serialize)]
pub struct CurrentBmi {
    pub bmi: f64,
    pub bmi_display: String,
    pub category: BmiCategory,
    pub description: &'static str,
    pub calculated_at: String,
}

impl From<BmiRecord> for CurrentBmi {
    fn from(record: BmiRecord) -> Self {
        Self {
            bmi_display: format!("{:.1}", record.bmi),
            description: record.description(),
            bmi: record.bmi,
            category: record.category,
            calculated_at: record.calculated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryReference {
    pub category: BmiCategory,
    pub range: &'static str,
}

#[derive(Debug, Serialize)]
pub struct WeightHistoryResponse {
    pub user_id: String,
    pub days: i64,
    pub entries: Vec<WeightEntry>,
}

#[derive(Debug, Serialize)]
pub struct BmiHistoryResponse {
    pub user_id: String,
    pub days: i64,
    pub records: Vec<BmiRecord>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub user_id: String,
    pub has_profile: bool,
    pub profile: Option<UserProfile>,
    pub current_bmi: Option<CurrentBmi>,
    pub breakdown: Option<FormulaBreakdown>,
    pub ideal_weight: Option<IdealWeightResponse>,
    pub weight_history_days: i64,
    pub weight_history: Vec<WeightEntry>,
    pub bmi_history_days: i64,
    pub bmi_history: Vec<BmiRecord>,
    pub categories: Vec<CategoryReference>,
}

pub fn category_reference() -> Vec<CategoryReference> {
    BmiCategory::ALL
        .iter()
        .map(|category| CategoryReference {
            category: *category,
            range: category.range_label(),
        })
        .collect()
}

/// Build the dashboard for a user. A user without a profile gets empty sections.
pub fn get_dashboard(
    db: &Database,
    user_id: &str,
    weight_days: i64,
    bmi_days: i64,
) -> Result<DashboardResponse, String> {
    let user_id = normalize_user_id(user_id)?;
    let weight_since = history_cutoff(weight_days)?;
    let bmi_since = history_cutoff(bmi_days)?;

    let conn = db
        .get_conn()
        .map_err(|e| format!("Database error: {}", e))?;

    let profile = UserProfile::get_by_user(&conn, &user_id)
        .map_err(|e| format!("Database error: {}", e))?;
    let latest = BmiRecord::latest(&conn, &user_id)
        .map_err(|e| format!("Database error: {}", e))?;
    let weight_history = WeightEntry::list_since(&conn, &user_id, &weight_since)
        .map_err(|e| format!("Database error: {}", e))?;
    let bmi_history = BmiRecord::list_since(&conn, &user_id, &bmi_since)
        .map_err(|e| format!("Database error: {}", e))?;

    let breakdown = profile
        .as_ref()
        .map(|p| formula_breakdown(p.weight_value(), p.height_value()));
    let ideal_weight = profile.as_ref().map(|p| {
        ideal_weight_response(ideal_weight_range(p.height, p.height_unit), p.weight_unit)
    });

    Ok(DashboardResponse {
        has_profile: profile.is_some(),
        user_id,
        profile,
        current_bmi: latest.map(CurrentBmi::from),
        breakdown,
        ideal_weight,
        weight_history_days: weight_days,
        weight_history,
        bmi_history_days: bmi_days,
        bmi_history,
        categories: category_reference(),
    })
}

pub fn list_weight_history(
    db: &Database,
    user_id: &str,
    days: i64,
) -> Result<WeightHistoryResponse, String> {
    let user_id = normalize_user_id(user_id)?;
    let since = history_cutoff(days)?;

    let entries = db
        .with_conn(|conn| WeightEntry::list_since(conn, &user_id, &since))
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(WeightHistoryResponse {
        user_id,
        days,
        entries,
    })
}

pub fn list_bmi_history(
    db: &Database,
    user_id: &str,
    days: i64,
) -> Result<BmiHistoryResponse, String> {
    let user_id = normalize_user_id(user_id)?;
    let since = history_cutoff(days)?;

    let records = db
        .with_conn(|conn| BmiRecord::list_since(conn, &user_id, &since))
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(BmiHistoryResponse {
        user_id,
        days,
        records,
    })
}

pub fn get_latest_bmi(db: &Database, user_id: &str) -> Result<Option<CurrentBmi>, String> {
    let user_id = normalize_user_id(user_id)?;
    let latest = db
        .with_conn(|conn| BmiRecord::latest(conn, &user_id))
        .map_err(|e| format!("Database error: {}", e))?;

    Ok(latest.map(CurrentBmi::from))
}
