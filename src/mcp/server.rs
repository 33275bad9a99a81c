//! BMT MCP Server Implementation
//!
//! Implements the MCP server with all BMT tools.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::config::Config;
use crate::db::Database;
use crate::tools::status::StatusTracker;
use crate::tools::{account, calculator, dashboard, profile};

/// BMT MCP Service
#[derive(Clone)]
pub struct BmtService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    weight_history_days: i64,
    bmi_history_days: i64,
    tool_router: ToolRouter<BmtService>,
}

impl BmtService {
    pub fn new(config: &Config, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(
                config.database_path.clone(),
            ))),
            database,
            weight_history_days: config.weight_history_days,
            bmi_history_days: config.bmi_history_days,
            tool_router: Self::tool_router(),
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn invalid(message: String) -> McpError {
    McpError::invalid_params(message, None)
}

fn internal(message: String) -> McpError {
    McpError::internal_error(message, None)
}

// ============================================================================
// Calculator Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateBmiParams {
    /// Weight as typed by the user, e.g. "154"
    pub weight: String,
    /// "kg" or "lbs"
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
    /// Height as typed by the user, e.g. "69"
    pub height: String,
    /// "cm" or "inches"
    #[serde(default = "default_height_unit")]
    pub height_unit: String,
}

fn default_weight_unit() -> String { "kg".to_string() }
fn default_height_unit() -> String { "cm".to_string() }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdealWeightRangeParams {
    pub height: String,
    #[serde(default = "default_height_unit")]
    pub height_unit: String,
    /// Unit for the returned range (defaults to kg)
    pub weight_unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ConvertMeasurementParams {
    pub value: f64,
    /// One of: kg, lbs, cm, inches, m
    pub from_unit: String,
    /// One of: kg, lbs, cm, inches, m
    pub to_unit: String,
}

// ============================================================================
// Validation Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ValidateEmailParams {
    pub email: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ValidatePasswordParams {
    pub password: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ValidateSignUpParams {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ValidateSignInParams {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ValidatePasswordChangeParams {
    pub new_password: String,
    pub confirm_password: String,
}

// ============================================================================
// Profile Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SaveProfileParams {
    /// UUID from the sign-in provider
    pub user_id: String,
    pub weight: String,
    #[serde(default = "default_weight_unit")]
    pub weight_unit: String,
    pub height: String,
    #[serde(default = "default_height_unit")]
    pub height_unit: String,
    /// Male, Female or Other (defaults to Male)
    pub gender: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    pub user_id: String,
    /// New weight in the profile's stored unit
    pub weight: Option<String>,
    /// New height in the profile's stored unit
    pub height: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UserIdParams {
    pub user_id: String,
}

// ============================================================================
// Dashboard Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDashboardParams {
    pub user_id: String,
    /// Weight history window in days (server default: 7)
    pub weight_days: Option<i64>,
    /// BMI history window in days (server default: 30)
    pub bmi_days: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListHistoryParams {
    pub user_id: String,
    /// Window in days; defaults to the dashboard window for this history
    pub days: Option<i64>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl BmtService {
    // --- Status ---

    #[tool(description = "Get the current status of the BMT service including build info, database status, record counts, and process information")]
    async fn bmt_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.database);
        to_json(&status)
    }

    #[tool(description = "Get instructions for recording body metrics and reading BMI results. Call this when starting a session or when unsure how to use the BMT tools.")]
    fn bmi_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::BMI_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(BMI_INSTRUCTIONS)]))
    }

    // --- Calculator ---

    #[tool(description = "Validate weight and height text and calculate BMI, category, formula breakdown and ideal weight range. Does not save anything.")]
    fn calculate_bmi(&self, Parameters(p): Parameters<CalculateBmiParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::calculate_bmi(&p.weight, &p.weight_unit, &p.height, &p.height_unit)
            .map_err(invalid)?;
        to_json(&result)
    }

    #[tool(description = "Get the weight range for a normal BMI (18.5 - 24.9) at a given height")]
    fn ideal_weight_range(&self, Parameters(p): Parameters<IdealWeightRangeParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::ideal_weight_range(&p.height, &p.height_unit, p.weight_unit.as_deref())
            .map_err(invalid)?;
        to_json(&result)
    }

    #[tool(description = "Convert a weight between kg and lbs, or a length between cm, inches and m")]
    fn convert_measurement(&self, Parameters(p): Parameters<ConvertMeasurementParams>) -> Result<CallToolResult, McpError> {
        let result = calculator::convert_measurement(p.value, &p.from_unit, &p.to_unit)
            .map_err(invalid)?;
        to_json(&result)
    }

    // --- Validation ---

    #[tool(description = "Check an email address. Returns is_valid and the message to show when invalid.")]
    fn validate_email(&self, Parameters(p): Parameters<ValidateEmailParams>) -> Result<CallToolResult, McpError> {
        to_json(&account::validate_email(&p.email))
    }

    #[tool(description = "Check password strength: at least 8 characters with a letter and a number")]
    fn validate_password(&self, Parameters(p): Parameters<ValidatePasswordParams>) -> Result<CallToolResult, McpError> {
        to_json(&account::validate_password(&p.password))
    }

    #[tool(description = "Check a sign-up form: email, password strength, then password confirmation")]
    fn validate_sign_up(&self, Parameters(p): Parameters<ValidateSignUpParams>) -> Result<CallToolResult, McpError> {
        to_json(&account::validate_sign_up(&p.email, &p.password, &p.confirm_password))
    }

    #[tool(description = "Check a sign-in form: email, then that a password was entered")]
    fn validate_sign_in(&self, Parameters(p): Parameters<ValidateSignInParams>) -> Result<CallToolResult, McpError> {
        to_json(&account::validate_sign_in(&p.email, &p.password))
    }

    #[tool(description = "Check a password reset form (email only)")]
    fn validate_password_reset(&self, Parameters(p): Parameters<ValidateEmailParams>) -> Result<CallToolResult, McpError> {
        to_json(&account::validate_password_reset(&p.email))
    }

    #[tool(description = "Check a change password form: new password strength, then confirmation")]
    fn validate_password_change(&self, Parameters(p): Parameters<ValidatePasswordChangeParams>) -> Result<CallToolResult, McpError> {
        to_json(&account::validate_password_change(&p.new_password, &p.confirm_password))
    }

    // --- Profile ---

    #[tool(description = "Create or replace a user's profile from weight/height text. Also records a weight entry and a BMI record.")]
    fn save_profile(&self, Parameters(p): Parameters<SaveProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profile::save_profile(
            &self.database,
            &p.user_id,
            &p.weight,
            &p.weight_unit,
            &p.height,
            &p.height_unit,
            p.gender.as_deref(),
        )
        .map_err(internal)?;
        to_json(&result)
    }

    #[tool(description = "Update weight, height or gender of an existing profile. Values use the units stored on the profile.")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let result = profile::update_profile(
            &self.database,
            &p.user_id,
            p.weight.as_deref(),
            p.height.as_deref(),
            p.gender.as_deref(),
        )
        .map_err(internal)?;
        to_json(&result)
    }

    #[tool(description = "Get a user's stored profile with the BMI formula breakdown")]
    fn get_profile(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = profile::get_profile(&self.database, &p.user_id).map_err(internal)?;
        let json = match result {
            Some(detail) => serde_json::to_string_pretty(&detail),
            None => Ok(format!(r#"{{"error": "Profile not found", "user_id": "{}"}}"#, p.user_id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    // --- Dashboard ---

    #[tool(description = "Get the dashboard for a user: latest BMI and description, formula breakdown, ideal weight range, weight and BMI history, and the category table")]
    fn get_dashboard(&self, Parameters(p): Parameters<GetDashboardParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::get_dashboard(
            &self.database,
            &p.user_id,
            p.weight_days.unwrap_or(self.weight_history_days),
            p.bmi_days.unwrap_or(self.bmi_history_days),
        )
        .map_err(internal)?;
        to_json(&result)
    }

    #[tool(description = "List a user's weight entries from the last N days, oldest first")]
    fn list_weight_history(&self, Parameters(p): Parameters<ListHistoryParams>) -> Result<CallToolResult, McpError> {
        let days = p.days.unwrap_or(self.weight_history_days);
        let result = dashboard::list_weight_history(&self.database, &p.user_id, days)
            .map_err(internal)?;
        to_json(&result)
    }

    #[tool(description = "List a user's BMI records from the last N days, oldest first")]
    fn list_bmi_history(&self, Parameters(p): Parameters<ListHistoryParams>) -> Result<CallToolResult, McpError> {
        let days = p.days.unwrap_or(self.bmi_history_days);
        let result = dashboard::list_bmi_history(&self.database, &p.user_id, days)
            .map_err(internal)?;
        to_json(&result)
    }

    #[tool(description = "Get a user's most recent BMI with its category and description")]
    fn get_latest_bmi(&self, Parameters(p): Parameters<UserIdParams>) -> Result<CallToolResult, McpError> {
        let result = dashboard::get_latest_bmi(&self.database, &p.user_id).map_err(internal)?;
        let json = match result {
            Some(bmi) => serde_json::to_string_pretty(&bmi),
            None => Ok(format!(r#"{{"error": "No BMI recorded", "user_id": "{}"}}"#, p.user_id)),
        }.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        Ok(CallToolResult::success(vec![Content::text(json)]))
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for BmtService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "bmt".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Body Metrics Tracker".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Body Metrics Tracker (BMT) - BMI calculation and weight tracking. \
                 IMPORTANT: Call bmi_instructions for input rules and workflows. \
                 Calculator: calculate_bmi, ideal_weight_range, convert_measurement. \
                 Forms: validate_email, validate_password, validate_sign_up, validate_sign_in, \
                 validate_password_reset, validate_password_change. \
                 Profile: save_profile (replaces units), update_profile (keeps units), get_profile. \
                 Dashboard: get_dashboard, list_weight_history, list_bmi_history, get_latest_bmi."
                    .into(),
            ),
        }
    }
}
