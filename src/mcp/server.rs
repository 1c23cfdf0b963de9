//! LumenDose MCP Server Implementation
//!
//! Implements the MCP server with all LumenDose tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::tools::status::StatusTracker;
use crate::tools::{drinks, impact, progress, quick_adds};

/// LumenDose MCP Service
#[derive(Clone)]
pub struct LumenDoseService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    tool_router: ToolRouter<LumenDoseService>,
}

impl LumenDoseService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn not_found(what: &str, id: i64) -> CallToolResult {
    CallToolResult::success(vec![Content::text(format!(
        r#"{{"error": "{} not found", "id": {}}}"#,
        what, id
    ))])
}

// ============================================================================
// Drink Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogDrinkParams {
    /// Kind of drink, e.g. "beer", "wine", "spirits"
    pub drink_type: String,
    /// Amount poured, in `unit`
    pub volume: f64,
    /// Volume unit: ml (default), cl, l, fl_oz, uk_fl_oz, pint, us_pint, can, shot, or "bottle (750ml)"
    pub unit: Option<String>,
    /// Alcohol by volume, 0-100
    pub abv_percent: f64,
    /// When the drink was had (RFC 3339). Defaults to now.
    pub timestamp: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogQuickAddParams {
    /// Built-in preset key (pint_of_beer, large_wine, shot) or a custom quick add id
    pub preset: String,
    /// When the drink was had (RFC 3339). Defaults to now.
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogScannedDrinkParams {
    /// Raw reply from the label recognizer containing {"type", "volume", "abv"}
    pub scan_text: String,
    /// When the drink was had (RFC 3339). Defaults to now.
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct IdParams {
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDrinksParams {
    /// Maximum results (default 50, max 500)
    #[serde(default = "default_list_limit")]
    pub limit: i64,
}

fn default_list_limit() -> i64 { 50 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateRangeParams {
    /// First date (YYYY-MM-DD, inclusive)
    pub start_date: String,
    /// Last date (YYYY-MM-DD, inclusive)
    pub end_date: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateDrinkParams {
    pub id: i64,
    pub drink_type: Option<String>,
    pub volume: Option<f64>,
    /// Unit for `volume` (default ml); only valid together with `volume`
    pub unit: Option<String>,
    pub abv_percent: Option<f64>,
    pub timestamp: Option<String>,
    /// New notes; an empty string clears them
    pub notes: Option<String>,
}

// ============================================================================
// Quick Add Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddQuickAddParams {
    /// Display label, e.g. "Hazy IPA"
    pub label: String,
    pub drink_type: String,
    pub volume: f64,
    /// Unit for `volume` (default ml)
    pub unit: Option<String>,
    pub abv_percent: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateQuickAddParams {
    pub id: i64,
    pub label: Option<String>,
    pub drink_type: Option<String>,
    pub volume: Option<f64>,
    pub unit: Option<String>,
    pub abv_percent: Option<f64>,
}

// ============================================================================
// Analysis Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeBrainImpactParams {
    /// Day to analyze (YYYY-MM-DD, UTC). Defaults to today.
    pub date: Option<String>,
    /// Language for labels and descriptions (default "en")
    pub language: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AnalyzeBrainImpactRangeParams {
    /// Window start (RFC 3339, inclusive)
    pub start: String,
    /// Window end (RFC 3339, exclusive)
    pub end: String,
    pub language: Option<String>,
}

// ============================================================================
// Progress Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetDailyGoalParams {
    /// Daily limit in grams of pure alcohol
    pub grams: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DateParams {
    /// Date (YYYY-MM-DD). Defaults to today.
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct WeeklyTotalsParams {
    /// Last day of the week (YYYY-MM-DD). Defaults to today.
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListAchievementsParams {
    pub language: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl LumenDoseService {
    // --- Status ---

    #[tool(description = "Get the current status of the LumenDose service including build info, database status, and process information")]
    async fn lumendose_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status();
        json_result(&status)
    }

    #[tool(description = "Get instructions for logging drinks and reading brain impact results. Call this when starting a session or when unsure how to use the drink tools.")]
    fn drink_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::DRINK_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(DRINK_INSTRUCTIONS)]))
    }

    // --- Drinks ---

    #[tool(description = "Log a drink. Alcohol grams are derived from volume and ABV.")]
    fn log_drink(&self, Parameters(p): Parameters<LogDrinkParams>) -> Result<CallToolResult, McpError> {
        let result = drinks::log_drink(
            &self.database,
            &p.drink_type,
            p.volume,
            p.unit.as_deref(),
            p.abv_percent,
            p.timestamp.as_deref(),
            p.notes.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log a drink from a built-in preset (pint_of_beer, large_wine, shot) or a custom quick add id")]
    fn log_quick_add(&self, Parameters(p): Parameters<LogQuickAddParams>) -> Result<CallToolResult, McpError> {
        let result = quick_adds::log_quick_add(&self.database, &p.preset, p.timestamp.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log a drink from a label recognizer reply containing a JSON object with type, volume (ml) and abv")]
    fn log_scanned_drink(&self, Parameters(p): Parameters<LogScannedDrinkParams>) -> Result<CallToolResult, McpError> {
        let result = drinks::log_scanned_drink(&self.database, &p.scan_text, p.timestamp.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get full details for a logged drink")]
    fn get_drink(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = drinks::get_drink(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(drink) => json_result(&drink),
            None => Ok(not_found("Drink", p.id)),
        }
    }

    #[tool(description = "List the most recently logged drinks, newest first")]
    fn list_drinks(&self, Parameters(p): Parameters<ListDrinksParams>) -> Result<CallToolResult, McpError> {
        let result = drinks::list_drinks(&self.database, p.limit).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List drinks logged between two dates (YYYY-MM-DD, inclusive)")]
    fn list_drinks_by_date_range(&self, Parameters(p): Parameters<DateRangeParams>) -> Result<CallToolResult, McpError> {
        let result = drinks::list_drinks_by_date_range(&self.database, &p.start_date, &p.end_date)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a logged drink. Alcohol grams are re-derived when volume or ABV change.")]
    fn update_drink(&self, Parameters(p): Parameters<UpdateDrinkParams>) -> Result<CallToolResult, McpError> {
        let result = drinks::update_drink(
            &self.database,
            p.id,
            p.drink_type.as_deref(),
            p.volume,
            p.unit.as_deref(),
            p.abv_percent,
            p.timestamp.as_deref(),
            p.notes.as_deref(),
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(drink) => json_result(&drink),
            None => Ok(not_found("Drink", p.id)),
        }
    }

    #[tool(description = "Delete a logged drink")]
    fn delete_drink(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = drinks::delete_drink(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Quick Adds ---

    #[tool(description = "List built-in and custom quick add presets")]
    fn list_quick_adds(&self) -> Result<CallToolResult, McpError> {
        let result = quick_adds::list_quick_adds(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Create a custom quick add preset")]
    fn add_quick_add(&self, Parameters(p): Parameters<AddQuickAddParams>) -> Result<CallToolResult, McpError> {
        let result = quick_adds::add_quick_add(
            &self.database,
            &p.label,
            &p.drink_type,
            p.volume,
            p.unit.as_deref(),
            p.abv_percent,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update a custom quick add preset")]
    fn update_quick_add(&self, Parameters(p): Parameters<UpdateQuickAddParams>) -> Result<CallToolResult, McpError> {
        let result = quick_adds::update_quick_add(
            &self.database,
            p.id,
            p.label.as_deref(),
            p.drink_type.as_deref(),
            p.volume,
            p.unit.as_deref(),
            p.abv_percent,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(quick_add) => json_result(&quick_add),
            None => Ok(not_found("Quick add", p.id)),
        }
    }

    #[tool(description = "Delete a custom quick add preset")]
    fn delete_quick_add(&self, Parameters(p): Parameters<IdParams>) -> Result<CallToolResult, McpError> {
        let result = quick_adds::delete_quick_add(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Brain Impact ---

    #[tool(description = "Estimate per-region brain impact (0-5, low/moderate/high) from all drinks logged on a day. Illustrative only, not medical advice.")]
    fn analyze_brain_impact(&self, Parameters(p): Parameters<AnalyzeBrainImpactParams>) -> Result<CallToolResult, McpError> {
        let result = impact::analyze_brain_impact(&self.database, p.date.as_deref(), p.language.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Estimate per-region brain impact from all drinks logged in a [start, end) window")]
    fn analyze_brain_impact_range(&self, Parameters(p): Parameters<AnalyzeBrainImpactRangeParams>) -> Result<CallToolResult, McpError> {
        let result = impact::analyze_brain_impact_range(&self.database, &p.start, &p.end, p.language.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Goals & Progress ---

    #[tool(description = "Set a daily alcohol limit in grams")]
    fn set_daily_goal(&self, Parameters(p): Parameters<SetDailyGoalParams>) -> Result<CallToolResult, McpError> {
        let result = progress::set_daily_goal(&self.database, p.grams).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get the daily alcohol limit, if one is set")]
    fn get_daily_goal(&self) -> Result<CallToolResult, McpError> {
        let result = progress::get_daily_goal(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Remove the daily alcohol limit")]
    fn clear_daily_goal(&self) -> Result<CallToolResult, McpError> {
        let result = progress::clear_daily_goal(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Total grams and drink count for a day, compared against the daily goal")]
    fn daily_summary(&self, Parameters(p): Parameters<DateParams>) -> Result<CallToolResult, McpError> {
        let result = progress::daily_summary(&self.database, p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Grams of alcohol per day for the seven days ending on end_date")]
    fn weekly_totals(&self, Parameters(p): Parameters<WeeklyTotalsParams>) -> Result<CallToolResult, McpError> {
        let result = progress::weekly_totals(&self.database, p.end_date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List earned achievements and the current logging streak")]
    fn list_achievements(&self, Parameters(p): Parameters<ListAchievementsParams>) -> Result<CallToolResult, McpError> {
        let result = progress::get_achievements(&self.database, p.language.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for LumenDoseService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "lumendose".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("LumenDose".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "LumenDose - Alcohol intake tracking with an illustrative brain impact model. \
                 Not medical advice. \
                 IMPORTANT: Call drink_instructions before logging drinks. \
                 Drinks: log_drink, log_quick_add, log_scanned_drink, get_drink, list_drinks, \
                 list_drinks_by_date_range, update_drink, delete_drink. \
                 Quick adds: list_quick_adds, add_quick_add, update_quick_add, delete_quick_add. \
                 Analysis: analyze_brain_impact (one day), analyze_brain_impact_range (any window). \
                 Progress: set/get/clear_daily_goal, daily_summary, weekly_totals, list_achievements."
                    .into(),
            ),
        }
    }
}
