//! Brain Impact MCP Tools
//!
//! Loads drinks for a window and runs the impact analyzer over them.

use chrono::Utc;
use serde::Serialize;

use crate::analysis::{
    ImpactAnalyzer, MessageCatalog, RegionTable, SessionAssessment, DEFAULT_LANGUAGE,
};
use crate::db::Database;
use crate::models::{day_bounds, normalize_timestamp, parse_date, Drink};

pub const DISCLAIMER: &str =
    "LumenDose is an educational tool, not medical advice. Drink responsibly.";

#[derive(Debug, Serialize)]
pub struct BrainImpactResponse {
    /// Start of the analyzed window (inclusive)
    pub window_start: String,
    /// End of the analyzed window (exclusive)
    pub window_end: String,
    pub language: String,
    #[serde(flatten)]
    pub assessment: SessionAssessment,
    pub disclaimer: &'static str,
}

fn catalog(language: Option<&str>) -> MessageCatalog {
    match language {
        Some(lang) => MessageCatalog::new(lang),
        None => MessageCatalog::english(),
    }
}

/// Language the catalog actually resolves in, after fallback
fn resolved_language(catalog: &MessageCatalog) -> String {
    if catalog.supports(catalog.language()) {
        catalog.language().to_string()
    } else {
        DEFAULT_LANGUAGE.to_string()
    }
}

fn assess_window(
    db: &Database,
    start: String,
    end: String,
    language: Option<&str>,
) -> Result<BrainImpactResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let drinks = Drink::list_between(&conn, &start, &end)
        .map_err(|e| format!("Failed to load drinks: {}", e))?;

    let catalog = catalog(language);
    let language = resolved_language(&catalog);
    let analyzer = ImpactAnalyzer::new(RegionTable::standard(), catalog);
    let assessment = analyzer.assess(&drinks);

    tracing::debug!(
        drinks = assessment.drink_count,
        grams = assessment.total_alcohol_grams,
        overall = assessment.overall_impact,
        "Assessed brain impact"
    );

    Ok(BrainImpactResponse {
        window_start: start,
        window_end: end,
        language,
        assessment,
        disclaimer: DISCLAIMER,
    })
}

/// Brain impact of everything logged on a date (default: today, UTC)
pub fn analyze_brain_impact(
    db: &Database,
    date: Option<&str>,
    language: Option<&str>,
) -> Result<BrainImpactResponse, String> {
    let day = match date {
        Some(d) => parse_date(d).ok_or_else(|| format!("Invalid date: '{}'. Use YYYY-MM-DD", d))?,
        None => Utc::now().date_naive(),
    };
    let (start, end) = day_bounds(day).ok_or_else(|| format!("Invalid date: '{}'", day))?;
    assess_window(db, start, end, language)
}

/// Brain impact of everything logged in `[start, end)`
pub fn analyze_brain_impact_range(
    db: &Database,
    start: &str,
    end: &str,
    language: Option<&str>,
) -> Result<BrainImpactResponse, String> {
    let start = normalize_timestamp(start).ok_or_else(|| format!("Invalid start: '{}'", start))?;
    let end = normalize_timestamp(end).ok_or_else(|| format!("Invalid end: '{}'", end))?;
    if end <= start {
        return Err("end must be after start".to_string());
    }
    assess_window(db, start, end, language)
}
