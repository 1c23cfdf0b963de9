//! Drink Log MCP Tools
//!
//! Logging, listing, editing and deleting drinks. Every write path routes
//! volume and ABV through the quantity derivation in the model layer.

use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{
    day_bounds, normalize_timestamp, parse_date, Drink, DrinkCreate, DrinkSource, DrinkUpdate,
};
use crate::volume::to_ml;

/// Response for log_drink, log_quick_add and log_scanned_drink
#[derive(Debug, Serialize)]
pub struct LogDrinkResponse {
    pub id: i64,
    pub drink_type: String,
    pub volume_ml: f64,
    pub abv_percent: f64,
    pub alcohol_grams: f64,
    pub timestamp: String,
    pub source: DrinkSource,
}

impl From<Drink> for LogDrinkResponse {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id,
            drink_type: drink.drink_type,
            volume_ml: drink.volume_ml,
            abv_percent: drink.abv_percent,
            alcohol_grams: round1(drink.alcohol_grams),
            timestamp: drink.timestamp,
            source: drink.source,
        }
    }
}

/// Drink summary for listing
#[derive(Debug, Serialize)]
pub struct DrinkSummary {
    pub id: i64,
    pub drink_type: String,
    pub volume_ml: f64,
    pub abv_percent: f64,
    pub alcohol_grams: f64,
    pub timestamp: String,
}

impl From<&Drink> for DrinkSummary {
    fn from(drink: &Drink) -> Self {
        Self {
            id: drink.id,
            drink_type: drink.drink_type.clone(),
            volume_ml: drink.volume_ml,
            abv_percent: drink.abv_percent,
            alcohol_grams: round1(drink.alcohol_grams),
            timestamp: drink.timestamp.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListDrinksResponse {
    pub drinks: Vec<DrinkSummary>,
    pub total: usize,
    pub total_alcohol_grams: f64,
}

impl ListDrinksResponse {
    fn from_drinks(drinks: &[Drink]) -> Self {
        Self {
            drinks: drinks.iter().map(DrinkSummary::from).collect(),
            total: drinks.len(),
            total_alcohol_grams: round1(drinks.iter().fold(0.0, |acc, d| acc + d.alcohol_grams)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted_id: i64,
}

/// Drink details read off a container label by the scanner.
///
/// Field names follow the recognizer's reply: `{"type", "volume", "abv"}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanResult {
    #[serde(rename = "type")]
    pub drink_type: String,
    pub volume: f64,
    pub abv: f64,
}

// ============================================================================
// Validation
// ============================================================================

pub(crate) fn validate_volume(volume_ml: f64) -> Result<(), String> {
    if !volume_ml.is_finite() || volume_ml <= 0.0 {
        return Err(format!("Volume must be a positive number of ml, got {}", volume_ml));
    }
    Ok(())
}

pub(crate) fn validate_abv(abv_percent: f64) -> Result<(), String> {
    if !abv_percent.is_finite() || !(0.0..=100.0).contains(&abv_percent) {
        return Err(format!("ABV must be between 0 and 100 percent, got {}", abv_percent));
    }
    Ok(())
}

pub(crate) fn validate_drink_type(drink_type: &str) -> Result<String, String> {
    let trimmed = drink_type.trim();
    if trimmed.is_empty() {
        return Err("Drink type must not be empty".to_string());
    }
    Ok(trimmed.to_lowercase())
}

pub(crate) fn resolve_timestamp(timestamp: Option<&str>) -> Result<Option<String>, String> {
    timestamp
        .map(|t| {
            normalize_timestamp(t).ok_or_else(|| {
                format!("Invalid timestamp: '{}'. Use RFC 3339, e.g. 2026-01-09T21:30:00Z", t)
            })
        })
        .transpose()
}

/// Convert an optional `volume` for an update; a unit on its own is an error
pub(crate) fn resolve_optional_volume(
    volume: Option<f64>,
    unit: Option<&str>,
) -> Result<Option<f64>, String> {
    match (volume, unit) {
        (Some(v), unit) => resolve_volume(v, unit).map(Some),
        (None, Some(u)) => Err(format!("Unit '{}' given without a volume", u)),
        (None, None) => Ok(None),
    }
}

/// Convert `volume` in `unit` (default ml) to milliliters
pub(crate) fn resolve_volume(volume: f64, unit: Option<&str>) -> Result<f64, String> {
    let volume_ml = match unit {
        Some(u) => to_ml(volume, u).ok_or_else(|| {
            format!(
                "Unknown volume unit: '{}'. Valid units: ml, cl, l, fl_oz, uk_fl_oz, pint, us_pint, can, shot, or an annotation like 'bottle (750ml)'",
                u
            )
        })?,
        None => volume,
    };
    validate_volume(volume_ml)?;
    Ok(volume_ml)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Store a validated drink
pub(crate) fn store_drink(db: &Database, data: DrinkCreate) -> Result<LogDrinkResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let drink = Drink::create(&conn, &data).map_err(|e| format!("Failed to log drink: {}", e))?;

    tracing::info!(
        id = drink.id,
        drink_type = %drink.drink_type,
        grams = drink.alcohol_grams,
        source = drink.source.as_str(),
        "Logged drink"
    );

    Ok(LogDrinkResponse::from(drink))
}

// ============================================================================
// Tool Functions
// ============================================================================

/// Log a drink entered by hand
pub fn log_drink(
    db: &Database,
    drink_type: &str,
    volume: f64,
    unit: Option<&str>,
    abv_percent: f64,
    timestamp: Option<&str>,
    notes: Option<&str>,
) -> Result<LogDrinkResponse, String> {
    let drink_type = validate_drink_type(drink_type)?;
    let volume_ml = resolve_volume(volume, unit)?;
    validate_abv(abv_percent)?;
    let timestamp = resolve_timestamp(timestamp)?;

    store_drink(
        db,
        DrinkCreate {
            drink_type,
            volume_ml,
            abv_percent,
            timestamp,
            source: DrinkSource::Manual,
            notes: notes.map(String::from),
        },
    )
}

/// Extract the first JSON object from the scanner's reply text
pub fn parse_scan_result(scan_text: &str) -> Result<ScanResult, String> {
    let start = scan_text.find('{');
    let end = scan_text.rfind('}');

    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &scan_text[s..=e],
        _ => {
            return Err(
                "Could not detect drink details in the scan result. Please log the drink manually."
                    .to_string(),
            )
        }
    };

    serde_json::from_str(json).map_err(|e| {
        format!(
            "Scan result was not understood ({}). Please log the drink manually.",
            e
        )
    })
}

/// Log a drink from a label scan reply
pub fn log_scanned_drink(
    db: &Database,
    scan_text: &str,
    timestamp: Option<&str>,
) -> Result<LogDrinkResponse, String> {
    let scan = parse_scan_result(scan_text).map_err(|e| {
        tracing::warn!("Rejected scan result: {}", e);
        e
    })?;

    let drink_type = validate_drink_type(&scan.drink_type)?;
    validate_volume(scan.volume)?;
    validate_abv(scan.abv)?;
    let timestamp = resolve_timestamp(timestamp)?;

    store_drink(
        db,
        DrinkCreate {
            drink_type,
            volume_ml: scan.volume,
            abv_percent: scan.abv,
            timestamp,
            source: DrinkSource::Scan,
            notes: None,
        },
    )
}

/// Get a drink by ID
pub fn get_drink(db: &Database, id: i64) -> Result<Option<Drink>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    Drink::get_by_id(&conn, id).map_err(|e| format!("Failed to get drink: {}", e))
}

/// List the most recent drinks
pub fn list_drinks(db: &Database, limit: i64) -> Result<ListDrinksResponse, String> {
    let limit = limit.clamp(1, 500);
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let drinks = Drink::list_recent(&conn, limit)
        .map_err(|e| format!("Failed to list drinks: {}", e))?;

    tracing::debug!(count = drinks.len(), "Listed recent drinks");
    Ok(ListDrinksResponse::from_drinks(&drinks))
}

/// List drinks between two dates (inclusive, YYYY-MM-DD)
pub fn list_drinks_by_date_range(
    db: &Database,
    start_date: &str,
    end_date: &str,
) -> Result<ListDrinksResponse, String> {
    let start = parse_date(start_date)
        .ok_or_else(|| format!("Invalid start_date: '{}'. Use YYYY-MM-DD", start_date))?;
    let end = parse_date(end_date)
        .ok_or_else(|| format!("Invalid end_date: '{}'. Use YYYY-MM-DD", end_date))?;
    if end < start {
        return Err("end_date must not be before start_date".to_string());
    }

    let (range_start, _) =
        day_bounds(start).ok_or_else(|| format!("Invalid start_date: '{}'", start_date))?;
    let (_, range_end) =
        day_bounds(end).ok_or_else(|| format!("Invalid end_date: '{}'", end_date))?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let drinks = Drink::list_between(&conn, &range_start, &range_end)
        .map_err(|e| format!("Failed to list drinks: {}", e))?;

    Ok(ListDrinksResponse::from_drinks(&drinks))
}

/// Update a drink; alcohol grams follow any volume/ABV change.
/// Empty `notes` clears them.
pub fn update_drink(
    db: &Database,
    id: i64,
    drink_type: Option<&str>,
    volume: Option<f64>,
    unit: Option<&str>,
    abv_percent: Option<f64>,
    timestamp: Option<&str>,
    notes: Option<&str>,
) -> Result<Option<LogDrinkResponse>, String> {
    let drink_type = drink_type.map(validate_drink_type).transpose()?;
    let volume_ml = resolve_optional_volume(volume, unit)?;
    if let Some(abv) = abv_percent {
        validate_abv(abv)?;
    }
    let timestamp = resolve_timestamp(timestamp)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let data = DrinkUpdate {
        drink_type,
        volume_ml,
        abv_percent,
        timestamp,
        notes: notes.map(|n| n.trim().to_string()),
    };

    let updated = Drink::update(&conn, id, &data)
        .map_err(|e| format!("Failed to update drink: {}", e))?;

    if let Some(ref drink) = updated {
        tracing::info!(id = drink.id, grams = drink.alcohol_grams, "Updated drink");
    }

    Ok(updated.map(LogDrinkResponse::from))
}

/// Delete a drink
pub fn delete_drink(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = Drink::delete(&conn, id).map_err(|e| format!("Failed to delete drink: {}", e))?;
    if !deleted {
        return Err(format!("Drink not found with id: {}", id));
    }

    tracing::info!(id, "Deleted drink");
    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::derive_alcohol_grams;
    use crate::volume::units::ML_PER_PINT;

    fn db() -> Database {
        Database::in_memory().unwrap()
    }

    #[test]
    fn test_log_drink_derives_grams() {
        let db = db();
        let resp = log_drink(&db, "Beer", 330.0, None, 5.0, Some("2026-01-09T20:00:00Z"), None).unwrap();
        assert_eq!(resp.drink_type, "beer");
        assert_eq!(resp.source, DrinkSource::Manual);

        let stored = get_drink(&db, resp.id).unwrap().unwrap();
        assert!((stored.alcohol_grams - derive_alcohol_grams(330.0, 5.0)).abs() < 1e-9);
    }

    #[test]
    fn test_log_drink_with_unit() {
        let db = db();
        let resp = log_drink(&db, "cider", 1.0, Some("pint"), 4.5, None, None).unwrap();
        assert!((resp.volume_ml - ML_PER_PINT).abs() < 1e-9);
    }

    #[test]
    fn test_log_drink_rejects_invalid_input() {
        let db = db();
        assert!(log_drink(&db, "beer", -5.0, None, 5.0, None, None).is_err());
        assert!(log_drink(&db, "beer", 330.0, None, 120.0, None, None).is_err());
        assert!(log_drink(&db, "beer", f64::NAN, None, 5.0, None, None).is_err());
        assert!(log_drink(&db, "  ", 330.0, None, 5.0, None, None).is_err());
        assert!(log_drink(&db, "beer", 330.0, Some("bucket"), 5.0, None, None).is_err());
        assert!(log_drink(&db, "beer", 330.0, None, 5.0, Some("yesterday"), None).is_err());
        assert_eq!(list_drinks(&db, 10).unwrap().total, 0);
    }

    #[test]
    fn test_parse_scan_result() {
        let text = "Sure! ```json\n{\"type\": \"wine\", \"volume\": 750, \"abv\": 12.5}\n```";
        let scan = parse_scan_result(text).unwrap();
        assert_eq!(
            scan,
            ScanResult {
                drink_type: "wine".to_string(),
                volume: 750.0,
                abv: 12.5
            }
        );

        assert!(parse_scan_result("I can't read this label").is_err());
        assert!(parse_scan_result("{\"type\": \"beer\"}").is_err());
    }

    #[test]
    fn test_log_scanned_drink() {
        let db = db();
        let resp = log_scanned_drink(&db, r#"{"type":"Lager","volume":440,"abv":4.8}"#, None).unwrap();
        assert_eq!(resp.source, DrinkSource::Scan);
        assert_eq!(resp.drink_type, "lager");

        let bad = log_scanned_drink(&db, r#"{"type":"Lager","volume":0,"abv":4.8}"#, None);
        assert!(bad.is_err());
    }

    #[test]
    fn test_update_and_delete() {
        let db = db();
        let resp = log_drink(&db, "wine", 175.0, None, 13.0, Some("2026-01-09T20:00:00Z"), None).unwrap();

        let updated = update_drink(&db, resp.id, None, Some(250.0), None, None, None, Some("big glass"))
            .unwrap()
            .unwrap();
        assert_eq!(updated.volume_ml, 250.0);
        assert!((updated.alcohol_grams - round1(derive_alcohol_grams(250.0, 13.0))).abs() < 1e-9);

        assert!(update_drink(&db, 999, None, None, None, None, None, None).unwrap().is_none());

        assert!(delete_drink(&db, resp.id).unwrap().success);
        assert!(delete_drink(&db, resp.id).is_err());
    }

    #[test]
    fn test_list_by_date_range() {
        let db = db();
        log_drink(&db, "beer", 330.0, None, 5.0, Some("2026-01-08T22:00:00Z"), None).unwrap();
        log_drink(&db, "beer", 330.0, None, 5.0, Some("2026-01-09T20:00:00Z"), None).unwrap();
        log_drink(&db, "beer", 330.0, None, 5.0, Some("2026-01-11T20:00:00Z"), None).unwrap();

        let resp = list_drinks_by_date_range(&db, "2026-01-09", "2026-01-10").unwrap();
        assert_eq!(resp.total, 1);
        assert!(list_drinks_by_date_range(&db, "2026-01-10", "2026-01-09").is_err());
        assert!(list_drinks_by_date_range(&db, "Jan 9", "2026-01-10").is_err());
        assert!(list_drinks_by_date_range(&db, "2026-01-09", "+262142-12-31").is_err());
    }

    #[test]
    fn test_empty_list_total_is_positive_zero() {
        let resp = list_drinks(&db(), 50).unwrap();
        assert!(resp.total_alcohol_grams.is_sign_positive());
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["total_alcohol_grams"].to_string(), "0.0");
    }

    #[test]
    fn test_update_unit_without_volume() {
        let db = db();
        let resp = log_drink(&db, "beer", 1.0, Some("pint"), 4.5, None, Some("pub")).unwrap();

        assert!(update_drink(&db, resp.id, None, None, Some("cl"), None, None, None).is_err());

        let cleared = update_drink(&db, resp.id, None, None, None, None, None, Some(""))
            .unwrap()
            .unwrap();
        assert_eq!(cleared.volume_ml, resp.volume_ml);
        let stored = get_drink(&db, resp.id).unwrap().unwrap();
        assert_eq!(stored.notes, None);
    }
}
