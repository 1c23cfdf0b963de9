//! Quick Add MCP Tools
//!
//! Built-in and custom one-tap drink presets.

use serde::Serialize;

use crate::db::Database;
use crate::models::{
    BuiltinQuickAdd, CustomQuickAdd, CustomQuickAddCreate, CustomQuickAddUpdate, DrinkCreate,
    DrinkSource, BUILTIN_QUICK_ADDS,
};

use super::drinks::{
    resolve_optional_volume, resolve_timestamp, resolve_volume, store_drink, validate_abv,
    validate_drink_type, DeleteResponse, LogDrinkResponse,
};

/// A preset as shown to the user
#[derive(Debug, Serialize)]
pub struct QuickAddSummary {
    /// Built-in key, or the custom preset's id as a string
    pub preset: String,
    pub label: String,
    pub drink_type: String,
    pub volume_ml: f64,
    pub abv_percent: f64,
    pub alcohol_grams: f64,
    pub builtin: bool,
}

impl From<&BuiltinQuickAdd> for QuickAddSummary {
    fn from(q: &BuiltinQuickAdd) -> Self {
        Self {
            preset: q.key.to_string(),
            label: q.label.to_string(),
            drink_type: q.drink_type.to_string(),
            volume_ml: q.volume_ml,
            abv_percent: q.abv_percent,
            alcohol_grams: q.alcohol_grams(),
            builtin: true,
        }
    }
}

impl From<&CustomQuickAdd> for QuickAddSummary {
    fn from(q: &CustomQuickAdd) -> Self {
        Self {
            preset: q.id.to_string(),
            label: q.label.clone(),
            drink_type: q.drink_type.clone(),
            volume_ml: q.volume_ml,
            abv_percent: q.abv_percent,
            alcohol_grams: q.alcohol_grams(),
            builtin: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListQuickAddsResponse {
    pub quick_adds: Vec<QuickAddSummary>,
    pub total: usize,
}

/// List built-in presets followed by custom ones
pub fn list_quick_adds(db: &Database) -> Result<ListQuickAddsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let custom = CustomQuickAdd::list(&conn)
        .map_err(|e| format!("Failed to list quick adds: {}", e))?;

    let quick_adds: Vec<QuickAddSummary> = BUILTIN_QUICK_ADDS
        .iter()
        .map(QuickAddSummary::from)
        .chain(custom.iter().map(QuickAddSummary::from))
        .collect();
    let total = quick_adds.len();

    Ok(ListQuickAddsResponse { quick_adds, total })
}

/// Create a custom preset
pub fn add_quick_add(
    db: &Database,
    label: &str,
    drink_type: &str,
    volume: f64,
    unit: Option<&str>,
    abv_percent: f64,
) -> Result<QuickAddSummary, String> {
    let label = label.trim();
    if label.is_empty() {
        return Err("Label must not be empty".to_string());
    }
    let drink_type = validate_drink_type(drink_type)?;
    let volume_ml = resolve_volume(volume, unit)?;
    validate_abv(abv_percent)?;

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let created = CustomQuickAdd::create(
        &conn,
        &CustomQuickAddCreate {
            label: label.to_string(),
            drink_type,
            volume_ml,
            abv_percent,
        },
    )
    .map_err(|e| format!("Failed to create quick add: {}", e))?;

    tracing::info!(id = created.id, label = %created.label, "Created quick add");
    Ok(QuickAddSummary::from(&created))
}

/// Update a custom preset
pub fn update_quick_add(
    db: &Database,
    id: i64,
    label: Option<&str>,
    drink_type: Option<&str>,
    volume: Option<f64>,
    unit: Option<&str>,
    abv_percent: Option<f64>,
) -> Result<Option<QuickAddSummary>, String> {
    let label = match label.map(str::trim) {
        Some("") => return Err("Label must not be empty".to_string()),
        other => other.map(String::from),
    };
    let drink_type = drink_type.map(validate_drink_type).transpose()?;
    let volume_ml = resolve_optional_volume(volume, unit)?;
    if let Some(abv) = abv_percent {
        validate_abv(abv)?;
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let updated = CustomQuickAdd::update(
        &conn,
        id,
        &CustomQuickAddUpdate {
            label,
            drink_type,
            volume_ml,
            abv_percent,
        },
    )
    .map_err(|e| format!("Failed to update quick add: {}", e))?;

    Ok(updated.as_ref().map(QuickAddSummary::from))
}

/// Delete a custom preset
pub fn delete_quick_add(db: &Database, id: i64) -> Result<DeleteResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let deleted = CustomQuickAdd::delete(&conn, id)
        .map_err(|e| format!("Failed to delete quick add: {}", e))?;
    if !deleted {
        return Err(format!("Quick add not found with id: {}", id));
    }

    Ok(DeleteResponse {
        success: true,
        deleted_id: id,
    })
}

/// Log a drink from a preset: a built-in key (e.g. "pint_of_beer") or a custom id
pub fn log_quick_add(
    db: &Database,
    preset: &str,
    timestamp: Option<&str>,
) -> Result<LogDrinkResponse, String> {
    let timestamp = resolve_timestamp(timestamp)?;

    let (drink_type, volume_ml, abv_percent, notes) = match BuiltinQuickAdd::find(preset) {
        Some(builtin) => (
            builtin.drink_type.to_string(),
            builtin.volume_ml,
            builtin.abv_percent,
            builtin.label.to_string(),
        ),
        None => {
            let id: i64 = preset.trim().parse().map_err(|_| {
                let keys: Vec<&str> = BUILTIN_QUICK_ADDS.iter().map(|q| q.key).collect();
                format!(
                    "Unknown quick add: '{}'. Use a custom quick add id or one of: {}",
                    preset,
                    keys.join(", ")
                )
            })?;
            let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
            let custom = CustomQuickAdd::get_by_id(&conn, id)
                .map_err(|e| format!("Database error: {}", e))?
                .ok_or_else(|| format!("Quick add not found with id: {}", id))?;
            (custom.drink_type, custom.volume_ml, custom.abv_percent, custom.label)
        }
    };

    store_drink(
        db,
        DrinkCreate {
            drink_type,
            volume_ml,
            abv_percent,
            timestamp,
            source: DrinkSource::QuickAdd,
            notes: Some(notes),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::derive_alcohol_grams;
    use crate::tools::drinks::get_drink;

    #[test]
    fn test_list_includes_builtins() {
        let db = Database::in_memory().unwrap();
        let resp = list_quick_adds(&db).unwrap();
        assert_eq!(resp.total, 3);
        assert!(resp.quick_adds.iter().all(|q| q.builtin));
    }

    #[test]
    fn test_log_builtin_preset() {
        let db = Database::in_memory().unwrap();
        let resp = log_quick_add(&db, "large_wine", None).unwrap();
        assert_eq!(resp.source, DrinkSource::QuickAdd);

        let stored = get_drink(&db, resp.id).unwrap().unwrap();
        assert!((stored.alcohol_grams - derive_alcohol_grams(175.0, 13.0)).abs() < 1e-9);
        assert_eq!(stored.notes.as_deref(), Some("Large Wine"));
    }

    #[test]
    fn test_custom_preset_lifecycle() {
        let db = Database::in_memory().unwrap();
        let created = add_quick_add(&db, "Hazy IPA", "beer", 44.0, Some("cl"), 6.8).unwrap();
        assert_eq!(created.volume_ml, 440.0);
        assert!(!created.builtin);

        let logged = log_quick_add(&db, &created.preset, Some("2026-02-01T21:00:00Z")).unwrap();
        assert_eq!(logged.volume_ml, 440.0);
        assert_eq!(logged.timestamp, "2026-02-01T21:00:00Z");

        let id: i64 = created.preset.parse().unwrap();
        let updated = update_quick_add(&db, id, None, None, None, None, Some(7.0)).unwrap().unwrap();
        assert_eq!(updated.abv_percent, 7.0);
        assert!(update_quick_add(&db, id, Some(" "), None, None, None, None).is_err());
        assert!(update_quick_add(&db, id, None, None, None, Some("cl"), None).is_err());

        assert_eq!(list_quick_adds(&db).unwrap().total, 4);
        assert!(delete_quick_add(&db, id).unwrap().success);
        assert!(log_quick_add(&db, &created.preset, None).is_err());
    }

    #[test]
    fn test_unknown_preset() {
        let db = Database::in_memory().unwrap();
        let err = log_quick_add(&db, "magnum", None).unwrap_err();
        assert!(err.contains("pint_of_beer"));
    }
}
