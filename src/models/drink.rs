//! Drink model
//!
//! A logged drink. `alcohol_grams` is always derived from `volume_ml` and
//! `abv_percent` on write and never set on its own.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::analysis::{derive_alcohol_grams, AlcoholContent};
use crate::db::DbResult;

/// Storage format of every drink timestamp
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Which entry path produced a drink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrinkSource {
    #[default]
    Manual,
    QuickAdd,
    Scan,
}

impl DrinkSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrinkSource::Manual => "manual",
            DrinkSource::QuickAdd => "quick_add",
            DrinkSource::Scan => "scan",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "manual" => Some(DrinkSource::Manual),
            "quick_add" | "quickadd" | "preset" => Some(DrinkSource::QuickAdd),
            "scan" | "label_scan" => Some(DrinkSource::Scan),
            _ => None,
        }
    }
}

/// A logged drink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Drink {
    pub id: i64,
    pub drink_type: String,
    pub volume_ml: f64,
    pub abv_percent: f64,
    pub alcohol_grams: f64,
    pub timestamp: String,
    pub source: DrinkSource,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for logging a new drink
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrinkCreate {
    pub drink_type: String,
    pub volume_ml: f64,
    pub abv_percent: f64,
    /// Defaults to now
    pub timestamp: Option<String>,
    pub source: DrinkSource,
    pub notes: Option<String>,
}

/// Data for updating a drink
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DrinkUpdate {
    pub drink_type: Option<String>,
    pub volume_ml: Option<f64>,
    pub abv_percent: Option<f64>,
    pub timestamp: Option<String>,
    pub notes: Option<String>,
}

/// Grams and drink count for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: String,
    pub alcohol_grams: f64,
    pub drink_count: i64,
}

/// Stored grams that no longer matched volume and ABV
#[derive(Debug, Clone, Serialize)]
pub struct GramsCorrection {
    pub id: i64,
    pub old_grams: f64,
    pub new_grams: f64,
}

impl AlcoholContent for Drink {
    fn alcohol_grams(&self) -> f64 {
        self.alcohol_grams
    }
}

impl Drink {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let source_str: String = row.get("source")?;
        let source = DrinkSource::from_str(&source_str).unwrap_or_default();

        Ok(Self {
            id: row.get("id")?,
            drink_type: row.get("drink_type")?,
            volume_ml: row.get("volume_ml")?,
            abv_percent: row.get("abv_percent")?,
            alcohol_grams: row.get("alcohol_grams")?,
            timestamp: row.get("timestamp")?,
            source,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Log a new drink, deriving its alcohol grams
    pub fn create(conn: &Connection, data: &DrinkCreate) -> DbResult<Self> {
        let timestamp = data
            .timestamp
            .clone()
            .unwrap_or_else(|| Utc::now().format(TIMESTAMP_FORMAT).to_string());
        let alcohol_grams = derive_alcohol_grams(data.volume_ml, data.abv_percent);

        conn.execute(
            r#"
            INSERT INTO drinks (drink_type, volume_ml, abv_percent, alcohol_grams, timestamp, source, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.drink_type,
                data.volume_ml,
                data.abv_percent,
                alcohol_grams,
                timestamp,
                data.source.as_str(),
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM drinks WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(drink) => Ok(Some(drink)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent drinks first
    pub fn list_recent(conn: &Connection, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM drinks ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )?;
        let drinks = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(drinks)
    }

    /// Every drink, oldest first
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM drinks ORDER BY timestamp ASC, id ASC")?;
        let drinks = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(drinks)
    }

    /// Drinks with `start <= timestamp < end`, most recent first
    pub fn list_between(conn: &Connection, start: &str, end: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM drinks WHERE timestamp >= ?1 AND timestamp < ?2 ORDER BY timestamp DESC, id DESC",
        )?;
        let drinks = stmt
            .query_map(params![start, end], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(drinks)
    }

    /// Drinks logged on a calendar date (UTC)
    pub fn list_for_date(conn: &Connection, date: NaiveDate) -> DbResult<Vec<Self>> {
        match day_bounds(date) {
            Some((start, end)) => Self::list_between(conn, &start, &end),
            None => Ok(Vec::new()),
        }
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count = conn.query_row("SELECT COUNT(*) FROM drinks", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Per-day totals for dates with at least one drink in `[start, end]`
    pub fn daily_totals(conn: &Connection, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<DailyTotal>> {
        let range_start = day_start(start);
        let range_end = match day_bounds(end) {
            Some((_, range_end)) => range_end,
            None => return Ok(Vec::new()),
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT substr(timestamp, 1, 10) AS date,
                   SUM(alcohol_grams) AS grams,
                   COUNT(*) AS drink_count
            FROM drinks
            WHERE timestamp >= ?1 AND timestamp < ?2
            GROUP BY substr(timestamp, 1, 10)
            ORDER BY date
            "#,
        )?;
        let totals = stmt
            .query_map(params![range_start, range_end], |row| {
                Ok(DailyTotal {
                    date: row.get("date")?,
                    alcohol_grams: row.get("grams")?,
                    drink_count: row.get("drink_count")?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    /// Distinct dates with at least one drink, ascending
    pub fn logged_dates(conn: &Connection) -> DbResult<Vec<NaiveDate>> {
        let mut stmt = conn.prepare(
            "SELECT DISTINCT substr(timestamp, 1, 10) AS date FROM drinks ORDER BY date",
        )?;
        let raw = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(raw
            .iter()
            .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .collect())
    }

    /// Update a drink; grams are re-derived from the resulting volume and ABV
    pub fn update(conn: &Connection, id: i64, data: &DrinkUpdate) -> DbResult<Option<Self>> {
        let existing = match Self::get_by_id(conn, id)? {
            Some(d) => d,
            None => return Ok(None),
        };

        let drink_type = data.drink_type.clone().unwrap_or(existing.drink_type);
        let volume_ml = data.volume_ml.unwrap_or(existing.volume_ml);
        let abv_percent = data.abv_percent.unwrap_or(existing.abv_percent);
        let timestamp = data.timestamp.clone().unwrap_or(existing.timestamp);
        // An empty string clears the notes
        let notes = match data.notes.as_deref() {
            Some("") => None,
            Some(n) => Some(n.to_string()),
            None => existing.notes,
        };
        let alcohol_grams = derive_alcohol_grams(volume_ml, abv_percent);

        conn.execute(
            r#"
            UPDATE drinks
            SET drink_type = ?1, volume_ml = ?2, abv_percent = ?3, alcohol_grams = ?4,
                timestamp = ?5, notes = ?6, updated_at = datetime('now')
            WHERE id = ?7
            "#,
            params![drink_type, volume_ml, abv_percent, alcohol_grams, timestamp, notes, id],
        )?;

        Self::get_by_id(conn, id)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM drinks WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Re-derive grams for every drink, returning the rows that changed
    pub fn recalculate_all_grams(conn: &mut Connection) -> DbResult<Vec<GramsCorrection>> {
        let tx = conn.transaction()?;
        let mut corrections = Vec::new();
        {
            let drinks = Self::list_all(&tx)?;
            let mut update = tx.prepare(
                "UPDATE drinks SET alcohol_grams = ?1, updated_at = datetime('now') WHERE id = ?2",
            )?;
            for drink in drinks {
                let derived = derive_alcohol_grams(drink.volume_ml, drink.abv_percent);
                if (derived - drink.alcohol_grams).abs() > 1e-9 {
                    update.execute(params![derived, drink.id])?;
                    corrections.push(GramsCorrection {
                        id: drink.id,
                        old_grams: drink.alcohol_grams,
                        new_grams: derived,
                    });
                }
            }
        }
        tx.commit()?;
        Ok(corrections)
    }

    /// Calendar date (UTC) of the drink
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }
}

/// Normalize a user-supplied timestamp to [`TIMESTAMP_FORMAT`] in UTC.
///
/// Accepts RFC 3339 with any offset, or a naive `YYYY-MM-DDTHH:MM[:SS]`
/// (space separator allowed) taken as UTC.
pub fn normalize_timestamp(input: &str) -> Option<String> {
    let trimmed = input.trim();

    let utc = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(_) => ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())?
            .and_utc(),
    };

    storable(utc.date_naive()).then(|| utc.format(TIMESTAMP_FORMAT).to_string())
}

/// Parse a `YYYY-MM-DD` date within the storable range
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .ok()
        .filter(|d| storable(*d))
}

/// Timestamps are compared as text, so only four-digit years are stored
fn storable(date: NaiveDate) -> bool {
    (1..=9999).contains(&date.year())
}

fn day_start(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}

/// Half-open timestamp range covering one UTC day, or None for the last
/// representable date
pub fn day_bounds(date: NaiveDate) -> Option<(String, String)> {
    let next = date.succ_opt()?;
    let end = if storable(next) {
        day_start(next)
    } else {
        // Sorts after every timestamp of `date` without leaving four-digit years
        format!("{}T24:00:00Z", date.format("%Y-%m-%d"))
    };
    Some((day_start(date), end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn beer(timestamp: &str) -> DrinkCreate {
        DrinkCreate {
            drink_type: "beer".to_string(),
            volume_ml: 568.0,
            abv_percent: 4.5,
            timestamp: Some(timestamp.to_string()),
            source: DrinkSource::Manual,
            notes: None,
        }
    }

    #[test]
    fn test_create_derives_grams() {
        let conn = conn();
        let drink = Drink::create(&conn, &beer("2026-01-09T20:00:00Z")).unwrap();
        assert!(drink.id > 0);
        assert!((drink.alcohol_grams - derive_alcohol_grams(568.0, 4.5)).abs() < 1e-9);
        assert_eq!(drink.source, DrinkSource::Manual);
        assert_eq!(drink.date(), NaiveDate::from_ymd_opt(2026, 1, 9));
    }

    #[test]
    fn test_update_rederives_grams() {
        let conn = conn();
        let drink = Drink::create(&conn, &beer("2026-01-09T20:00:00Z")).unwrap();

        let updated = Drink::update(
            &conn,
            drink.id,
            &DrinkUpdate {
                abv_percent: Some(6.0),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(updated.volume_ml, 568.0);
        assert!((updated.alcohol_grams - derive_alcohol_grams(568.0, 6.0)).abs() < 1e-9);
        assert!(Drink::update(&conn, 999, &DrinkUpdate::default()).unwrap().is_none());
    }

    #[test]
    fn test_list_for_date_and_totals() {
        let conn = conn();
        Drink::create(&conn, &beer("2026-01-09T20:00:00Z")).unwrap();
        Drink::create(&conn, &beer("2026-01-09T23:59:59Z")).unwrap();
        Drink::create(&conn, &beer("2026-01-10T00:00:00Z")).unwrap();

        let jan9 = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
        let jan10 = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        assert_eq!(Drink::list_for_date(&conn, jan9).unwrap().len(), 2);
        assert_eq!(Drink::list_for_date(&conn, jan10).unwrap().len(), 1);

        let totals = Drink::daily_totals(&conn, jan9, jan10).unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].date, "2026-01-09");
        assert_eq!(totals[0].drink_count, 2);
        assert!((totals[0].alcohol_grams - 2.0 * derive_alcohol_grams(568.0, 4.5)).abs() < 1e-9);

        assert_eq!(Drink::logged_dates(&conn).unwrap(), vec![jan9, jan10]);
        assert_eq!(Drink::count(&conn).unwrap(), 3);
    }

    #[test]
    fn test_recalculate_fixes_drift() {
        let mut conn = conn();
        let drink = Drink::create(&conn, &beer("2026-01-09T20:00:00Z")).unwrap();
        conn.execute("UPDATE drinks SET alcohol_grams = 1.0 WHERE id = ?1", [drink.id])
            .unwrap();

        let corrections = Drink::recalculate_all_grams(&mut conn).unwrap();
        assert_eq!(corrections.len(), 1);
        assert_eq!(corrections[0].old_grams, 1.0);

        let fixed = Drink::get_by_id(&conn, drink.id).unwrap().unwrap();
        assert!((fixed.alcohol_grams - drink.alcohol_grams).abs() < 1e-9);
        assert!(Drink::recalculate_all_grams(&mut conn).unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let conn = conn();
        let drink = Drink::create(&conn, &beer("2026-01-09T20:00:00Z")).unwrap();
        assert!(Drink::delete(&conn, drink.id).unwrap());
        assert!(!Drink::delete(&conn, drink.id).unwrap());
    }

    #[test]
    fn test_normalize_timestamp() {
        assert_eq!(
            normalize_timestamp("2026-01-09T21:30:00+01:00").as_deref(),
            Some("2026-01-09T20:30:00Z")
        );
        assert_eq!(
            normalize_timestamp("2026-01-09T21:30:00.123Z").as_deref(),
            Some("2026-01-09T21:30:00Z")
        );
        assert_eq!(
            normalize_timestamp("2026-01-09 21:30").as_deref(),
            Some("2026-01-09T21:30:00Z")
        );
        assert_eq!(normalize_timestamp("last tuesday"), None);
    }

    #[test]
    fn test_day_bounds() {
        let (start, end) = day_bounds(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap()).unwrap();
        assert_eq!(start, "2026-12-31T00:00:00Z");
        assert_eq!(end, "2027-01-01T00:00:00Z");
    }

    #[test]
    fn test_extreme_dates_do_not_overflow() {
        let conn = conn();
        assert!(day_bounds(NaiveDate::MAX).is_none());
        assert!(Drink::list_for_date(&conn, NaiveDate::MAX).unwrap().is_empty());
        assert!(Drink::daily_totals(&conn, NaiveDate::MIN, NaiveDate::MAX).unwrap().is_empty());

        assert_eq!(parse_date("+262142-12-31"), None);
        assert_eq!(parse_date("10000-01-01"), None);
        assert_eq!(parse_date("9999-12-31"), NaiveDate::from_ymd_opt(9999, 12, 31));
        assert_eq!(normalize_timestamp("+262142-12-31T00:00:00"), None);

        let last = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
        Drink::create(&conn, &beer("9999-12-31T23:59:59Z")).unwrap();
        assert_eq!(Drink::list_for_date(&conn, last).unwrap().len(), 1);
    }

    #[test]
    fn test_update_clears_notes_with_empty_string() {
        let conn = conn();
        let mut data = beer("2026-01-09T20:00:00Z");
        data.notes = Some("birthday".to_string());
        let drink = Drink::create(&conn, &data).unwrap();

        let kept = Drink::update(&conn, drink.id, &DrinkUpdate::default()).unwrap().unwrap();
        assert_eq!(kept.notes.as_deref(), Some("birthday"));

        let cleared = Drink::update(
            &conn,
            drink.id,
            &DrinkUpdate {
                notes: Some(String::new()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        assert_eq!(cleared.notes, None);
    }
}
