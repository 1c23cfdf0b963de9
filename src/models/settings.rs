//! User settings
//!
//! Small key/value store for preferences such as the daily alcohol goal.

use rusqlite::{params, Connection};

use crate::db::DbResult;

pub const DAILY_GOAL_KEY: &str = "daily_goal_grams";

pub struct Settings;

impl Settings {
    pub fn get(conn: &Connection, key: &str) -> DbResult<Option<String>> {
        match conn.query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| row.get(0)) {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO settings (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    pub fn delete(conn: &Connection, key: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM settings WHERE key = ?1", [key])?;
        Ok(rows > 0)
    }

    /// Daily goal in grams, if one is set and parses
    pub fn daily_goal(conn: &Connection) -> DbResult<Option<f64>> {
        Ok(Self::get(conn, DAILY_GOAL_KEY)?.and_then(|v| v.parse().ok()))
    }

    pub fn set_daily_goal(conn: &Connection, grams: f64) -> DbResult<()> {
        Self::set(conn, DAILY_GOAL_KEY, &grams.to_string())
    }

    pub fn clear_daily_goal(conn: &Connection) -> DbResult<bool> {
        Self::delete(conn, DAILY_GOAL_KEY)
    }
}
