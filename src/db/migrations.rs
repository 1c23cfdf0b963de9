//! Database migrations

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Bring the database up to [`SCHEMA_VERSION`]
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("Applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: drinks, quick adds, settings
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- DRINKS
        -- One row per logged drink
        -- ============================================
        CREATE TABLE drinks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            drink_type TEXT NOT NULL,            -- free-form: beer, wine, spirit, ...
            volume_ml REAL NOT NULL,
            abv_percent REAL NOT NULL,
            alcohol_grams REAL NOT NULL,         -- volume_ml * abv/100 * 0.789
            timestamp TEXT NOT NULL,             -- "2026-01-09T21:30:00Z"
            source TEXT NOT NULL CHECK(source IN ('manual', 'quick_add', 'scan')) DEFAULT 'manual',

            -- Metadata
            notes TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_drinks_timestamp ON drinks(timestamp);
        CREATE INDEX idx_drinks_type ON drinks(drink_type);

        -- ============================================
        -- QUICK ADDS
        -- User-defined one-tap drink presets
        -- ============================================
        CREATE TABLE quick_adds (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            label TEXT NOT NULL,
            drink_type TEXT NOT NULL,
            volume_ml REAL NOT NULL,
            abv_percent REAL NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- SETTINGS
        -- Key/value user preferences (daily goal, ...)
        -- ============================================
        CREATE TABLE settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
