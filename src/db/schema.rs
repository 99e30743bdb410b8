//! Schema creation for the current (version 3) layout.
//!
//! `timestamp` uniqueness is an application invariant enforced by the
//! insert paths, NOT a SQL UNIQUE constraint: legacy data and raw bulk
//! copies can introduce duplicates, which is what the integrity checker
//! and repair exist to handle.

use rusqlite::{Connection, Result};

/// Current schema version, kept in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 3;

/// Ensure all current tables and indexes exist.
/// Legacy shapes are upgraded afterwards by `migrate::run_pending_migrations`.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS uro_logs (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp  TEXT NOT NULL,           -- ISO 8601, unique by invariant
            volume     REAL NOT NULL DEFAULT 0, -- mL
            duration   REAL NOT NULL DEFAULT 0, -- seconds
            flow_rate  REAL NOT NULL DEFAULT 0, -- mL/s
            color      TEXT NOT NULL DEFAULT '',
            urgency    TEXT NOT NULL DEFAULT '',
            concerns   TEXT NOT NULL DEFAULT '[]', -- JSON array of strings
            notes      TEXT,
            is_demo    INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS hydro_logs (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp   TEXT NOT NULL,
            type        TEXT NOT NULL DEFAULT '',
            custom_type TEXT,                    -- used when type = 'Other'
            amount      REAL NOT NULL DEFAULT 0,
            unit        TEXT NOT NULL DEFAULT 'mL' CHECK (unit IN ('mL','oz')),
            notes       TEXT,
            is_demo     INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS kegel_logs (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp  TEXT NOT NULL,
            reps       INTEGER NOT NULL DEFAULT 0,
            hold_time  REAL NOT NULL DEFAULT 0,
            sets       INTEGER NOT NULL DEFAULT 0,
            total_time REAL NOT NULL DEFAULT 0,
            completed  INTEGER NOT NULL DEFAULT 0,
            is_demo    INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS custom_resources (
            id       TEXT PRIMARY KEY,
            title    TEXT NOT NULL DEFAULT '',
            url      TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_uro_timestamp   ON uro_logs(timestamp);
        CREATE INDEX IF NOT EXISTS idx_uro_color       ON uro_logs(color);
        CREATE INDEX IF NOT EXISTS idx_uro_urgency     ON uro_logs(urgency);
        CREATE INDEX IF NOT EXISTS idx_uro_is_demo     ON uro_logs(is_demo);

        CREATE INDEX IF NOT EXISTS idx_hydro_timestamp ON hydro_logs(timestamp);
        CREATE INDEX IF NOT EXISTS idx_hydro_type      ON hydro_logs(type);
        CREATE INDEX IF NOT EXISTS idx_hydro_is_demo   ON hydro_logs(is_demo);

        CREATE INDEX IF NOT EXISTS idx_kegel_timestamp ON kegel_logs(timestamp);
        CREATE INDEX IF NOT EXISTS idx_kegel_is_demo   ON kegel_logs(is_demo);
        ",
    )?;
    Ok(())
}
