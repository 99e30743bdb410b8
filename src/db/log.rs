//! Internal audit log table helpers.

use chrono::Utc;
use rusqlite::{Connection, Result, params};

/// Append a row to the internal `log` table.
pub fn ttlog(conn: &Connection, operation: &str, target: &str, message: &str) -> Result<()> {
    let now = Utc::now().to_rfc3339(); // ISO 8601
    let mut stmt = conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message) VALUES (?1, ?2, ?3, ?4)",
    )?;
    stmt.execute(params![&now, operation, target, message])?;
    Ok(())
}

/// True if a given (operation, target) pair was already logged.
/// Used to mark one-shot migrations as applied.
pub fn has_log_entry(conn: &Connection, operation: &str, target: &str) -> Result<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM log WHERE operation = ?1 AND target = ?2 LIMIT 1",
    )?;
    stmt.exists(params![operation, target])
}
