//! Unified application error type.
//! All modules (db, core, cli, kv) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    /// Insert of a timestamp that already exists in the collection.
    /// Bulk inserts fail the whole batch with this error.
    #[error("Duplicate timestamp '{timestamp}' in {collection}")]
    DuplicateTimestamp {
        collection: &'static str,
        timestamp: String,
    },

    #[error("Migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Backup / restore / reset
    // ---------------------------
    #[error("Backup error: {0}")]
    Backup(String),

    #[error("Reset error: {0}")]
    Reset(String),

    // ---------------------------
    // Export / import
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    /// Malformed import document; raised before any mutation is attempted.
    #[error("Invalid import document: {0}")]
    ImportValidation(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;
