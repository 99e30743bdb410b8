//! The record store: durable CRUD over the four collections, backed by
//! SQLite with a versioned schema.
//!
//! `Store` is an explicit, constructed handle passed by reference to every
//! operation; there is no module-level singleton. The reset service is the
//! only code allowed to swap the underlying connection, and it does so
//! through `&mut Store` so callers never hold a stale handle.

pub mod integrity;
pub mod log;
pub mod migrate;
pub mod reset;
pub mod schema;
pub mod stats;

use crate::errors::{AppError, AppResult};
use crate::models::{CustomResource, HydroLogEntry, KegelLogEntry, UroLogEntry};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// The three timestamp-keyed log collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Uro,
    Hydro,
    Kegel,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::Uro, Collection::Hydro, Collection::Kegel];

    pub fn table(&self) -> &'static str {
        match self {
            Collection::Uro => "uro_logs",
            Collection::Hydro => "hydro_logs",
            Collection::Kegel => "kegel_logs",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Collection::Uro => "uro logs",
            Collection::Hydro => "hydro logs",
            Collection::Kegel => "kegel logs",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatabaseCounts {
    pub uro_logs: i64,
    pub hydro_logs: i64,
    pub kegel_logs: i64,
}

impl DatabaseCounts {
    pub fn total(&self) -> i64 {
        self.uro_logs + self.hydro_logs + self.kegel_logs
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseInfo {
    pub version: i64,
    pub path: String,
    pub table_names: Vec<String>,
    pub counts: DatabaseCounts,
    pub resources: i64,
}

pub struct Store {
    pub conn: Connection,
    path: PathBuf,
}

impl Store {
    /// Open the database, create the schema if needed and run pending
    /// migrations. Nothing reads the store before this has completed.
    pub fn open<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        schema::init_schema(&conn)?;
        migrate::run_pending_migrations(&conn)?;
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ---------------------------
    // Collection-generic helpers
    // ---------------------------

    pub fn count(&self, collection: Collection) -> AppResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", collection.table());
        let n: i64 = self.conn.query_row(&sql, [], |r| r.get(0))?;
        Ok(n)
    }

    /// All timestamps in storage (rowid) order, duplicates included.
    pub fn timestamps(&self, collection: Collection) -> AppResult<Vec<String>> {
        let sql = format!(
            "SELECT timestamp FROM {} ORDER BY id ASC",
            collection.table()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn timestamp_exists(&self, collection: Collection, timestamp: &str) -> AppResult<bool> {
        let sql = format!("SELECT 1 FROM {} WHERE timestamp = ?1", collection.table());
        let mut stmt = self.conn.prepare_cached(&sql)?;
        Ok(stmt.exists([timestamp])?)
    }

    /// Delete by timestamp; deleting a missing key is not an error.
    pub fn delete(&self, collection: Collection, timestamp: &str) -> AppResult<()> {
        let sql = format!("DELETE FROM {} WHERE timestamp = ?1", collection.table());
        self.conn.execute(&sql, [timestamp])?;
        Ok(())
    }

    pub fn delete_all(&self, collection: Collection) -> AppResult<()> {
        let sql = format!("DELETE FROM {}", collection.table());
        self.conn.execute(&sql, [])?;
        Ok(())
    }

    pub fn database_counts(&self) -> AppResult<DatabaseCounts> {
        Ok(DatabaseCounts {
            uro_logs: self.count(Collection::Uro)?,
            hydro_logs: self.count(Collection::Hydro)?,
            kegel_logs: self.count(Collection::Kegel)?,
        })
    }

    pub fn database_info(&self) -> AppResult<DatabaseInfo> {
        let version: i64 = self.conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let table_names = stmt
            .query_map([], |r| r.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        let resources: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM custom_resources", [], |r| r.get(0))?;
        Ok(DatabaseInfo {
            version,
            path: self.path.to_string_lossy().to_string(),
            table_names,
            counts: self.database_counts()?,
            resources,
        })
    }

    // ---------------------------
    // Uro logs
    // ---------------------------

    pub fn uro_logs(&self) -> AppResult<Vec<UroLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, volume, duration, flow_rate, color, urgency, concerns, notes, is_demo
             FROM uro_logs ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], row_to_uro)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn add_uro(&mut self, entry: &UroLogEntry) -> AppResult<()> {
        let tx = self.conn.transaction()?;
        ensure_free(&tx, Collection::Uro, &entry.timestamp)?;
        insert_uro(&tx, entry)?;
        tx.commit()?;
        Ok(())
    }

    /// Replace the record at `entry.timestamp`. Returns the number of rows
    /// touched; 0 means the key was absent and nothing happened.
    pub fn update_uro(&self, entry: &UroLogEntry) -> AppResult<usize> {
        let n = self.conn.execute(
            "UPDATE uro_logs SET volume = ?2, duration = ?3, flow_rate = ?4, color = ?5,
             urgency = ?6, concerns = ?7, notes = ?8, is_demo = ?9
             WHERE timestamp = ?1",
            params![
                entry.timestamp,
                entry.volume,
                entry.duration,
                entry.flow_rate,
                entry.color,
                entry.urgency,
                serde_json::to_string(&entry.concerns)?,
                entry.notes,
                entry.is_demo,
            ],
        )?;
        Ok(n)
    }

    /// All-or-nothing batch insert: any timestamp collision (against stored
    /// rows or within the batch) rolls the whole batch back.
    pub fn bulk_add_uro(&mut self, entries: &[UroLogEntry]) -> AppResult<()> {
        let tx = self.conn.transaction()?;
        let mut taken = existing_timestamps(&tx, Collection::Uro)?;
        for entry in entries {
            claim(&mut taken, Collection::Uro, &entry.timestamp)?;
            insert_uro(&tx, entry)?;
        }
        tx.commit()?;
        Ok(())
    }

    // ---------------------------
    // Hydro logs
    // ---------------------------

    pub fn hydro_logs(&self) -> AppResult<Vec<HydroLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, type, custom_type, amount, unit, notes, is_demo
             FROM hydro_logs ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], row_to_hydro)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn add_hydro(&mut self, entry: &HydroLogEntry) -> AppResult<()> {
        let tx = self.conn.transaction()?;
        ensure_free(&tx, Collection::Hydro, &entry.timestamp)?;
        insert_hydro(&tx, entry)?;
        tx.commit()?;
        Ok(())
    }

    pub fn update_hydro(&self, entry: &HydroLogEntry) -> AppResult<usize> {
        let n = self.conn.execute(
            "UPDATE hydro_logs SET type = ?2, custom_type = ?3, amount = ?4, unit = ?5,
             notes = ?6, is_demo = ?7
             WHERE timestamp = ?1",
            params![
                entry.timestamp,
                entry.beverage_type,
                entry.custom_type,
                entry.amount,
                entry.unit,
                entry.notes,
                entry.is_demo,
            ],
        )?;
        Ok(n)
    }

    pub fn bulk_add_hydro(&mut self, entries: &[HydroLogEntry]) -> AppResult<()> {
        let tx = self.conn.transaction()?;
        let mut taken = existing_timestamps(&tx, Collection::Hydro)?;
        for entry in entries {
            claim(&mut taken, Collection::Hydro, &entry.timestamp)?;
            insert_hydro(&tx, entry)?;
        }
        tx.commit()?;
        Ok(())
    }

    // ---------------------------
    // Kegel logs
    // ---------------------------

    pub fn kegel_logs(&self) -> AppResult<Vec<KegelLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, reps, hold_time, sets, total_time, completed, is_demo
             FROM kegel_logs ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], row_to_kegel)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn add_kegel(&mut self, entry: &KegelLogEntry) -> AppResult<()> {
        let tx = self.conn.transaction()?;
        ensure_free(&tx, Collection::Kegel, &entry.timestamp)?;
        insert_kegel(&tx, entry)?;
        tx.commit()?;
        Ok(())
    }

    pub fn update_kegel(&self, entry: &KegelLogEntry) -> AppResult<usize> {
        let n = self.conn.execute(
            "UPDATE kegel_logs SET reps = ?2, hold_time = ?3, sets = ?4, total_time = ?5,
             completed = ?6, is_demo = ?7
             WHERE timestamp = ?1",
            params![
                entry.timestamp,
                entry.reps,
                entry.hold_time,
                entry.sets,
                entry.total_time,
                entry.completed,
                entry.is_demo,
            ],
        )?;
        Ok(n)
    }

    pub fn bulk_add_kegel(&mut self, entries: &[KegelLogEntry]) -> AppResult<()> {
        let tx = self.conn.transaction()?;
        let mut taken = existing_timestamps(&tx, Collection::Kegel)?;
        for entry in entries {
            claim(&mut taken, Collection::Kegel, &entry.timestamp)?;
            insert_kegel(&tx, entry)?;
        }
        tx.commit()?;
        Ok(())
    }

    // ---------------------------
    // Custom resources
    // ---------------------------

    pub fn resources(&self) -> AppResult<Vec<CustomResource>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, url, category FROM custom_resources ORDER BY id ASC")?;
        let rows = stmt.query_map([], |r| {
            Ok(CustomResource {
                id: r.get(0)?,
                title: r.get(1)?,
                url: r.get(2)?,
                category: r.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Upsert by id.
    pub fn put_resource(&self, resource: &CustomResource) -> AppResult<()> {
        self.conn.execute(
            "INSERT INTO custom_resources (id, title, url, category) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET title = ?2, url = ?3, category = ?4",
            params![resource.id, resource.title, resource.url, resource.category],
        )?;
        Ok(())
    }

    pub fn delete_resource(&self, id: &str) -> AppResult<()> {
        self.conn
            .execute("DELETE FROM custom_resources WHERE id = ?1", [id])?;
        Ok(())
    }

    pub fn resource_by_id(&self, id: &str) -> AppResult<Option<CustomResource>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, title, url, category FROM custom_resources WHERE id = ?1")?;
        let found = stmt
            .query_row([id], |r| {
                Ok(CustomResource {
                    id: r.get(0)?,
                    title: r.get(1)?,
                    url: r.get(2)?,
                    category: r.get(3)?,
                })
            })
            .optional()?;
        Ok(found)
    }
}

// ---------------------------
// Row mappers and insert helpers, shared with migrate/integrity/import
// ---------------------------

pub(crate) fn row_to_uro(row: &Row) -> rusqlite::Result<UroLogEntry> {
    let concerns_raw: Option<String> = row.get("concerns")?;
    let concerns = concerns_raw
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default();
    Ok(UroLogEntry {
        timestamp: row.get("timestamp")?,
        volume: row.get::<_, Option<f64>>("volume")?.unwrap_or(0.0),
        duration: row.get::<_, Option<f64>>("duration")?.unwrap_or(0.0),
        flow_rate: row.get::<_, Option<f64>>("flow_rate")?.unwrap_or(0.0),
        color: row.get::<_, Option<String>>("color")?.unwrap_or_default(),
        urgency: row.get::<_, Option<String>>("urgency")?.unwrap_or_default(),
        concerns,
        notes: row.get("notes")?,
        is_demo: row.get::<_, Option<bool>>("is_demo")?.unwrap_or(false),
    })
}

pub(crate) fn row_to_hydro(row: &Row) -> rusqlite::Result<HydroLogEntry> {
    Ok(HydroLogEntry {
        timestamp: row.get("timestamp")?,
        beverage_type: row.get::<_, Option<String>>("type")?.unwrap_or_default(),
        custom_type: row.get("custom_type")?,
        amount: row.get::<_, Option<f64>>("amount")?.unwrap_or(0.0),
        unit: row
            .get::<_, Option<String>>("unit")?
            .unwrap_or_else(|| "mL".to_string()),
        notes: row.get("notes")?,
        is_demo: row.get::<_, Option<bool>>("is_demo")?.unwrap_or(false),
    })
}

pub(crate) fn row_to_kegel(row: &Row) -> rusqlite::Result<KegelLogEntry> {
    Ok(KegelLogEntry {
        timestamp: row.get("timestamp")?,
        reps: row.get::<_, Option<i64>>("reps")?.unwrap_or(0),
        hold_time: row.get::<_, Option<f64>>("hold_time")?.unwrap_or(0.0),
        sets: row.get::<_, Option<i64>>("sets")?.unwrap_or(0),
        total_time: row.get::<_, Option<f64>>("total_time")?.unwrap_or(0.0),
        completed: row.get::<_, Option<bool>>("completed")?.unwrap_or(false),
        is_demo: row.get::<_, Option<bool>>("is_demo")?.unwrap_or(false),
    })
}

pub(crate) fn insert_uro(conn: &Connection, entry: &UroLogEntry) -> AppResult<()> {
    conn.execute(
        "INSERT INTO uro_logs (timestamp, volume, duration, flow_rate, color, urgency, concerns, notes, is_demo)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            entry.timestamp,
            entry.volume,
            entry.duration,
            entry.flow_rate,
            entry.color,
            entry.urgency,
            serde_json::to_string(&entry.concerns)?,
            entry.notes,
            entry.is_demo,
        ],
    )?;
    Ok(())
}

pub(crate) fn insert_hydro(conn: &Connection, entry: &HydroLogEntry) -> AppResult<()> {
    conn.execute(
        "INSERT INTO hydro_logs (timestamp, type, custom_type, amount, unit, notes, is_demo)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.timestamp,
            entry.beverage_type,
            entry.custom_type,
            entry.amount,
            entry.unit,
            entry.notes,
            entry.is_demo,
        ],
    )?;
    Ok(())
}

pub(crate) fn insert_kegel(conn: &Connection, entry: &KegelLogEntry) -> AppResult<()> {
    conn.execute(
        "INSERT INTO kegel_logs (timestamp, reps, hold_time, sets, total_time, completed, is_demo)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.timestamp,
            entry.reps,
            entry.hold_time,
            entry.sets,
            entry.total_time,
            entry.completed,
            entry.is_demo,
        ],
    )?;
    Ok(())
}

fn existing_timestamps(conn: &Connection, collection: Collection) -> AppResult<HashSet<String>> {
    let sql = format!("SELECT timestamp FROM {}", collection.table());
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |r| r.get::<_, String>(0))?;
    let mut set = HashSet::new();
    for row in rows {
        set.insert(row?);
    }
    Ok(set)
}

fn ensure_free(conn: &Connection, collection: Collection, timestamp: &str) -> AppResult<()> {
    let sql = format!("SELECT 1 FROM {} WHERE timestamp = ?1", collection.table());
    let mut stmt = conn.prepare_cached(&sql)?;
    if stmt.exists([timestamp])? {
        return Err(AppError::DuplicateTimestamp {
            collection: collection.table(),
            timestamp: timestamp.to_string(),
        });
    }
    Ok(())
}

fn claim(
    taken: &mut HashSet<String>,
    collection: Collection,
    timestamp: &str,
) -> AppResult<()> {
    if !taken.insert(timestamp.to_string()) {
        return Err(AppError::DuplicateTimestamp {
            collection: collection.table(),
            timestamp: timestamp.to_string(),
        });
    }
    Ok(())
}
