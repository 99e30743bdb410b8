//! One-shot, idempotent promotion of data from prior storage shapes into
//! the current collections.
//!
//! Three independent paths, run in order whenever the store opens:
//!   1. schema upgrades for databases created before version 3,
//!   2. bulk copy from legacy tables (pre-structured layout),
//!   3. split-migration of the legacy flat-entries blob in KV storage.
//!
//! A failure in one legacy-table copy is caught and logged; the remaining
//! tables still migrate. Each copy runs inside its own transaction, so a
//! failed copy rolls back completely, the legacy table is kept, and the
//! next open retries it.

use crate::db::{Collection, Store, insert_hydro, insert_kegel, insert_uro, log, schema};
use crate::errors::{AppError, AppResult};
use crate::kv::{KvStore, LEGACY_ENTRIES_KEY};
use crate::models::{HydroLogEntry, UroLogEntry};
use crate::ui::messages::{success, warning};
use crate::utils::timestamp::dedupe_timestamp;
use rusqlite::Connection;
use serde::Deserialize;
use std::collections::HashSet;

/// Legacy table names and the collection each one feeds.
const LEGACY_TABLES: [(&str, Collection); 3] = [
    ("flow_entries", Collection::Uro),
    ("fluid_intake_entries", Collection::Hydro),
    ("kegel_entries", Collection::Kegel),
];

/// Public entry point: run all pending migrations.
///
/// Invoked from `Store::open()` before anything trusts reads.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    upgrade_legacy_columns(conn)?;
    migrate_legacy_tables(conn);
    align_schema_version(conn)?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name = ?1")?;
    stmt.exists([name])
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

fn row_count(conn: &Connection, table: &str) -> rusqlite::Result<i64> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
}

/// Databases created before version 3 may lack columns added later.
/// Each add is tagged in the log table so it runs exactly once.
fn upgrade_legacy_columns(conn: &Connection) -> AppResult<()> {
    apply_column_add(
        conn,
        "20240412_0002_add_custom_type",
        "hydro_logs",
        "custom_type",
        "ALTER TABLE hydro_logs ADD COLUMN custom_type TEXT;",
    )?;
    for table in ["uro_logs", "hydro_logs", "kegel_logs"] {
        apply_column_add(
            conn,
            &format!("20240918_0003_add_is_demo_{table}"),
            table,
            "is_demo",
            &format!("ALTER TABLE {table} ADD COLUMN is_demo INTEGER NOT NULL DEFAULT 0;"),
        )?;
    }
    Ok(())
}

fn apply_column_add(
    conn: &Connection,
    version: &str,
    table: &str,
    column: &str,
    sql: &str,
) -> AppResult<()> {
    if log::has_log_entry(conn, "migration_applied", version)? {
        return Ok(());
    }
    if !table_has_column(conn, table, column)? {
        conn.execute_batch(sql)?;
        success(format!(
            "Migration applied: {version} → added '{column}' to {table}"
        ));
    }
    log::ttlog(
        conn,
        "migration_applied",
        version,
        &format!("Ensured column {column} on {table}"),
    )?;
    Ok(())
}

/// Copy every non-empty legacy table into its current collection.
///
/// Skipped entirely once every current collection holds data; per table,
/// a copy runs only while its target collection is empty, so a populated
/// collection is never overwritten. Errors are caught per table so one bad
/// legacy table does not abort its siblings.
pub fn migrate_legacy_tables(conn: &Connection) {
    let all_populated = Collection::ALL.iter().all(|c| {
        row_count(conn, c.table()).map(|n| n > 0).unwrap_or(false)
    });
    if all_populated {
        return;
    }

    for (legacy, target) in LEGACY_TABLES {
        match copy_legacy_table(conn, legacy, target) {
            Ok(0) => {}
            Ok(n) => {
                success(format!("Migrated {n} records from {legacy} into {}", target.table()));
                let _ = log::ttlog(
                    conn,
                    "legacy_table_migrated",
                    legacy,
                    &format!("Copied {n} records into {}", target.table()),
                );
            }
            Err(e) => {
                warning(format!("Migration of {legacy} failed: {e}"));
                let _ = log::ttlog(conn, "legacy_table_error", legacy, &e.to_string());
            }
        }
    }
}

/// Copy one legacy table. Colliding timestamps within the legacy data are
/// perturbed by +1 ms before insertion rather than overwritten or rejected.
/// The legacy table itself is dropped later by the schema version upgrade.
///
/// The whole copy is one transaction: an error rolls every copied row back,
/// leaving the target empty and the legacy table eligible for a retry on
/// the next open.
fn copy_legacy_table(conn: &Connection, legacy: &str, target: Collection) -> AppResult<i64> {
    if !table_exists(conn, legacy)? || row_count(conn, legacy)? == 0 {
        return Ok(0);
    }
    if row_count(conn, target.table())? > 0 {
        return Ok(0);
    }

    let tx = conn.unchecked_transaction()?;
    let migrated = copy_legacy_rows(&tx, legacy, target)?;
    tx.commit()?;
    Ok(migrated)
}

fn copy_legacy_rows(conn: &Connection, legacy: &str, target: Collection) -> AppResult<i64> {
    let mut taken = HashSet::new();
    let mut migrated = 0i64;

    match target {
        Collection::Uro => {
            let mut stmt = conn.prepare(&format!(
                "SELECT timestamp, volume, duration, flow_rate, color, urgency, notes FROM {legacy} ORDER BY rowid ASC"
            ))?;
            let rows = stmt.query_map([], |r| {
                Ok(UroLogEntry {
                    timestamp: r.get(0)?,
                    volume: r.get::<_, Option<f64>>(1)?.unwrap_or(0.0),
                    duration: r.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                    flow_rate: r.get::<_, Option<f64>>(3)?.unwrap_or(0.0),
                    color: r.get::<_, Option<String>>(4)?.unwrap_or_default(),
                    urgency: r.get::<_, Option<String>>(5)?.unwrap_or_default(),
                    concerns: Vec::new(),
                    notes: r.get(6)?,
                    is_demo: false,
                })
            })?;
            for row in rows {
                let mut entry = row?;
                entry.timestamp = dedupe_timestamp(&entry.timestamp, &mut taken)?;
                insert_uro(conn, &entry)?;
                migrated += 1;
            }
        }
        Collection::Hydro => {
            let mut stmt = conn.prepare(&format!(
                "SELECT timestamp, type, amount, unit, notes FROM {legacy} ORDER BY rowid ASC"
            ))?;
            let rows = stmt.query_map([], |r| {
                Ok(HydroLogEntry {
                    timestamp: r.get(0)?,
                    beverage_type: r.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    custom_type: None,
                    amount: r.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                    unit: r
                        .get::<_, Option<String>>(3)?
                        .unwrap_or_else(|| "mL".to_string()),
                    notes: r.get(4)?,
                    is_demo: false,
                })
            })?;
            for row in rows {
                let mut entry = row?;
                entry.timestamp = dedupe_timestamp(&entry.timestamp, &mut taken)?;
                insert_hydro(conn, &entry)?;
                migrated += 1;
            }
        }
        Collection::Kegel => {
            let mut stmt = conn.prepare(&format!(
                "SELECT timestamp, reps, hold_time, sets, total_time, completed FROM {legacy} ORDER BY rowid ASC"
            ))?;
            let rows = stmt.query_map([], |r| {
                Ok(crate::models::KegelLogEntry {
                    timestamp: r.get(0)?,
                    reps: r.get::<_, Option<i64>>(1)?.unwrap_or(0),
                    hold_time: r.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                    sets: r.get::<_, Option<i64>>(3)?.unwrap_or(0),
                    total_time: r.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
                    completed: r.get::<_, Option<bool>>(5)?.unwrap_or(false),
                    is_demo: false,
                })
            })?;
            for row in rows {
                let mut entry = row?;
                entry.timestamp = dedupe_timestamp(&entry.timestamp, &mut taken)?;
                insert_kegel(conn, &entry)?;
                migrated += 1;
            }
        }
    }

    Ok(migrated)
}

/// Drop legacy tables whose data has been promoted (or that never held any)
/// and stamp the current schema version. A legacy table still holding
/// unmigrated data is left alone.
fn align_schema_version(conn: &Connection) -> AppResult<()> {
    for (legacy, target) in LEGACY_TABLES {
        if !table_exists(conn, legacy)? {
            continue;
        }
        let safe_to_drop =
            row_count(conn, legacy)? == 0 || row_count(conn, target.table())? > 0;
        if safe_to_drop {
            conn.execute_batch(&format!("DROP TABLE {legacy};"))?;
            success(format!("Dropped obsolete {legacy} table."));
        }
    }
    conn.execute_batch(&format!("PRAGMA user_version = {};", schema::SCHEMA_VERSION))?;
    Ok(())
}

// ---------------------------
// Legacy KV blob migration
// ---------------------------

/// Shape of one record in the legacy flat-entries blob. Each entry is a
/// urination event that may carry embedded fluid-intake data.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyEntry {
    timestamp: String,
    #[serde(default)]
    volume: f64,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    flow_rate: f64,
    #[serde(default)]
    color: String,
    #[serde(default)]
    urgency: String,
    #[serde(default)]
    concerns: Vec<String>,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    fluid_intake: Option<LegacyFluidIntake>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyFluidIntake {
    #[serde(rename = "type", default)]
    beverage_type: String,
    #[serde(default)]
    custom_type: Option<String>,
    #[serde(default)]
    amount: f64,
    #[serde(default)]
    unit: Option<String>,
}

/// Promote the legacy flat-entries blob from KV storage.
///
/// Each legacy entry becomes a UroLogEntry plus, when it embeds fluid
/// intake, a companion HydroLogEntry sharing the same de-duplicated
/// timestamp. The legacy key is removed only after the migration has
/// committed; a failed parse or insert leaves the blob in place so no
/// legacy data is silently lost.
pub fn migrate_legacy_kv(store: &mut Store, kv: &KvStore) -> AppResult<usize> {
    if !kv.contains(LEGACY_ENTRIES_KEY) {
        return Ok(0);
    }
    if store.count(Collection::Uro)? > 0 {
        warning("Legacy entries blob present but uro logs are not empty; skipping migration.");
        return Ok(0);
    }

    let legacy: Vec<LegacyEntry> = kv
        .read_json(LEGACY_ENTRIES_KEY)?
        .ok_or_else(|| AppError::Migration("legacy entries blob vanished mid-read".into()))?;

    let mut taken: HashSet<String> = HashSet::new();
    let mut uro_batch = Vec::with_capacity(legacy.len());
    let mut hydro_batch = Vec::new();

    for entry in legacy {
        let ts = dedupe_timestamp(&entry.timestamp, &mut taken)?;
        if let Some(fluid) = &entry.fluid_intake {
            hydro_batch.push(HydroLogEntry {
                timestamp: ts.clone(), // companion shares the uro entry's key
                beverage_type: fluid.beverage_type.clone(),
                custom_type: fluid.custom_type.clone(),
                amount: fluid.amount,
                unit: fluid.unit.clone().unwrap_or_else(|| "mL".to_string()),
                notes: None,
                is_demo: false,
            });
        }
        uro_batch.push(UroLogEntry {
            timestamp: ts,
            volume: entry.volume,
            duration: entry.duration,
            flow_rate: entry.flow_rate,
            color: entry.color,
            urgency: entry.urgency,
            concerns: entry.concerns,
            notes: entry.notes,
            is_demo: false,
        });
    }

    let migrated = uro_batch.len();
    store.bulk_add_uro(&uro_batch)?;
    store.bulk_add_hydro(&hydro_batch)?;

    let _ = log::ttlog(
        &store.conn,
        "legacy_kv_migrated",
        LEGACY_ENTRIES_KEY,
        &format!(
            "Split {} legacy entries ({} with fluid intake)",
            migrated,
            hydro_batch.len()
        ),
    );
    kv.remove(LEGACY_ENTRIES_KEY)?;
    success(format!("Migrated {migrated} legacy entries from simple storage."));
    Ok(migrated)
}
