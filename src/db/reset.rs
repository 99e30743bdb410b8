//! Operator-invoked recovery from a corrupted store.
//!
//! Two mutually exclusive modes: clear every table but keep the schema, or
//! delete the database file and recreate it from scratch. The second mode
//! swaps the connection inside the shared `&mut Store`, so callers never
//! end up holding a handle to the deleted database.

use crate::db::{Store, log, schema};
use crate::errors::AppResult;
use rusqlite::Connection;
use std::fs;

#[derive(Debug, Clone, Copy, Default)]
pub struct ResetOptions {
    pub clear_data: bool,
    pub delete_database: bool,
}

#[derive(Debug, Clone)]
pub struct ResetOutcome {
    pub success: bool,
    pub message: String,
}

const DATA_TABLES: [&str; 4] = ["uro_logs", "hydro_logs", "kegel_logs", "custom_resources"];

/// Reset the database. Exactly one of the two modes is honored per call;
/// with neither flag set nothing happens and `success` is false.
pub fn reset_database(
    store: &mut Store,
    options: ResetOptions,
    mut on_progress: impl FnMut(&str),
) -> ResetOutcome {
    if options.clear_data {
        match clear_all_tables(store, &mut on_progress) {
            Ok(()) => ResetOutcome {
                success: true,
                message: "All data cleared; schema preserved.".to_string(),
            },
            Err(e) => ResetOutcome {
                success: false,
                message: format!("Clear failed: {e}"),
            },
        }
    } else if options.delete_database {
        match delete_and_recreate(store, &mut on_progress) {
            Ok(()) => ResetOutcome {
                success: true,
                message: "Database deleted and recreated.".to_string(),
            },
            Err(e) => ResetOutcome {
                success: false,
                message: format!("Delete failed: {e}"),
            },
        }
    } else {
        ResetOutcome {
            success: false,
            message: "No reset mode selected.".to_string(),
        }
    }
}

/// Clear every data table inside one transaction spanning all of them, so
/// a failure partway leaves the store in its pre-reset state.
fn clear_all_tables(store: &mut Store, on_progress: &mut impl FnMut(&str)) -> AppResult<()> {
    let tx = store.conn.transaction()?;
    for table in DATA_TABLES {
        tx.execute(&format!("DELETE FROM {table}"), [])?;
        on_progress(&format!("cleared {table}"));
    }
    tx.commit()?;
    let _ = log::ttlog(&store.conn, "reset", "clear_data", "All tables cleared");
    Ok(())
}

fn delete_and_recreate(store: &mut Store, on_progress: &mut impl FnMut(&str)) -> AppResult<()> {
    let path = store.path().to_path_buf();

    // Park the handle on an in-memory connection so the file handle closes
    // before the file is removed (Windows refuses to delete open files).
    let old = std::mem::replace(&mut store.conn, Connection::open_in_memory()?);
    drop(old);
    on_progress("closed connection");

    fs::remove_file(&path)?;
    // SQLite sidecar files, if the database ever ran in WAL mode
    for suffix in ["-wal", "-shm"] {
        let mut sidecar = path.as_os_str().to_owned();
        sidecar.push(suffix);
        let _ = fs::remove_file(std::path::PathBuf::from(sidecar));
    }
    on_progress("deleted database file");

    let conn = Connection::open(&path)?;
    schema::init_schema(&conn)?;
    store.conn = conn;
    on_progress("recreated schema");

    let _ = log::ttlog(
        &store.conn,
        "reset",
        "delete_database",
        "Database deleted and recreated",
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Collection;
    use crate::db::test_util::{sample_hydro, sample_uro, temp_store};

    #[test]
    fn clear_data_preserves_schema() {
        let mut store = temp_store("reset_clear");
        store.add_uro(&sample_uro("2025-01-01T08:00:00.000Z")).unwrap();
        store.add_hydro(&sample_hydro("2025-01-01T09:00:00.000Z")).unwrap();

        let tables_before = store.database_info().unwrap().table_names;

        let mut steps = Vec::new();
        let outcome = reset_database(
            &mut store,
            ResetOptions {
                clear_data: true,
                delete_database: false,
            },
            |s| steps.push(s.to_string()),
        );

        assert!(outcome.success);
        assert_eq!(steps.len(), DATA_TABLES.len());
        assert_eq!(store.database_counts().unwrap().total(), 0);
        assert_eq!(store.database_info().unwrap().table_names, tables_before);
    }

    #[test]
    fn delete_database_recreates_a_usable_store() {
        let mut store = temp_store("reset_delete");
        store.add_uro(&sample_uro("2025-01-01T08:00:00.000Z")).unwrap();

        let outcome = reset_database(
            &mut store,
            ResetOptions {
                clear_data: false,
                delete_database: true,
            },
            |_| {},
        );
        assert!(outcome.success);
        assert_eq!(store.count(Collection::Uro).unwrap(), 0);

        // the swapped-in handle is fully usable
        store.add_uro(&sample_uro("2025-02-01T08:00:00.000Z")).unwrap();
        assert_eq!(store.count(Collection::Uro).unwrap(), 1);
    }

    #[test]
    fn no_mode_selected_is_a_no_op() {
        let mut store = temp_store("reset_nomode");
        store.add_uro(&sample_uro("2025-01-01T08:00:00.000Z")).unwrap();

        let outcome = reset_database(&mut store, ResetOptions::default(), |_| {});
        assert!(!outcome.success);
        assert_eq!(store.count(Collection::Uro).unwrap(), 1);
    }
}
