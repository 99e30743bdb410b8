//! Auto-backup snapshots: a safety net against accidental data loss,
//! independent of the primary store's own durability.
//!
//! A snapshot serializes all three log collections into a single JSON blob
//! in KV storage, overwritten wholesale on every run. Restoration happens
//! only into a completely empty store; never a merge, never an overwrite
//! of live data. The CLI restores on startup when the store is empty and
//! snapshots after mutating commands; an embedding app is expected to run
//! the same calls on a timer (see `Config::auto_backup_minutes`) and to
//! cancel that timer on teardown.

use crate::db::{Store, log};
use crate::kv::{AUTO_BACKUP_KEY, KvStore};
use crate::models::{HydroLogEntry, KegelLogEntry, UroLogEntry};
use crate::ui::messages::warning;
use crate::utils::timestamp;
use serde::{Deserialize, Serialize};

/// Full-store snapshot captured at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoBackupSnapshot {
    pub timestamp: String,
    #[serde(default)]
    pub uro_logs: Vec<UroLogEntry>,
    #[serde(default)]
    pub hydro_logs: Vec<HydroLogEntry>,
    #[serde(default)]
    pub kegel_logs: Vec<KegelLogEntry>,
}

/// Serialize the whole store into the auto-backup key.
///
/// Returns false without writing when all three collections are empty
/// (nothing to back up; and an older backup must not be clobbered by an
/// empty one). Any caught error is reported and also yields false.
pub fn create_auto_backup(store: &Store, kv: &KvStore) -> bool {
    let result = (|| -> crate::errors::AppResult<bool> {
        if store.database_counts()?.total() == 0 {
            return Ok(false);
        }
        let snapshot = AutoBackupSnapshot {
            timestamp: timestamp::now_rfc3339(),
            uro_logs: store.uro_logs()?,
            hydro_logs: store.hydro_logs()?,
            kegel_logs: store.kegel_logs()?,
        };
        kv.write_json(AUTO_BACKUP_KEY, &snapshot)?;
        let _ = log::ttlog(
            &store.conn,
            "auto_backup",
            AUTO_BACKUP_KEY,
            &format!(
                "Snapshot written ({} uro, {} hydro, {} kegel)",
                snapshot.uro_logs.len(),
                snapshot.hydro_logs.len(),
                snapshot.kegel_logs.len()
            ),
        );
        Ok(true)
    })();

    match result {
        Ok(written) => written,
        Err(e) => {
            warning(format!("Auto-backup failed: {e}"));
            false
        }
    }
}

pub fn has_auto_backup(kv: &KvStore) -> bool {
    kv.contains(AUTO_BACKUP_KEY)
}

/// Read back the snapshot, if any.
pub fn read_auto_backup(kv: &KvStore) -> Option<AutoBackupSnapshot> {
    kv.read_json(AUTO_BACKUP_KEY).ok().flatten()
}

/// Restore the snapshot into the live store.
///
/// Eligible only when ALL three live collections are empty; with any data
/// present this returns false and modifies nothing. Returns true once the
/// snapshot's records are back in place.
pub fn restore_from_auto_backup(store: &mut Store, kv: &KvStore) -> bool {
    let snapshot = match read_auto_backup(kv) {
        Some(s) => s,
        None => return false,
    };

    let result = (|| -> crate::errors::AppResult<bool> {
        let counts = store.database_counts()?;
        if counts.total() != 0 {
            return Ok(false);
        }
        if !snapshot.uro_logs.is_empty() {
            store.bulk_add_uro(&snapshot.uro_logs)?;
        }
        if !snapshot.hydro_logs.is_empty() {
            store.bulk_add_hydro(&snapshot.hydro_logs)?;
        }
        if !snapshot.kegel_logs.is_empty() {
            store.bulk_add_kegel(&snapshot.kegel_logs)?;
        }
        let _ = log::ttlog(
            &store.conn,
            "auto_restore",
            AUTO_BACKUP_KEY,
            &format!("Restored snapshot taken at {}", snapshot.timestamp),
        );
        Ok(true)
    })();

    match result {
        Ok(restored) => restored,
        Err(e) => {
            warning(format!("Restore from auto-backup failed: {e}"));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Collection;
    use crate::db::test_util::{sample_hydro, sample_kegel, sample_uro, temp_store};
    use std::env;
    use std::fs;

    fn temp_kv(name: &str) -> KvStore {
        let dir = env::temp_dir().join(format!("{name}_flowtracker_kv"));
        fs::remove_dir_all(&dir).ok();
        KvStore::open(dir).unwrap()
    }

    #[test]
    fn empty_store_backup_is_refused_and_writes_nothing() {
        let store = temp_store("snapshot_empty_guard");
        let kv = temp_kv("snapshot_empty_guard");
        // unrelated pre-existing blob stays untouched
        kv.write_raw("unrelated", "{}").unwrap();

        assert!(!create_auto_backup(&store, &kv));
        assert!(!has_auto_backup(&kv));
        assert!(kv.contains("unrelated"));
    }

    #[test]
    fn backup_round_trip_reproduces_all_collections() {
        let mut store = temp_store("snapshot_round_trip");
        let kv = temp_kv("snapshot_round_trip");
        store.add_uro(&sample_uro("2025-01-01T08:00:00.000Z")).unwrap();
        store.add_uro(&sample_uro("2025-01-01T12:00:00.000Z")).unwrap();
        store.add_hydro(&sample_hydro("2025-01-01T09:00:00.000Z")).unwrap();
        store.add_kegel(&sample_kegel("2025-01-01T07:00:00.000Z")).unwrap();

        assert!(create_auto_backup(&store, &kv));
        let before_uro = store.uro_logs().unwrap();

        // simulated data loss
        for c in Collection::ALL {
            store.delete_all(c).unwrap();
        }
        assert_eq!(store.database_counts().unwrap().total(), 0);

        assert!(restore_from_auto_backup(&mut store, &kv));
        assert_eq!(store.uro_logs().unwrap(), before_uro);
        assert_eq!(store.count(Collection::Hydro).unwrap(), 1);
        assert_eq!(store.count(Collection::Kegel).unwrap(), 1);
    }

    #[test]
    fn restore_refuses_any_nonempty_collection() {
        let mut store = temp_store("snapshot_nonempty_guard");
        let kv = temp_kv("snapshot_nonempty_guard");
        store.add_uro(&sample_uro("2025-01-01T08:00:00.000Z")).unwrap();
        assert!(create_auto_backup(&store, &kv));

        // only one collection holds data, the others are empty; still refused
        store.delete_all(Collection::Hydro).unwrap();
        store.delete_all(Collection::Kegel).unwrap();

        assert!(!restore_from_auto_backup(&mut store, &kv));
        assert_eq!(store.count(Collection::Uro).unwrap(), 1);
    }

    #[test]
    fn restore_without_snapshot_returns_false() {
        let mut store = temp_store("snapshot_absent");
        let kv = temp_kv("snapshot_absent");
        assert!(!restore_from_auto_backup(&mut store, &kv));
    }

    #[test]
    fn snapshots_overwrite_wholesale() {
        let mut store = temp_store("snapshot_overwrite");
        let kv = temp_kv("snapshot_overwrite");
        store.add_uro(&sample_uro("2025-01-01T08:00:00.000Z")).unwrap();
        assert!(create_auto_backup(&store, &kv));

        store.add_uro(&sample_uro("2025-01-02T08:00:00.000Z")).unwrap();
        assert!(create_auto_backup(&store, &kv));

        let snapshot = read_auto_backup(&kv).unwrap();
        assert_eq!(snapshot.uro_logs.len(), 2);
    }
}
