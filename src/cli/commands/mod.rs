pub mod add;
pub mod backup;
pub mod config;
pub mod db;
pub mod del;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod reset;
pub mod snapshot;

use crate::config::Config;
use crate::core::snapshot as auto_backup;
use crate::db::{Store, migrate};
use crate::errors::AppResult;
use crate::kv::KvStore;
use crate::ui::messages::{info, warning};

/// Standard startup sequence shared by every data-touching command:
/// open the store (schema init + migrations happen inside), promote any
/// legacy KV blob, then run the restore-on-empty pass of the auto-backup
/// service.
pub(crate) fn open_store(cfg: &Config) -> AppResult<(Store, KvStore)> {
    let mut store = Store::open(&cfg.database)?;
    let kv = KvStore::for_database(&cfg.database)?;

    // A broken legacy blob must not block the command; the key stays in
    // place for a later attempt.
    if let Err(e) = migrate::migrate_legacy_kv(&mut store, &kv) {
        warning(format!("Legacy entries migration failed: {e}"));
    }

    if auto_backup::restore_from_auto_backup(&mut store, &kv) {
        info("Restored records from the auto-backup snapshot.");
    }

    Ok((store, kv))
}

/// Refresh the auto-backup snapshot after a successful mutation.
/// Best-effort: a failed snapshot never fails the command that ran.
pub(crate) fn refresh_snapshot(store: &Store, kv: &KvStore) {
    auto_backup::create_auto_backup(store, kv);
}
