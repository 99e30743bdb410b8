//! Simple key-value storage: one JSON file per key, kept in a sidecar
//! directory next to the database file.
//!
//! This is the auxiliary storage plane, deliberately independent of SQLite:
//! it holds the legacy flat-entries blob (pre-migration source), the
//! auto-backup snapshot, the last-export marker and the AppConfig blob.

use crate::errors::AppResult;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

/// Legacy flat array of entries, consumed (then removed) by migration.
pub const LEGACY_ENTRIES_KEY: &str = "legacy-entries";
/// The auto-backup snapshot blob, overwritten wholesale on every snapshot.
pub const AUTO_BACKUP_KEY: &str = "auto-backup";
/// RFC 3339 instant of the most recent export.
pub const LAST_EXPORT_KEY: &str = "last-export";
/// The external AppConfig tree, stored verbatim.
pub const APP_CONFIG_KEY: &str = "app-config";

pub struct KvStore {
    dir: PathBuf,
}

impl KvStore {
    /// Open (creating if needed) the KV directory for the given database
    /// path: `flowtracker.sqlite` → `flowtracker.kv/`.
    pub fn for_database(db_path: &str) -> AppResult<Self> {
        let dir = Path::new(db_path).with_extension("kv");
        Self::open(dir)
    }

    pub fn open(dir: PathBuf) -> AppResult<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.file(key).exists()
    }

    /// Read and deserialize a key. Missing key → Ok(None).
    pub fn read_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let path = self.file(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Serialize and write a key, overwriting any previous value. The write
    /// goes through a temp file + rename so a crash never leaves a
    /// half-written blob under the real key.
    pub fn write_json<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        let path = self.file(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Remove a key. Removing a missing key is not an error.
    pub fn remove(&self, key: &str) -> AppResult<()> {
        let path = self.file(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }

    /// Raw string write, used by tests to seed legacy blobs.
    #[cfg(test)]
    pub fn write_raw(&self, key: &str, content: &str) -> AppResult<()> {
        fs::write(self.file(key), content)?;
        Ok(())
    }
}
