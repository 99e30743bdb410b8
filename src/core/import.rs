//! Import: two distinctly-named operations instead of one overloaded entry
//! point.
//!
//! * `merge_import`; the canonical user-facing path. Duplicate-skip
//!   semantics: existing `entryType_timestamp` keys are never touched,
//!   only genuinely new records are inserted.
//! * `restore_snapshot`; full-snapshot restore. Clears each collection
//!   present in the document and replaces it wholesale. Destructive by
//!   design and labeled as such at the CLI.
//!
//! Both validate the document shape before any mutation is attempted.

use crate::db::{Collection, Store, insert_hydro, insert_kegel, insert_uro, log};
use crate::errors::{AppError, AppResult};
use crate::kv::{APP_CONFIG_KEY, KvStore};
use crate::models::app_config::{OrderMaps, StatusMaps};
use crate::models::{AppConfig, CustomResource, HydroLogEntry, KegelLogEntry, LogEntry, UroLogEntry};
use serde::Deserialize;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDocument {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub data: Option<ImportData>,
    /// Flat alternative to `data`: a tagged entry list.
    #[serde(default)]
    pub entries: Option<Vec<LogEntry>>,
    #[serde(default)]
    pub configuration: Option<AppConfig>,
    #[serde(default)]
    pub metadata: Option<ImportMetadata>,
}

/// Collections are Options so "present but empty" and "absent" stay
/// distinguishable; restore only clears collections the document names.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportData {
    #[serde(default)]
    pub uro_logs: Option<Vec<UroLogEntry>>,
    #[serde(default)]
    pub hydro_logs: Option<Vec<HydroLogEntry>>,
    #[serde(default)]
    pub kegel_logs: Option<Vec<KegelLogEntry>>,
    #[serde(default)]
    pub custom_resources: Option<Vec<CustomResource>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMetadata {
    #[serde(default)]
    pub display_order: OrderMaps,
    #[serde(default)]
    pub active_status: StatusMaps,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MergeReport {
    pub imported: usize,
    pub skipped: usize,
    pub resources: usize,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RestoreReport {
    pub uro_logs: usize,
    pub hydro_logs: usize,
    pub kegel_logs: usize,
    pub resources: usize,
}

/// Parse and validate an import document.
///
/// The shape check happens here, synchronously, before any store mutation:
/// the top level must be an object carrying either a `data` map of arrays
/// or an `entries` array. Anything else fails with ImportValidation.
pub fn parse_import(raw: &str) -> AppResult<ImportDocument> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| AppError::ImportValidation(format!("not valid JSON: {e}")))?;

    let obj = value
        .as_object()
        .ok_or_else(|| AppError::ImportValidation("top level must be an object".into()))?;

    let has_data = obj.get("data").map(|d| d.is_object()).unwrap_or(false);
    let has_entries = obj.get("entries").map(|e| e.is_array()).unwrap_or(false);
    if !has_data && !has_entries {
        return Err(AppError::ImportValidation(
            "document must contain a 'data' map or an 'entries' array".into(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::ImportValidation(format!("unexpected document shape: {e}")))
}

/// Flatten the document into one tagged entry list, whichever form it used.
fn collect_entries(doc: &ImportDocument) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    if let Some(data) = &doc.data {
        for e in data.uro_logs.iter().flatten() {
            entries.push(LogEntry::Uro(e.clone()));
        }
        for e in data.hydro_logs.iter().flatten() {
            entries.push(LogEntry::Hydro(e.clone()));
        }
        for e in data.kegel_logs.iter().flatten() {
            entries.push(LogEntry::Kegel(e.clone()));
        }
    }
    if let Some(flat) = &doc.entries {
        entries.extend(flat.iter().cloned());
    }
    entries
}

/// Duplicate-skip merge: the canonical "Import Data" semantics.
pub fn merge_import(store: &mut Store, kv: &KvStore, doc: &ImportDocument) -> AppResult<MergeReport> {
    let mut existing: HashSet<String> = HashSet::new();
    for ts in store.timestamps(Collection::Uro)? {
        existing.insert(format!("uroLog_{ts}"));
    }
    for ts in store.timestamps(Collection::Hydro)? {
        existing.insert(format!("hydroLog_{ts}"));
    }
    for ts in store.timestamps(Collection::Kegel)? {
        existing.insert(format!("kegelLog_{ts}"));
    }

    let mut new_uro = Vec::new();
    let mut new_hydro = Vec::new();
    let mut new_kegel = Vec::new();
    let mut report = MergeReport::default();

    for entry in collect_entries(doc) {
        // duplicates inside the document itself are skipped the same way
        if !existing.insert(entry.dedupe_key()) {
            report.skipped += 1;
            continue;
        }
        report.imported += 1;
        match entry {
            LogEntry::Uro(e) => new_uro.push(e),
            LogEntry::Hydro(e) => new_hydro.push(e),
            LogEntry::Kegel(e) => new_kegel.push(e),
        }
    }

    if !new_uro.is_empty() {
        store.bulk_add_uro(&new_uro)?;
    }
    if !new_hydro.is_empty() {
        store.bulk_add_hydro(&new_hydro)?;
    }
    if !new_kegel.is_empty() {
        store.bulk_add_kegel(&new_kegel)?;
    }

    if let Some(data) = &doc.data {
        for resource in data.custom_resources.iter().flatten() {
            store.put_resource(resource)?;
            report.resources += 1;
        }
    }

    apply_config_metadata(kv, doc)?;

    let _ = log::ttlog(
        &store.conn,
        "import_merge",
        "",
        &format!(
            "Merged {} entries, skipped {} duplicates",
            report.imported, report.skipped
        ),
    );
    Ok(report)
}

/// Full-snapshot restore: clear-and-replace each collection the document
/// names, wholesale, one transaction per collection.
pub fn restore_snapshot(
    store: &mut Store,
    kv: &KvStore,
    doc: &ImportDocument,
) -> AppResult<RestoreReport> {
    let mut report = RestoreReport::default();

    // The flat `entries` form has no explicit collection map: group it and
    // replace only the collections that actually appear.
    let mut data = ImportData::default();
    if let Some(map) = &doc.data {
        data.uro_logs = map.uro_logs.clone();
        data.hydro_logs = map.hydro_logs.clone();
        data.kegel_logs = map.kegel_logs.clone();
        data.custom_resources = map.custom_resources.clone();
    } else if let Some(flat) = &doc.entries {
        for entry in flat {
            match entry {
                LogEntry::Uro(e) => data.uro_logs.get_or_insert_with(Vec::new).push(e.clone()),
                LogEntry::Hydro(e) => data.hydro_logs.get_or_insert_with(Vec::new).push(e.clone()),
                LogEntry::Kegel(e) => data.kegel_logs.get_or_insert_with(Vec::new).push(e.clone()),
            }
        }
    }

    if let Some(rows) = &data.uro_logs {
        replace_collection(store, Collection::Uro, rows, insert_uro)?;
        report.uro_logs = rows.len();
    }
    if let Some(rows) = &data.hydro_logs {
        replace_collection(store, Collection::Hydro, rows, insert_hydro)?;
        report.hydro_logs = rows.len();
    }
    if let Some(rows) = &data.kegel_logs {
        replace_collection(store, Collection::Kegel, rows, insert_kegel)?;
        report.kegel_logs = rows.len();
    }
    if let Some(resources) = &data.custom_resources {
        let tx = store.conn.transaction()?;
        tx.execute("DELETE FROM custom_resources", [])?;
        for resource in resources {
            tx.execute(
                "INSERT INTO custom_resources (id, title, url, category) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![resource.id, resource.title, resource.url, resource.category],
            )?;
        }
        tx.commit()?;
        report.resources = resources.len();
    }

    // A snapshot restore may also carry the configuration tree verbatim.
    if let Some(configuration) = &doc.configuration {
        kv.write_json(APP_CONFIG_KEY, configuration)?;
    }
    apply_config_metadata(kv, doc)?;

    let _ = log::ttlog(
        &store.conn,
        "import_restore",
        "",
        &format!(
            "Snapshot restored ({} uro, {} hydro, {} kegel)",
            report.uro_logs, report.hydro_logs, report.kegel_logs
        ),
    );
    Ok(report)
}

fn replace_collection<T>(
    store: &mut Store,
    collection: Collection,
    rows: &[T],
    insert: impl Fn(&rusqlite::Connection, &T) -> AppResult<()>,
) -> AppResult<()> {
    let tx = store.conn.transaction()?;
    tx.execute(&format!("DELETE FROM {}", collection.table()), [])?;
    for row in rows {
        insert(&tx, row)?;
    }
    tx.commit()?;
    Ok(())
}

/// Patch the stored AppConfig from the document's projections, merging
/// only the paths present in the import.
fn apply_config_metadata(kv: &KvStore, doc: &ImportDocument) -> AppResult<()> {
    let metadata = match &doc.metadata {
        Some(m) => m,
        None => return Ok(()),
    };
    let mut config: AppConfig = match kv.read_json(APP_CONFIG_KEY)? {
        Some(c) => c,
        None => return Ok(()), // nothing stored to patch
    };
    config.apply_metadata(&metadata.display_order, &metadata.active_status);
    kv.write_json(APP_CONFIG_KEY, &config)?;
    Ok(())
}
