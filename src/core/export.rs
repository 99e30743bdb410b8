//! Portable export: serialize every collection plus the AppConfig
//! projections into a single versioned JSON document, or a flat CSV of
//! tagged entries.

use crate::db::{Store, log};
use crate::errors::{AppError, AppResult};
use crate::kv::{APP_CONFIG_KEY, KvStore, LAST_EXPORT_KEY};
use crate::models::app_config::{OrderMaps, StatusMaps};
use crate::models::{AppConfig, CustomResource, HydroLogEntry, KegelLogEntry, LogEntry, UroLogEntry};
use crate::ui::messages::{info, success};
use crate::utils::timestamp;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const EXPORT_VERSION: &str = "3.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub export_date: String,
    pub data: ExportData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<AppConfig>,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    #[serde(default)]
    pub uro_logs: Vec<UroLogEntry>,
    #[serde(default)]
    pub hydro_logs: Vec<HydroLogEntry>,
    #[serde(default)]
    pub kegel_logs: Vec<KegelLogEntry>,
    #[serde(default)]
    pub custom_resources: Vec<CustomResource>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    #[serde(default)]
    pub display_order: OrderMaps,
    #[serde(default)]
    pub active_status: StatusMaps,
}

/// Conventional output name: `flow-tracker-export-<YYYY-MM-DD>.json`.
pub fn default_export_filename() -> String {
    format!(
        "flow-tracker-export-{}.json",
        chrono::Utc::now().format("%Y-%m-%d")
    )
}

/// Assemble the export document from the store and the stored AppConfig.
pub fn build_export_document(store: &Store, kv: &KvStore) -> AppResult<ExportDocument> {
    let configuration: Option<AppConfig> = kv.read_json(APP_CONFIG_KEY)?;
    let metadata = match &configuration {
        Some(cfg) => ExportMetadata {
            display_order: cfg.order_maps(),
            active_status: cfg.status_maps(),
        },
        None => ExportMetadata::default(),
    };

    Ok(ExportDocument {
        version: EXPORT_VERSION.to_string(),
        export_date: timestamp::now_rfc3339(),
        data: ExportData {
            uro_logs: store.uro_logs()?,
            hydro_logs: store.hydro_logs()?,
            kegel_logs: store.kegel_logs()?,
            custom_resources: store.resources()?,
        },
        configuration,
        metadata,
    })
}

/// Write the JSON export document and record the last-export marker.
pub fn export_json(store: &Store, kv: &KvStore, file: &str, force: bool) -> AppResult<()> {
    let path = Path::new(file);
    ensure_writable(path, force)?;

    info(format!("Exporting to JSON: {}", path.display()));
    let document = build_export_document(store, kv)?;
    fs::write(path, serde_json::to_string_pretty(&document)?)?;

    kv.write_json(LAST_EXPORT_KEY, &document.export_date)?;
    let _ = log::ttlog(&store.conn, "export", file, "JSON export completed");
    success(format!("JSON export completed: {}", path.display()));
    Ok(())
}

/// Flat CSV row covering all three entry shapes; unused columns stay empty.
#[derive(Debug, Serialize)]
struct CsvRow {
    entry_type: &'static str,
    timestamp: String,
    volume: Option<f64>,
    duration: Option<f64>,
    flow_rate: Option<f64>,
    color: Option<String>,
    urgency: Option<String>,
    beverage_type: Option<String>,
    amount: Option<f64>,
    unit: Option<String>,
    reps: Option<i64>,
    hold_time: Option<f64>,
    sets: Option<i64>,
    total_time: Option<f64>,
    completed: Option<bool>,
    notes: Option<String>,
    is_demo: bool,
}

impl From<LogEntry> for CsvRow {
    fn from(entry: LogEntry) -> Self {
        let mut row = CsvRow {
            entry_type: entry.entry_type(),
            timestamp: entry.timestamp().to_string(),
            volume: None,
            duration: None,
            flow_rate: None,
            color: None,
            urgency: None,
            beverage_type: None,
            amount: None,
            unit: None,
            reps: None,
            hold_time: None,
            sets: None,
            total_time: None,
            completed: None,
            notes: None,
            is_demo: false,
        };
        match entry {
            LogEntry::Uro(e) => {
                row.volume = Some(e.volume);
                row.duration = Some(e.duration);
                row.flow_rate = Some(e.effective_flow_rate());
                row.color = Some(e.color);
                row.urgency = Some(e.urgency);
                row.notes = e.notes;
                row.is_demo = e.is_demo;
            }
            LogEntry::Hydro(e) => {
                row.beverage_type = Some(e.label().to_string());
                row.amount = Some(e.amount);
                row.unit = Some(e.unit.clone());
                row.notes = e.notes;
                row.is_demo = e.is_demo;
            }
            LogEntry::Kegel(e) => {
                row.reps = Some(e.reps);
                row.hold_time = Some(e.hold_time);
                row.sets = Some(e.sets);
                row.total_time = Some(e.total_time);
                row.completed = Some(e.completed);
                row.is_demo = e.is_demo;
            }
        }
        row
    }
}

/// Write all log entries as one flat CSV, ordered by timestamp.
pub fn export_csv(store: &Store, file: &str, force: bool) -> AppResult<()> {
    let path = Path::new(file);
    ensure_writable(path, force)?;

    info(format!("Exporting to CSV: {}", path.display()));

    let mut entries: Vec<LogEntry> = Vec::new();
    entries.extend(store.uro_logs()?.into_iter().map(LogEntry::Uro));
    entries.extend(store.hydro_logs()?.into_iter().map(LogEntry::Hydro));
    entries.extend(store.kegel_logs()?.into_iter().map(LogEntry::Kegel));
    entries.sort_by(|a, b| a.timestamp().cmp(b.timestamp()));

    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| AppError::Export(format!("CSV open error: {e}")))?;
    for entry in entries {
        wtr.serialize(CsvRow::from(entry))
            .map_err(|e| AppError::Export(format!("CSV write error: {e}")))?;
    }
    wtr.flush()
        .map_err(|e| AppError::Export(format!("CSV flush error: {e}")))?;

    let _ = log::ttlog(&store.conn, "export", file, "CSV export completed");
    success(format!("CSV export completed: {}", path.display()));
    Ok(())
}

fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if path.exists() && !force {
        return Err(AppError::Export(format!(
            "Output file already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    Ok(())
}
