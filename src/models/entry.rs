use super::{HydroLogEntry, KegelLogEntry, UroLogEntry};
use serde::{Deserialize, Serialize};

/// Tagged union over the three log collections.
///
/// The export file's flat `entries` form and the duplicate-skip import both
/// work on this type, so collection handling stays exhaustively checked
/// instead of going through an untyped field bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entryType")]
pub enum LogEntry {
    #[serde(rename = "uroLog")]
    Uro(UroLogEntry),
    #[serde(rename = "hydroLog")]
    Hydro(HydroLogEntry),
    #[serde(rename = "kegelLog")]
    Kegel(KegelLogEntry),
}

impl LogEntry {
    pub fn timestamp(&self) -> &str {
        match self {
            LogEntry::Uro(e) => &e.timestamp,
            LogEntry::Hydro(e) => &e.timestamp,
            LogEntry::Kegel(e) => &e.timestamp,
        }
    }

    pub fn entry_type(&self) -> &'static str {
        match self {
            LogEntry::Uro(_) => "uroLog",
            LogEntry::Hydro(_) => "hydroLog",
            LogEntry::Kegel(_) => "kegelLog",
        }
    }

    /// Key used by the duplicate-skip import: `<entryType>_<timestamp>`.
    pub fn dedupe_key(&self) -> String {
        format!("{}_{}", self.entry_type(), self.timestamp())
    }
}
