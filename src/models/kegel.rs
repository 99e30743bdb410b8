use serde::{Deserialize, Serialize};

/// A kegel exercise session, keyed by its ISO-8601 timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KegelLogEntry {
    pub timestamp: String, // unique within kegel_logs
    pub reps: i64,
    pub hold_time: f64, // seconds per rep
    pub sets: i64,
    pub total_time: f64, // seconds
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub is_demo: bool,
}
