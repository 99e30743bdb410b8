use serde::{Deserialize, Serialize};

/// A single urination event, keyed by its ISO-8601 timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UroLogEntry {
    pub timestamp: String, // unique within uro_logs
    pub volume: f64,       // mL
    pub duration: f64,     // seconds
    #[serde(default)]
    pub flow_rate: f64, // mL/s; derived from volume/duration when absent
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub urgency: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concerns: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_demo: bool,
}

impl UroLogEntry {
    /// Flow rate, falling back to volume/duration when it was not stored.
    pub fn effective_flow_rate(&self) -> f64 {
        if self.flow_rate > 0.0 {
            self.flow_rate
        } else if self.duration > 0.0 {
            self.volume / self.duration
        } else {
            0.0
        }
    }
}
