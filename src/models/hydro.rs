use serde::{Deserialize, Serialize};

/// A fluid-intake event, keyed by its ISO-8601 timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HydroLogEntry {
    pub timestamp: String, // unique within hydro_logs
    #[serde(rename = "type")]
    pub beverage_type: String,
    /// Free-form label used when `beverage_type` is "Other".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_type: Option<String>,
    pub amount: f64,
    #[serde(default = "default_unit")]
    pub unit: String, // "mL" | "oz"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_demo: bool,
}

fn default_unit() -> String {
    "mL".to_string()
}

impl HydroLogEntry {
    /// Amount normalized to millilitres.
    pub fn amount_ml(&self) -> f64 {
        if self.unit == "oz" {
            self.amount * 29.5735
        } else {
            self.amount
        }
    }

    /// Display label: the custom label wins for "Other" beverages.
    pub fn label(&self) -> &str {
        match &self.custom_type {
            Some(custom) if self.beverage_type == "Other" && !custom.is_empty() => custom,
            _ => &self.beverage_type,
        }
    }
}
