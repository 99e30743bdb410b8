//! Layered UI configuration: pages → sections → tabs → fields.
//!
//! The core does not own this structure; it is stored verbatim in the KV
//! store and passed through export/import. Export additionally flattens it
//! into path→order and path→enabled projections, and import patches the
//! stored tree path-by-path without deleting unrelated config.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub pages: Vec<PageConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    pub id: String,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionConfig {
    pub id: String,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub tabs: Vec<TabConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabConfig {
    pub id: String,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    pub id: String,
    #[serde(default)]
    pub display_order: i64,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

/// Flat path→displayOrder maps for sections, tabs and fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderMaps {
    #[serde(default)]
    pub tabs: BTreeMap<String, i64>,
    #[serde(default)]
    pub sections: BTreeMap<String, i64>,
    #[serde(default)]
    pub fields: BTreeMap<String, i64>,
}

/// Flat path→enabled maps, parallel to [`OrderMaps`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusMaps {
    #[serde(default)]
    pub tabs: BTreeMap<String, bool>,
    #[serde(default)]
    pub sections: BTreeMap<String, bool>,
    #[serde(default)]
    pub fields: BTreeMap<String, bool>,
}

impl AppConfig {
    /// Walk the tree and build the `displayOrder` projections.
    /// Paths are dot-joined ids: `page.section`, `page.section.tab`, ...
    pub fn order_maps(&self) -> OrderMaps {
        let mut maps = OrderMaps::default();
        for page in &self.pages {
            for section in &page.sections {
                let section_path = format!("{}.{}", page.id, section.id);
                maps.sections
                    .insert(section_path.clone(), section.display_order);
                for tab in &section.tabs {
                    let tab_path = format!("{}.{}", section_path, tab.id);
                    maps.tabs.insert(tab_path.clone(), tab.display_order);
                    for field in &tab.fields {
                        maps.fields
                            .insert(format!("{}.{}", tab_path, field.id), field.display_order);
                    }
                }
            }
        }
        maps
    }

    /// Walk the tree and build the `activeStatus` projections.
    pub fn status_maps(&self) -> StatusMaps {
        let mut maps = StatusMaps::default();
        for page in &self.pages {
            for section in &page.sections {
                let section_path = format!("{}.{}", page.id, section.id);
                maps.sections.insert(section_path.clone(), section.enabled);
                for tab in &section.tabs {
                    let tab_path = format!("{}.{}", section_path, tab.id);
                    maps.tabs.insert(tab_path.clone(), tab.enabled);
                    for field in &tab.fields {
                        maps.fields
                            .insert(format!("{}.{}", tab_path, field.id), field.enabled);
                    }
                }
            }
        }
        maps
    }

    /// Patch the tree from imported projections. Only paths present in the
    /// maps are touched; everything else keeps its current value.
    pub fn apply_metadata(&mut self, orders: &OrderMaps, statuses: &StatusMaps) {
        for page in &mut self.pages {
            for section in &mut page.sections {
                let section_path = format!("{}.{}", page.id, section.id);
                if let Some(order) = orders.sections.get(&section_path) {
                    section.display_order = *order;
                }
                if let Some(enabled) = statuses.sections.get(&section_path) {
                    section.enabled = *enabled;
                }
                for tab in &mut section.tabs {
                    let tab_path = format!("{}.{}", section_path, tab.id);
                    if let Some(order) = orders.tabs.get(&tab_path) {
                        tab.display_order = *order;
                    }
                    if let Some(enabled) = statuses.tabs.get(&tab_path) {
                        tab.enabled = *enabled;
                    }
                    for field in &mut tab.fields {
                        let field_path = format!("{}.{}", tab_path, field.id);
                        if let Some(order) = orders.fields.get(&field_path) {
                            field.display_order = *order;
                        }
                        if let Some(enabled) = statuses.fields.get(&field_path) {
                            field.enabled = *enabled;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            pages: vec![PageConfig {
                id: "log".to_string(),
                display_order: 0,
                enabled: true,
                sections: vec![SectionConfig {
                    id: "entry".to_string(),
                    display_order: 1,
                    enabled: true,
                    tabs: vec![TabConfig {
                        id: "uro".to_string(),
                        display_order: 2,
                        enabled: true,
                        fields: vec![FieldConfig {
                            id: "volume".to_string(),
                            display_order: 3,
                            enabled: false,
                        }],
                    }],
                }],
            }],
        }
    }

    #[test]
    fn projections_use_dot_joined_paths() {
        let cfg = sample();
        let orders = cfg.order_maps();
        assert_eq!(orders.sections["log.entry"], 1);
        assert_eq!(orders.tabs["log.entry.uro"], 2);
        assert_eq!(orders.fields["log.entry.uro.volume"], 3);

        let statuses = cfg.status_maps();
        assert!(statuses.tabs["log.entry.uro"]);
        assert!(!statuses.fields["log.entry.uro.volume"]);
    }

    #[test]
    fn apply_metadata_only_touches_listed_paths() {
        let mut cfg = sample();
        let mut orders = OrderMaps::default();
        orders.tabs.insert("log.entry.uro".to_string(), 9);
        let mut statuses = StatusMaps::default();
        statuses
            .fields
            .insert("log.entry.uro.volume".to_string(), true);

        cfg.apply_metadata(&orders, &statuses);

        let tab = &cfg.pages[0].sections[0].tabs[0];
        assert_eq!(tab.display_order, 9);
        assert!(tab.fields[0].enabled);
        // untouched values survive
        assert_eq!(cfg.pages[0].sections[0].display_order, 1);
    }
}
