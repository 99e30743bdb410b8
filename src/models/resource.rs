use serde::{Deserialize, Serialize};

/// A user-defined reference link (article, clinic, support group...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResource {
    pub id: String, // generated, unique
    pub title: String,
    pub url: String,
    pub category: String,
}

impl CustomResource {
    pub fn new(title: &str, url: &str, category: &str) -> Self {
        Self {
            id: generate_id(),
            title: title.to_string(),
            url: url.to_string(),
            category: category.to_string(),
        }
    }
}

/// Generated ids embed the creation instant so they stay unique and sortable.
fn generate_id() -> String {
    format!("res-{}", chrono::Utc::now().timestamp_micros())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = CustomResource::new("NHS overview", "https://example.org/a", "Education");
        std::thread::sleep(std::time::Duration::from_micros(2));
        let b = CustomResource::new("Support group", "https://example.org/b", "Community");
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("res-"));
    }
}
