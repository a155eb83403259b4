use serde::{Deserialize, Serialize};

pub const DEFAULT_CENTER_ID: &str = "DEFAULT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationCenterRecord {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "addressLine1", default)]
    pub address_line1: Option<String>,

    #[serde(rename = "addressLine2", default)]
    pub address_line2: Option<String>,

    #[serde(rename = "addressLine3", default)]
    pub address_line3: Option<String>,

    #[serde(rename = "langCode", default)]
    pub lang_code: String,
}

impl RegistrationCenterRecord {
    /// Terminal fallback value when every lookup in the chain misses.
    /// Never persisted anywhere.
    pub fn default_record(lang_code: &str) -> Self {
        Self {
            id: DEFAULT_CENTER_ID.to_string(),
            name: "Registration Center".to_string(),
            address_line1: Some("Address unavailable".to_string()),
            address_line2: None,
            address_line3: None,
            lang_code: lang_code.to_string(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_CENTER_ID
    }

    /// Address lines 1-3 joined with single spaces, absent lines skipped.
    pub fn full_address(&self) -> String {
        [
            self.address_line1.as_deref(),
            self.address_line2.as_deref(),
            self.address_line3.as_deref(),
        ]
        .iter()
        .flatten()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}
