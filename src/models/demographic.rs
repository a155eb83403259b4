use crate::models::notification::LocalizedValue;

/// Contact fields and name entries extracted from the identity document.
/// Contacts survive extraction only when they are individually
/// format-valid; everything else is dropped at parse time.
#[derive(Debug, Clone)]
pub struct DemographicRecord {
    pub pre_registration_id: String,
    pub lang_code: Option<String>,
    pub name_entries: Vec<LocalizedValue>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl DemographicRecord {
    /// First recorded name entry, the display default when no language
    /// preference applies.
    pub fn primary_name(&self) -> Option<&str> {
        self.name_entries.first().map(|entry| entry.value.as_str())
    }
}
