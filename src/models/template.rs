use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateEntry {
    #[serde(rename = "langCode")]
    pub lang_code: String,

    #[serde(rename = "templateTypeCode")]
    pub template_type_code: String,

    #[serde(rename = "fileText", default)]
    pub file_text: String,

    #[serde(rename = "isActive", default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateList {
    #[serde(default)]
    pub templates: Vec<TemplateEntry>,
}
