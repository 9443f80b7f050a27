use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub category: ModelCategory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ModelCategory {
    Generate,
    Edit,
    TryOn,
    Text,
}

/// Models this crate has been exercised against.
pub fn catalog() -> Vec<ModelInfo> {
    vec![
        ModelInfo {
            id: "imagen-4.0-generate-preview-06-06".into(),
            name: "Imagen 4 Generate (preview)".into(),
            provider: "Google".into(),
            category: ModelCategory::Generate,
        },
        ModelInfo {
            id: "imagen-3.0-generate-002".into(),
            name: "Imagen 3 Generate".into(),
            provider: "Google".into(),
            category: ModelCategory::Generate,
        },
        ModelInfo {
            id: "imagen-3.0-capability-001".into(),
            name: "Imagen 3 Capability (edit)".into(),
            provider: "Google".into(),
            category: ModelCategory::Edit,
        },
        ModelInfo {
            id: "virtual-try-on-exp-05-31".into(),
            name: "Virtual Try-On (experimental)".into(),
            provider: "Google".into(),
            category: ModelCategory::TryOn,
        },
        ModelInfo {
            id: "gemini-2.0-flash".into(),
            name: "Gemini 2.0 Flash".into(),
            provider: "Google".into(),
            category: ModelCategory::Text,
        },
    ]
}
