use serde::{Deserialize, Serialize};

/// Content metadata relevant to factor resolution. Owned by the
/// content-production pipeline (external); read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentMeta {
    pub content_id: String,
    pub hook_type: Option<String>,
    pub narrative_structure: Option<String>,
    pub duration_seconds: Option<f64>,
    pub bgm_category: Option<String>,
}
