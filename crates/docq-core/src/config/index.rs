use serde::{Deserialize, Serialize};

/// Document index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Index backend name. Only "local" is currently available.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Number of passages retrieved per query.
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    /// Maximum characters per indexed passage.
    #[serde(default = "default_max_passage_chars")]
    pub max_passage_chars: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            top_k: default_top_k(),
            max_passage_chars: default_max_passage_chars(),
        }
    }
}

fn default_backend() -> String {
    "local".to_string()
}

fn default_top_k() -> u32 {
    4
}

fn default_max_passage_chars() -> u32 {
    2000
}
