use serde::{Deserialize, Serialize};

/// Chat behaviour configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of prior messages included when building a prompt.
    #[serde(default = "default_history_window")]
    pub history_window: u32,
    /// Model settings collection used when no per-org setting exists.
    #[serde(default = "default_model_collection")]
    pub default_model_collection: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_window: default_history_window(),
            default_model_collection: default_model_collection(),
        }
    }
}

fn default_history_window() -> u32 {
    10
}

fn default_model_collection() -> String {
    "azure_openai_latest".to_string()
}
