//! Built-in model settings collections.
//!
//! Credentials come from the environment variables existing deployments
//! already use (`DOCQ_OPENAI_API_KEY`, `DOCQ_AZURE_OPENAI_API_BASE`,
//! `DOCQ_AZURE_OPENAI_API_KEY1`, `DOCQ_AZURE_OPENAI_API_VERSION`,
//! `DOCQ_GROQ_API_KEY`). A collection missing its credentials still
//! exists but is reported as unavailable.

use std::collections::HashMap;

use docq_core::{AppError, AppResult};

use crate::models::{
    ModelCapability, ModelProvider, ModelSettingsCollection, ModelUsageSettings,
    ServiceInstanceConfig,
};

/// Environment variable holding the OpenAI API key.
pub const ENV_OPENAI_API_KEY: &str = "DOCQ_OPENAI_API_KEY";
/// Environment variable holding the Azure OpenAI endpoint base URL.
pub const ENV_AZURE_OPENAI_API_BASE: &str = "DOCQ_AZURE_OPENAI_API_BASE";
/// Environment variable holding the Azure OpenAI API key.
pub const ENV_AZURE_OPENAI_API_KEY: &str = "DOCQ_AZURE_OPENAI_API_KEY1";
/// Environment variable holding the Azure OpenAI API version.
pub const ENV_AZURE_OPENAI_API_VERSION: &str = "DOCQ_AZURE_OPENAI_API_VERSION";
/// Environment variable holding the Groq API key.
pub const ENV_GROQ_API_KEY: &str = "DOCQ_GROQ_API_KEY";

const DEFAULT_AZURE_API_VERSION: &str = "2023-05-15";

/// The model settings collections built into this deployment.
#[derive(Debug, Clone)]
pub struct ModelCollections {
    collections: Vec<ModelSettingsCollection>,
}

impl ModelCollections {
    /// Build the collections, reading credentials from the process
    /// environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the collections with an injected credential lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let openai_chat = ServiceInstanceConfig {
            provider: ModelProvider::OpenAi,
            model_name: "gpt-3.5-turbo".to_string(),
            api_key: lookup(ENV_OPENAI_API_KEY),
            api_base: None,
            api_version: None,
            deployment_name: None,
            context_window_size: None,
        };

        let azure_chat = ServiceInstanceConfig {
            provider: ModelProvider::AzureOpenAi,
            model_name: "gpt-35-turbo".to_string(),
            api_key: lookup(ENV_AZURE_OPENAI_API_KEY),
            api_base: lookup(ENV_AZURE_OPENAI_API_BASE),
            api_version: Some(
                lookup(ENV_AZURE_OPENAI_API_VERSION)
                    .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
            ),
            deployment_name: Some("gpt-35-turbo".to_string()),
            context_window_size: Some(4096),
        };

        let groq_chat = ServiceInstanceConfig {
            provider: ModelProvider::Groq,
            model_name: "mixtral-8x7b-32768".to_string(),
            api_key: lookup(ENV_GROQ_API_KEY),
            api_base: Some("https://api.groq.com/openai/v1".to_string()),
            api_version: None,
            deployment_name: None,
            context_window_size: Some(32768),
        };

        let collections = vec![
            collection("openai_latest", "OpenAI Latest", openai_chat),
            collection("azure_openai_latest", "Azure OpenAI Latest", azure_chat),
            collection("groq_mixtral_8x7b", "Groq Mixtral 8x7b", groq_chat),
        ];

        Self { collections }
    }

    /// Look up a collection by key.
    pub fn get(&self, key: &str) -> AppResult<&ModelSettingsCollection> {
        self.collections
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| {
                AppError::not_found(format!("No model settings collection '{key}'"))
            })
    }

    /// Whether a collection key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.collections.iter().any(|c| c.key == key)
    }

    /// All collection keys in declaration order.
    pub fn keys(&self) -> Vec<&str> {
        self.collections.iter().map(|c| c.key.as_str()).collect()
    }

    /// Collections whose chat instance has credentials configured.
    pub fn available(&self) -> impl Iterator<Item = &ModelSettingsCollection> {
        self.collections.iter().filter(|c| c.is_configured())
    }
}

fn collection(key: &str, name: &str, chat: ServiceInstanceConfig) -> ModelSettingsCollection {
    let mut model_usage = HashMap::new();
    model_usage.insert(
        ModelCapability::Chat,
        ModelUsageSettings {
            capability: ModelCapability::Chat,
            temperature: 0.7,
            service: chat,
        },
    );
    ModelSettingsCollection {
        key: key.to_string(),
        name: name.to_string(),
        model_usage,
    }
}
