//! Model provider, capability and settings types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Hosting providers with built-in support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelProvider {
    /// OpenAI's own API.
    OpenAi,
    /// OpenAI models hosted on Azure.
    AzureOpenAi,
    /// Groq-hosted open models behind an OpenAI-compatible API.
    Groq,
}

impl ModelProvider {
    /// Display name of the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::AzureOpenAi => "Azure OpenAI",
            Self::Groq => "Groq",
        }
    }
}

impl std::fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a configured model is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelCapability {
    /// Conversational completion.
    Chat,
    /// Text embedding.
    Embedding,
}

/// Config of a running model instance, i.e. a deployed model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInstanceConfig {
    /// Hosting provider.
    pub provider: ModelProvider,
    /// Provider-side model name.
    pub model_name: String,
    /// API credential.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Service endpoint base URL. Required for Azure and used by Groq.
    pub api_base: Option<String>,
    /// Cloud provider API version. Applies to Azure.
    pub api_version: Option<String>,
    /// Deployment routing name. Applies to Azure; defaults to the model
    /// name when the deployment was created with it.
    pub deployment_name: Option<String>,
    /// Maximum context size the instance accepts.
    pub context_window_size: Option<u32>,
}

impl ServiceInstanceConfig {
    /// Whether enough configuration is present to call the instance.
    pub fn is_configured(&self) -> bool {
        let has_key = self.api_key.as_deref().is_some_and(|k| !k.is_empty());
        match self.provider {
            ModelProvider::OpenAi | ModelProvider::Groq => has_key,
            ModelProvider::AzureOpenAi => {
                has_key && self.api_base.as_deref().is_some_and(|b| !b.is_empty())
            }
        }
    }
}

/// Usage settings tying a capability to a model instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelUsageSettings {
    /// Capability this instance serves.
    pub capability: ModelCapability,
    /// Sampling temperature used for this capability.
    pub temperature: f32,
    /// The configured instance.
    pub service: ServiceInstanceConfig,
}

/// A named group of usage settings an organisation can select.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettingsCollection {
    /// Unique collection key, stored in organisation settings.
    pub key: String,
    /// Friendly name of the collection.
    pub name: String,
    /// Usage settings by capability.
    pub model_usage: HashMap<ModelCapability, ModelUsageSettings>,
}

impl ModelSettingsCollection {
    /// Chat usage settings of this collection, if present.
    pub fn chat_settings(&self) -> Option<&ModelUsageSettings> {
        self.model_usage.get(&ModelCapability::Chat)
    }

    /// Whether the chat instance of this collection is callable.
    pub fn is_configured(&self) -> bool {
        self.chat_settings()
            .map(|usage| usage.service.is_configured())
            .unwrap_or(false)
    }
}
