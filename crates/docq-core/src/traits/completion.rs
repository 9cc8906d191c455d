use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A single completion request sent to a language model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Fully rendered prompt text.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Upper bound on generated tokens, if the provider supports one.
    pub max_output_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            temperature: 0.7,
            max_output_tokens: None,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Completion returned by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    /// Generated text.
    pub text: String,
    /// Model that produced the text, as reported by the provider.
    pub model: String,
}

/// Text completion backend.
///
/// Implementations return [`crate::error::ErrorKind::Provider`] errors for
/// authentication, quota and network failures so callers can degrade
/// without inspecting provider internals.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion.
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Completion>;

    /// Short provider name used in logs.
    fn provider_name(&self) -> &str;
}
