//! OpenAI-compatible chat completion providers.
//!
//! All three supported providers speak the chat-completions wire format;
//! they differ only in URL layout and credential header. Azure routes by
//! deployment name and authenticates with an `api-key` header, the
//! others take the model name in the body and a bearer token.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use docq_core::error::ErrorKind;
use docq_core::traits::{Completion, CompletionProvider, CompletionRequest};
use docq_core::{AppError, AppResult};

use crate::models::{ModelProvider, ModelUsageSettings};

const OPENAI_DEFAULT_BASE: &str = "https://api.openai.com/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Build a completion provider from usage settings.
///
/// Fails with [`ErrorKind::Provider`] when the instance is missing
/// credentials or endpoint configuration.
pub fn build_provider(usage: &ModelUsageSettings) -> AppResult<Arc<dyn CompletionProvider>> {
    let service = &usage.service;
    let api_key = service
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| {
            AppError::provider(format!(
                "{} instance '{}' has no API key configured",
                service.provider, service.model_name
            ))
        })?;

    let (name, url, auth) = match service.provider {
        ModelProvider::OpenAi => {
            let base = service.api_base.as_deref().unwrap_or(OPENAI_DEFAULT_BASE);
            (
                "openai",
                format!("{}/chat/completions", base.trim_end_matches('/')),
                Auth::Bearer(api_key.to_string()),
            )
        }
        ModelProvider::Groq => {
            let base = service.api_base.as_deref().filter(|b| !b.is_empty()).ok_or_else(
                || AppError::provider("Groq instance has no api_base configured"),
            )?;
            (
                "groq",
                format!("{}/chat/completions", base.trim_end_matches('/')),
                Auth::Bearer(api_key.to_string()),
            )
        }
        ModelProvider::AzureOpenAi => {
            let base = service.api_base.as_deref().filter(|b| !b.is_empty()).ok_or_else(
                || AppError::provider("Azure OpenAI instance has no api_base configured"),
            )?;
            let deployment = service
                .deployment_name
                .as_deref()
                .unwrap_or(&service.model_name);
            let version = service.api_version.as_deref().unwrap_or("2023-05-15");
            (
                "azure_openai",
                format!(
                    "{}/openai/deployments/{}/chat/completions?api-version={}",
                    base.trim_end_matches('/'),
                    deployment,
                    version
                ),
                Auth::ApiKeyHeader(api_key.to_string()),
            )
        }
    };

    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| {
            AppError::with_source(ErrorKind::Provider, "Failed to build HTTP client", e)
        })?;

    // Azure routes by deployment, the others take the model in the body.
    let model_in_body = match service.provider {
        ModelProvider::AzureOpenAi => None,
        _ => Some(service.model_name.clone()),
    };

    Ok(Arc::new(OpenAiCompatProvider {
        client,
        name,
        url,
        auth,
        model_in_body,
        fallback_model: service.model_name.clone(),
    }))
}

enum Auth {
    Bearer(String),
    ApiKeyHeader(String),
}

/// Chat-completions client over one configured instance.
pub struct OpenAiCompatProvider {
    client: reqwest::Client,
    name: &'static str,
    url: String,
    auth: Auth,
    model_in_body: Option<String>,
    fallback_model: String,
}

#[async_trait]
impl CompletionProvider for OpenAiCompatProvider {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Completion> {
        let mut body = serde_json::json!({
            "messages": [{"role": "user", "content": request.prompt}],
            "temperature": request.temperature,
        });
        if let Some(model) = &self.model_in_body {
            body["model"] = serde_json::json!(model);
        }
        if let Some(max_tokens) = request.max_output_tokens {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        debug!(provider = self.name, "Sending completion request");

        let req = match &self.auth {
            Auth::Bearer(key) => self.client.post(&self.url).bearer_auth(key),
            Auth::ApiKeyHeader(key) => self.client.post(&self.url).header("api-key", key),
        };

        let response = req.json(&body).send().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Provider,
                format!("{} request failed to send", self.name),
                e,
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(map_status_error(self.name, status.as_u16(), &detail));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Provider,
                format!("{} returned an unreadable response", self.name),
                e,
            )
        })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::provider(format!("{} returned no completion choices", self.name))
            })?;

        Ok(Completion {
            text,
            model: parsed.model.unwrap_or_else(|| self.fallback_model.clone()),
        })
    }

    fn provider_name(&self) -> &str {
        self.name
    }
}

fn map_status_error(provider: &str, status: u16, detail: &str) -> AppError {
    let summary: String = detail.chars().take(200).collect();
    match status {
        401 | 403 => AppError::provider(format!(
            "{provider} rejected the credentials (HTTP {status}): {summary}"
        )),
        429 => AppError::provider(format!(
            "{provider} quota or rate limit exceeded (HTTP 429): {summary}"
        )),
        _ => AppError::provider(format!(
            "{provider} request failed (HTTP {status}): {summary}"
        )),
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
