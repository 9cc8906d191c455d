//! Completion provider resolution.
//!
//! Which provider serves a request depends on the organisation's saved
//! model collection, so providers are resolved per call rather than
//! fixed at startup. Building a provider is cheap (a configured HTTP
//! client), which makes per-request construction acceptable.

use std::sync::Arc;

use async_trait::async_trait;

use docq_core::error::AppError;
use docq_core::traits::CompletionProvider;
use docq_core::types::OrgId;
use docq_core::AppResult;
use docq_llm::{build_provider, ModelCollections};

use crate::settings::SettingsService;

/// Resolves the completion provider serving an organisation.
#[async_trait]
pub trait ProviderResolver: Send + Sync {
    /// The provider configured for `org_id`.
    async fn provider_for(&self, org_id: OrgId) -> AppResult<Arc<dyn CompletionProvider>>;
}

/// Resolver backed by the organisation's saved model collection setting,
/// falling back to the configured default collection.
pub struct CollectionProviderResolver {
    settings: Arc<SettingsService>,
    collections: Arc<ModelCollections>,
}

impl CollectionProviderResolver {
    /// Creates a new resolver.
    pub fn new(settings: Arc<SettingsService>, collections: Arc<ModelCollections>) -> Self {
        Self {
            settings,
            collections,
        }
    }
}

impl std::fmt::Debug for CollectionProviderResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionProviderResolver")
            .field("collections", &self.collections.keys())
            .finish()
    }
}

#[async_trait]
impl ProviderResolver for CollectionProviderResolver {
    async fn provider_for(&self, org_id: OrgId) -> AppResult<Arc<dyn CompletionProvider>> {
        let key = self.settings.model_collection_key(org_id).await?;
        let collection = self.collections.get(&key)?;
        let usage = collection.chat_settings().ok_or_else(|| {
            AppError::provider(format!("Model collection '{key}' has no chat model"))
        })?;
        build_provider(usage)
    }
}
