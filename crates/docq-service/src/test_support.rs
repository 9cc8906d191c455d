//! Shared fixtures for the service unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use docq_core::error::AppError;
use docq_core::traits::{
    Completion, CompletionProvider, CompletionRequest, DocumentIndex, IndexableDocument,
    ScoredPassage,
};
use docq_core::types::{OrgId, SpaceKey};
use docq_core::AppResult;
use docq_database::connection::DatabasePool;
use docq_database::migration::run_migrations;
use docq_extension::{DispatchObserver, DispatchReport, EventDispatcher, ExtensionRegistry};

use crate::provider::ProviderResolver;

/// Fresh in-memory system database with the schema applied.
pub async fn setup_db() -> DatabasePool {
    let db = DatabasePool::connect_in_memory().await.unwrap();
    run_migrations(db.pool()).await.unwrap();
    db
}

/// Observer that records fired event names in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<String>>,
}

#[async_trait]
impl DispatchObserver for RecordingObserver {
    async fn on_dispatch(&self, report: &DispatchReport) {
        self.events
            .lock()
            .unwrap()
            .push(report.event.to_string());
    }
}

/// Dispatcher over an empty registry; the observer still sees every fire.
pub fn empty_dispatcher(observer: Arc<RecordingObserver>) -> Arc<EventDispatcher> {
    Arc::new(EventDispatcher::new(
        Arc::new(ExtensionRegistry::new()),
        observer,
    ))
}

/// Provider that answers with a fixed string and records prompts.
#[derive(Debug)]
pub struct StubProvider {
    pub answer: String,
    pub prompts: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new(answer: &str) -> Arc<Self> {
        Arc::new(Self {
            answer: answer.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Completion> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        Ok(Completion {
            text: self.answer.clone(),
            model: "stub-model".to_string(),
        })
    }

    fn provider_name(&self) -> &str {
        "Stub"
    }
}

/// Provider whose completions always fail.
#[derive(Debug)]
pub struct FailingProvider;

#[async_trait]
impl CompletionProvider for FailingProvider {
    async fn complete(&self, _request: &CompletionRequest) -> AppResult<Completion> {
        Err(AppError::provider("model service unavailable"))
    }

    fn provider_name(&self) -> &str {
        "Failing"
    }
}

/// Resolver that hands out one fixed provider for every organisation.
pub struct StaticResolver {
    pub provider: Arc<dyn CompletionProvider>,
}

#[async_trait]
impl ProviderResolver for StaticResolver {
    async fn provider_for(&self, _org_id: OrgId) -> AppResult<Arc<dyn CompletionProvider>> {
        Ok(self.provider.clone())
    }
}

/// Index stub returning canned passages and recording indexed documents.
#[derive(Debug, Default)]
pub struct StubIndex {
    pub passages: Vec<ScoredPassage>,
    pub indexed: Mutex<Vec<(String, Vec<IndexableDocument>)>>,
    pub removed: Mutex<Vec<String>>,
}

#[async_trait]
impl DocumentIndex for StubIndex {
    async fn index_documents(
        &self,
        space: &SpaceKey,
        documents: Vec<IndexableDocument>,
    ) -> AppResult<usize> {
        let count = documents.len();
        self.indexed
            .lock()
            .unwrap()
            .push((space.value(), documents));
        Ok(count)
    }

    async fn retrieve(
        &self,
        _space: &SpaceKey,
        _query: &str,
        _top_k: u32,
    ) -> AppResult<Vec<ScoredPassage>> {
        Ok(self.passages.clone())
    }

    async fn remove_space(&self, space: &SpaceKey) -> AppResult<()> {
        self.removed.lock().unwrap().push(space.value());
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "stub"
    }
}
