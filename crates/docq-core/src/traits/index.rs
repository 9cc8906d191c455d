use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;
use crate::types::SpaceKey;

/// A document handed to the index for chunking and storage.
#[derive(Debug, Clone)]
pub struct IndexableDocument {
    /// Original file name, kept for source attribution.
    pub name: String,
    /// Extracted text content.
    pub text: String,
}

/// One retrieved passage with its relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredPassage {
    /// Name of the document the passage came from.
    pub document: String,
    /// Passage text.
    pub passage: String,
    /// Backend-specific relevance score, higher is better.
    pub score: f64,
}

/// Document retrieval backend.
///
/// Implementations return [`crate::error::ErrorKind::Index`] errors when
/// the backing store is missing or corrupt.
#[async_trait]
pub trait DocumentIndex: Send + Sync {
    /// Replace the indexed contents of a space with the given documents.
    /// Returns the number of passages stored.
    async fn index_documents(
        &self,
        space: &SpaceKey,
        documents: Vec<IndexableDocument>,
    ) -> AppResult<usize>;

    /// Retrieve the `top_k` passages most relevant to `query` within a space.
    async fn retrieve(
        &self,
        space: &SpaceKey,
        query: &str,
        top_k: u32,
    ) -> AppResult<Vec<ScoredPassage>>;

    /// Drop all indexed contents of a space.
    async fn remove_space(&self, space: &SpaceKey) -> AppResult<()>;

    /// Short backend name used in logs.
    fn backend_name(&self) -> &str;
}
