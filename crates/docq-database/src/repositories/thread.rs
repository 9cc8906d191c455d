//! Chat thread repository implementation.
//!
//! Threads are scoped by feature key value, so one user's private chat
//! threads never appear in another feature's listings.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use docq_core::error::{AppError, ErrorKind};
use docq_core::result::AppResult;
use docq_core::types::{FeatureKey, ThreadId};
use docq_entity::chat::ChatThread;

/// Repository for chat threads.
#[derive(Debug, Clone)]
pub struct ThreadRepository {
    pool: SqlitePool,
}

impl ThreadRepository {
    /// Create a new thread repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a thread for a feature.
    pub async fn create(
        &self,
        feature: &FeatureKey,
        topic: &str,
        created_at: DateTime<Utc>,
    ) -> AppResult<ChatThread> {
        sqlx::query_as::<_, ChatThread>(
            "INSERT INTO chat_threads (feature, topic, created_at) VALUES (?, ?, ?) \
             RETURNING id, topic, created_at",
        )
        .bind(feature.value())
        .bind(topic)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create thread", e))
    }

    /// Find a thread by ID within a feature.
    pub async fn find_by_id(
        &self,
        feature: &FeatureKey,
        id: ThreadId,
    ) -> AppResult<Option<ChatThread>> {
        sqlx::query_as::<_, ChatThread>(
            "SELECT id, topic, created_at FROM chat_threads WHERE feature = ? AND id = ?",
        )
        .bind(feature.value())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find thread", e))
    }

    /// Most recently created thread for a feature.
    pub async fn latest(&self, feature: &FeatureKey) -> AppResult<Option<ChatThread>> {
        sqlx::query_as::<_, ChatThread>(
            "SELECT id, topic, created_at FROM chat_threads WHERE feature = ? \
             ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(feature.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find latest thread", e))
    }

    /// All threads for a feature, newest first.
    pub async fn list(&self, feature: &FeatureKey) -> AppResult<Vec<ChatThread>> {
        sqlx::query_as::<_, ChatThread>(
            "SELECT id, topic, created_at FROM chat_threads WHERE feature = ? \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(feature.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list threads", e))
    }
}
