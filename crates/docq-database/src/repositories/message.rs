//! Chat message repository implementation.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use docq_core::error::{AppError, ErrorKind};
use docq_core::result::AppResult;
use docq_core::types::ThreadId;
use docq_entity::chat::ChatMessage;

/// Repository for chat messages.
#[derive(Debug, Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Create a new message repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Save one message to a thread.
    pub async fn save(
        &self,
        thread_id: ThreadId,
        message: &str,
        human: bool,
        timestamp: DateTime<Utc>,
    ) -> AppResult<ChatMessage> {
        sqlx::query_as::<_, ChatMessage>(
            "INSERT INTO chat_messages (message, human, timestamp, thread_id) \
             VALUES (?, ?, ?, ?) \
             RETURNING id, message, human, timestamp, thread_id",
        )
        .bind(message)
        .bind(human)
        .bind(timestamp)
        .bind(thread_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save message", e))
    }

    /// Up to `size` messages strictly before `cutoff`, oldest first.
    ///
    /// This is the history window used when building prompts.
    pub async fn window_before(
        &self,
        thread_id: ThreadId,
        cutoff: DateTime<Utc>,
        size: u32,
    ) -> AppResult<Vec<ChatMessage>> {
        let mut messages = sqlx::query_as::<_, ChatMessage>(
            "SELECT id, message, human, timestamp, thread_id FROM chat_messages \
             WHERE thread_id = ? AND timestamp < ? \
             ORDER BY timestamp DESC, id DESC LIMIT ?",
        )
        .bind(thread_id)
        .bind(cutoff)
        .bind(size)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load message window", e)
        })?;

        // Fetched newest-first to apply the limit, returned chronologically.
        messages.reverse();
        Ok(messages)
    }

    /// All messages of a thread, oldest first.
    pub async fn list(&self, thread_id: ThreadId) -> AppResult<Vec<ChatMessage>> {
        sqlx::query_as::<_, ChatMessage>(
            "SELECT id, message, human, timestamp, thread_id FROM chat_messages \
             WHERE thread_id = ? ORDER BY timestamp ASC, id ASC",
        )
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list messages", e))
    }
}
