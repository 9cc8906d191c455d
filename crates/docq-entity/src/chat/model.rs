//! Chat thread and message entity models.

use chrono::{DateTime, Utc};
use docq_core::types::{MessageId, ThreadId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A conversation thread within a feature.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatThread {
    /// Unique thread identifier.
    pub id: ThreadId,
    /// Thread topic, taken from the first question asked.
    pub topic: String,
    /// When the thread was created.
    pub created_at: DateTime<Utc>,
}

/// A single message within a thread.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChatMessage {
    /// Unique message identifier.
    pub id: MessageId,
    /// Message text.
    pub message: String,
    /// True when a person wrote the message, false for the assistant.
    pub human: bool,
    /// When the message was recorded.
    pub timestamp: DateTime<Utc>,
    /// Thread the message belongs to.
    pub thread_id: ThreadId,
}

impl ChatMessage {
    /// Speaker label used when rendering history into a prompt.
    pub fn speaker_label(&self) -> &'static str {
        if self.human { "Human" } else { "Assistant" }
    }
}
