//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docq_core::types::SpaceType;
use docq_entity::chat::{ChatMessage, ChatThread};
use docq_entity::document::DocumentListItem;
use docq_entity::space::Space;
use docq_extension::registry::ExtensionInfo;

/// Completion response: the answer plus the thread it was recorded in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionResponse {
    /// Assistant answer, sources appended for document features.
    pub response: String,
    /// Thread the exchange was saved to.
    pub thread_id: i64,
    /// True when the model was unreachable and the canned apology was
    /// returned instead of an answer.
    pub degraded: bool,
}

/// A chat thread as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadModel {
    /// Thread ID.
    pub id: i64,
    /// Thread topic.
    pub topic: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl From<ChatThread> for ThreadModel {
    fn from(thread: ChatThread) -> Self {
        Self {
            id: thread.id.as_i64(),
            topic: thread.topic,
            created_at: thread.created_at,
        }
    }
}

/// A chat message as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageModel {
    /// Message ID.
    pub id: i64,
    /// Message text.
    pub message: String,
    /// True for person-authored messages, false for the assistant.
    pub human: bool,
    /// When the message was recorded.
    pub timestamp: DateTime<Utc>,
    /// Thread the message belongs to.
    pub thread_id: i64,
}

impl From<ChatMessage> for MessageModel {
    fn from(msg: ChatMessage) -> Self {
        Self {
            id: msg.id.as_i64(),
            message: msg.message,
            human: msg.human,
            timestamp: msg.timestamp,
            thread_id: msg.thread_id.as_i64(),
        }
    }
}

/// Pagination block returned alongside history pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    /// Current page, starting at 1.
    pub page: u32,
    /// Page size.
    pub limit: u32,
    /// Total message count in the thread.
    pub count: usize,
    /// Next page number, when one exists.
    pub next: Option<u32>,
    /// Previous page number, when one exists.
    pub prev: Option<u32>,
}

/// Chat history page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    /// Messages in this page, oldest first.
    pub messages: Vec<MessageModel>,
    /// Pagination info.
    pub info: PageInfo,
}

/// A space as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpaceModel {
    /// Space ID.
    pub id: i64,
    /// Owning organisation.
    pub org_id: i64,
    /// Space name.
    pub name: String,
    /// Short description.
    pub summary: String,
    /// Whether the space is archived.
    pub archived: bool,
    /// Access level.
    pub space_type: SpaceType,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

impl From<Space> for SpaceModel {
    fn from(space: Space) -> Self {
        Self {
            id: space.id.as_i64(),
            org_id: space.org_id.as_i64(),
            name: space.name,
            summary: space.summary,
            archived: space.archived,
            space_type: space.space_type,
            created_at: space.created_at,
            updated_at: space.updated_at,
        }
    }
}

/// An uploaded document as returned in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    /// File name within the space.
    pub name: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Last modification time.
    pub modified_at: DateTime<Utc>,
}

impl From<DocumentListItem> for DocumentModel {
    fn from(item: DocumentListItem) -> Self {
        Self {
            name: item.name,
            size_bytes: item.size_bytes,
            modified_at: item.modified_at,
        }
    }
}

/// A loaded extension as returned by the listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionModel {
    /// Manifest key.
    pub key: String,
    /// Display label.
    pub name: String,
    /// Module the constructor came from.
    pub module_name: String,
    /// Source location recorded in the manifest.
    pub source: String,
    /// Constructor the instance was built with.
    pub class_name: String,
    /// Capability role names.
    pub roles: Vec<String>,
}

impl From<ExtensionInfo> for ExtensionModel {
    fn from(info: ExtensionInfo) -> Self {
        Self {
            key: info.key,
            name: info.name,
            module_name: info.module_name,
            source: info.source,
            class_name: info.class_name,
            roles: info.roles.iter().map(|r| r.as_str().to_string()).collect(),
        }
    }
}
