//! All lifecycle event definitions with their dispatch surfaces.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docq_core::types::UserId;

/// Enumeration of all extensible lifecycle points.
///
/// Event names follow `<surface>.<subject>.<past-tense-verb>` and are
/// part of the extension contract, so renaming one breaks deployed
/// extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    // ── System ──
    /// Fired once startup completes and the app is ready to serve.
    AppReadied,
    /// Fired when graceful shutdown begins.
    AppStopping,

    // ── Web UI ──
    /// Fired after a chat exchange finishes, successful or degraded.
    ChatCompleted,

    // ── Data layer ──
    /// Fired when a new chat thread is created.
    ThreadCreated,
    /// Fired after a human/assistant message pair is persisted.
    ChatHistorySaved,
    /// Fired when a space is created.
    SpaceCreated,
    /// Fired when a space's fields change.
    SpaceUpdated,
    /// Fired when a space is archived.
    SpaceArchived,
    /// Fired after a document lands in a space's upload directory.
    DocumentUploaded,
    /// Fired after a document is removed from a space.
    DocumentDeleted,
    /// Fired after a space's index is rebuilt.
    IndexRebuilt,
    /// Fired when a settings value is written.
    SettingsUpdated,
}

impl LifecycleEvent {
    /// Returns the string name of this event.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AppReadied => "system.app.readied",
            Self::AppStopping => "system.app.stopping",
            Self::ChatCompleted => "webui.chat.completed",
            Self::ThreadCreated => "dal.thread.created",
            Self::ChatHistorySaved => "dal.chat.history_saved",
            Self::SpaceCreated => "dal.space.created",
            Self::SpaceUpdated => "dal.space.updated",
            Self::SpaceArchived => "dal.space.archived",
            Self::DocumentUploaded => "dal.document.uploaded",
            Self::DocumentDeleted => "dal.document.deleted",
            Self::IndexRebuilt => "dal.index.rebuilt",
            Self::SettingsUpdated => "dal.settings.updated",
        }
    }

    /// The surface this event is delivered on.
    pub fn surface(&self) -> EventSurface {
        match self {
            Self::AppReadied | Self::AppStopping => EventSurface::System,
            Self::ChatCompleted => EventSurface::WebUi,
            Self::ThreadCreated
            | Self::ChatHistorySaved
            | Self::SpaceCreated
            | Self::SpaceUpdated
            | Self::SpaceArchived
            | Self::DocumentUploaded
            | Self::DocumentDeleted
            | Self::IndexRebuilt
            | Self::SettingsUpdated => EventSurface::DataLayer,
        }
    }
}

impl std::fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which extensions an event is delivered to.
///
/// System events reach every registered extension; the other surfaces
/// reach the extensions implementing the matching capability role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSurface {
    /// Application lifecycle, delivered to all extensions.
    System,
    /// User-facing chat surface.
    WebUi,
    /// Data access surface.
    DataLayer,
}

/// One firing of a lifecycle event. Immutable once built, created fresh
/// per dispatch and discarded afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventContext {
    /// The event being fired.
    pub event: LifecycleEvent,
    /// Arbitrary data keyed by string.
    pub data: HashMap<String, serde_json::Value>,
    /// The user whose action triggered this event.
    pub actor: Option<UserId>,
    /// When the event was fired.
    pub timestamp: DateTime<Utc>,
}

impl EventContext {
    /// Creates a new event context.
    pub fn new(event: LifecycleEvent) -> Self {
        Self {
            event,
            data: HashMap::new(),
            actor: None,
            timestamp: Utc::now(),
        }
    }

    /// Sets the acting user.
    pub fn with_actor(mut self, actor: UserId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Inserts a typed data value.
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data.insert(key.to_string(), value);
        self
    }

    /// Inserts a string value.
    pub fn with_string(self, key: &str, value: &str) -> Self {
        self.with_data(key, serde_json::json!(value))
    }

    /// Inserts an integer value.
    pub fn with_int(self, key: &str, value: i64) -> Self {
        self.with_data(key, serde_json::json!(value))
    }

    /// Inserts a boolean value.
    pub fn with_bool(self, key: &str, value: bool) -> Self {
        self.with_data(key, serde_json::json!(value))
    }

    /// Gets a data value by key.
    pub fn get_data(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Gets a string data value.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(|v| v.as_str())
    }

    /// Gets an i64 data value.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.data.get(key).and_then(|v| v.as_i64())
    }

    /// Gets a bool data value.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.data.get(key).and_then(|v| v.as_bool())
    }
}
