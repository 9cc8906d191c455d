//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use docq_core::config::AppConfig;
use docq_extension::registry::ExtensionRegistry;
use docq_service::chat::ChatService;
use docq_service::document::DocumentService;
use docq_service::settings::SettingsService;
use docq_service::space::SpaceService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Chat threads, history and completions
    pub chat_service: Arc<ChatService>,
    /// Space management
    pub space_service: Arc<SpaceService>,
    /// Document upload, listing and indexing
    pub document_service: Arc<DocumentService>,
    /// Org and user settings
    pub settings_service: Arc<SettingsService>,
    /// Loaded extensions, for listings
    pub registry: Arc<ExtensionRegistry>,
}
