//! # docq-service
//!
//! Business logic service layer for Docq. Each service orchestrates
//! repositories, the document index, model providers, and the extension
//! dispatcher to implement application-level use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod chat;
pub mod context;
pub mod document;
pub mod provider;
pub mod settings;
pub mod space;

#[cfg(test)]
pub(crate) mod test_support;

pub use chat::{ChatExchange, ChatService, QueryParams};
pub use context::RequestContext;
pub use document::DocumentService;
pub use provider::{CollectionProviderResolver, ProviderResolver};
pub use settings::SettingsService;
pub use space::SpaceService;
