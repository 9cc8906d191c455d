//! # docq-llm
//!
//! Model selection for Docq. A deployment exposes a set of model
//! settings collections, each mapping a capability to a configured model
//! service instance. Organisations pick a collection by key; the chat
//! service turns the chat settings of that collection into a
//! [`CompletionProvider`](docq_core::traits::CompletionProvider).

pub mod collections;
pub mod models;
pub mod providers;

pub use collections::ModelCollections;
pub use models::{
    ModelCapability, ModelProvider, ModelSettingsCollection, ModelUsageSettings,
    ServiceInstanceConfig,
};
pub use providers::build_provider;
