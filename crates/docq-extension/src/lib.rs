//! # docq-extension
//!
//! Extension framework for Docq. Provides:
//!
//! - Manifest loading from the deployment-root `.docq-extensions.json`
//! - A static catalog mapping manifest module names to compiled-in
//!   extension constructors
//! - An extension registry, populated once at startup and frozen
//! - A lifecycle event dispatcher reporting per-extension outcomes to an
//!   observability collaborator
//!
//! Extension failures never take the application down: a bad manifest
//! loads zero extensions, a bad entry is skipped, and a failing event
//! hook is recorded while the remaining extensions still run.

pub mod catalog;
pub mod events;
pub mod manager;
pub mod manifest;
pub mod registry;
pub mod roles;
pub mod traits;

pub use catalog::{ExtensionCatalog, ExtensionFactory};
pub use events::definitions::{EventContext, EventSurface, LifecycleEvent};
pub use events::dispatcher::{DispatchReport, EventDispatcher, HookOutcome};
pub use events::observer::{DispatchObserver, LoggingObserver};
pub use manager::{ExtensionManager, LoadReport, SkippedExtension};
pub use manifest::{ExtensionManifestEntry, Manifest};
pub use registry::{ExtensionInfo, ExtensionRegistry, RegisteredExtension};
pub use roles::CapabilityRole;
pub use traits::{Extension, ExtensionInit};
