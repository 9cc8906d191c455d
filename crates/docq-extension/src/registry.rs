//! Extension registry.
//!
//! The registry is written by exactly one caller during startup
//! ([`ExtensionManager::load`](crate::manager::ExtensionManager::load)),
//! then wrapped in an `Arc` and shared read-only for the process
//! lifetime. There is no removal API and no interior locking; the
//! `&mut self` writer methods make the single-writer phase explicit.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::events::definitions::EventSurface;
use crate::roles::CapabilityRole;
use crate::traits::Extension;

/// Metadata about a registered extension, as shown in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionInfo {
    /// Manifest key the extension was registered under.
    pub key: String,
    /// Display label from the manifest.
    pub name: String,
    /// Module the constructor came from.
    pub module_name: String,
    /// Source location recorded in the manifest.
    pub source: String,
    /// Constructor the instance was built with.
    pub class_name: String,
    /// Capability roles the instance implements.
    pub roles: Vec<CapabilityRole>,
}

/// A registered extension instance with its metadata.
#[derive(Debug, Clone)]
pub struct RegisteredExtension {
    /// Listing metadata.
    pub info: ExtensionInfo,
    /// The instance itself.
    pub instance: Arc<dyn Extension>,
}

/// Registry of all loaded extensions, in registration order.
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    entries: Vec<RegisteredExtension>,
}

impl ExtensionRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an extension under its manifest key.
    ///
    /// A duplicate key overwrites the earlier instance in place with a
    /// warning, keeping the original position in dispatch order.
    pub fn register(&mut self, info: ExtensionInfo, instance: Arc<dyn Extension>) {
        let entry = RegisteredExtension { info, instance };
        match self
            .entries
            .iter()
            .position(|e| e.info.key == entry.info.key)
        {
            Some(pos) => {
                warn!(
                    key = %entry.info.key,
                    class_name = %entry.info.class_name,
                    "Duplicate extension key, overwriting earlier registration"
                );
                self.entries[pos] = entry;
            }
            None => {
                info!(
                    key = %entry.info.key,
                    name = %entry.info.name,
                    class_name = %entry.info.class_name,
                    "Registering extension"
                );
                self.entries.push(entry);
            }
        }
    }

    /// All registered extensions in registration order.
    pub fn all(&self) -> &[RegisteredExtension] {
        &self.entries
    }

    /// Extensions implementing the given role, registration order kept.
    pub fn capable_of(
        &self,
        role: CapabilityRole,
    ) -> impl Iterator<Item = &RegisteredExtension> {
        self.entries
            .iter()
            .filter(move |e| e.info.roles.contains(&role))
    }

    /// Extensions receiving events on the given surface.
    ///
    /// System events go to every extension; surface events go to the
    /// extensions implementing the matching role.
    pub fn receivers(
        &self,
        surface: EventSurface,
    ) -> impl Iterator<Item = &RegisteredExtension> {
        self.entries.iter().filter(move |e| match surface {
            EventSurface::System => true,
            EventSurface::WebUi => e.info.roles.contains(&CapabilityRole::WebUi),
            EventSurface::DataLayer => e.info.roles.contains(&CapabilityRole::DataLayer),
        })
    }

    /// Looks up an extension by manifest key.
    pub fn get(&self, key: &str) -> Option<&RegisteredExtension> {
        self.entries.iter().find(|e| e.info.key == key)
    }

    /// Listing metadata for every registered extension.
    pub fn list_info(&self) -> Vec<ExtensionInfo> {
        self.entries.iter().map(|e| e.info.clone()).collect()
    }

    /// Number of registered extensions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no extensions are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
