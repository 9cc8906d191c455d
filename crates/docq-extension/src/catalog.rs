//! Static catalog of extension constructors.
//!
//! Resolution used to mean importing `module_name` at runtime and picking
//! a class out of it. The catalog keeps the manifest contract (module
//! name plus optional constructor name) but the constructors are
//! compiled in and registered here at startup, so a manifest can only
//! select code that was built into the binary.

use std::collections::HashMap;
use std::sync::Arc;

use docq_core::{AppError, AppResult};

use crate::manifest::ExtensionManifestEntry;
use crate::traits::{Extension, ExtensionInit};

/// Constructor producing one extension instance.
pub type ExtensionFactory =
    Arc<dyn Fn(&ExtensionInit) -> AppResult<Arc<dyn Extension>> + Send + Sync>;

/// All extension constructors available to manifests.
#[derive(Clone, Default)]
pub struct ExtensionCatalog {
    /// Module name → constructors exported by that module, in
    /// registration order.
    modules: HashMap<String, Vec<(String, ExtensionFactory)>>,
}

impl ExtensionCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a constructor under a module name.
    pub fn register_constructor<F>(
        &mut self,
        module_name: impl Into<String>,
        class_name: impl Into<String>,
        factory: F,
    ) where
        F: Fn(&ExtensionInit) -> AppResult<Arc<dyn Extension>> + Send + Sync + 'static,
    {
        self.modules
            .entry(module_name.into())
            .or_default()
            .push((class_name.into(), Arc::new(factory)));
    }

    /// Resolves a manifest entry to a constructor.
    ///
    /// With `class_name` set, the module must export that constructor.
    /// Without it, the module must export exactly one.
    pub fn resolve(&self, entry: &ExtensionManifestEntry) -> AppResult<ExtensionFactory> {
        let constructors = self.modules.get(&entry.module_name).ok_or_else(|| {
            AppError::extension_load(format!(
                "Module '{}' is not built into this binary",
                entry.module_name
            ))
        })?;

        match &entry.class_name {
            Some(class_name) => constructors
                .iter()
                .find(|(name, _)| name == class_name)
                .map(|(_, factory)| factory.clone())
                .ok_or_else(|| {
                    AppError::extension_load(format!(
                        "Module '{}' has no constructor '{}'",
                        entry.module_name, class_name
                    ))
                }),
            None => match constructors.as_slice() {
                [(_, factory)] => Ok(factory.clone()),
                [] => Err(AppError::extension_load(format!(
                    "Module '{}' exports no constructors",
                    entry.module_name
                ))),
                _ => Err(AppError::extension_load(format!(
                    "Module '{}' exports {} constructors, class_name required",
                    entry.module_name,
                    constructors.len()
                ))),
            },
        }
    }

    /// Number of registered modules.
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

impl std::fmt::Debug for ExtensionCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut modules: Vec<(&String, usize)> = self
            .modules
            .iter()
            .map(|(name, ctors)| (name, ctors.len()))
            .collect();
        modules.sort();
        f.debug_struct("ExtensionCatalog")
            .field("modules", &modules)
            .finish()
    }
}
