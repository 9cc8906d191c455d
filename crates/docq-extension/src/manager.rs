//! Extension manager: loads the manifest and assembles the runtime.
//!
//! Loading never fails the host application. Every failure mode degrades
//! to fewer extensions: a missing manifest or disabled subsystem loads
//! zero, a malformed manifest loads zero with a warning, and a bad entry
//! is skipped while the rest continue.

use std::sync::Arc;

use tracing::{info, warn};

use docq_core::config::ExtensionsConfig;
use docq_core::error::{AppError, ErrorKind};

use crate::catalog::ExtensionCatalog;
use crate::events::dispatcher::EventDispatcher;
use crate::events::observer::DispatchObserver;
use crate::manifest::Manifest;
use crate::registry::{ExtensionInfo, ExtensionRegistry};
use crate::traits::ExtensionInit;

/// What happened to each manifest entry during a load.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Keys registered, in registration order.
    pub registered: Vec<String>,
    /// Entries that were skipped, with the reason.
    pub skipped: Vec<SkippedExtension>,
}

/// One manifest entry that did not make it into the registry.
#[derive(Debug, Clone)]
pub struct SkippedExtension {
    /// Manifest key of the entry.
    pub key: String,
    /// Why the entry was skipped.
    pub reason: AppError,
}

/// Owns the frozen registry and the dispatcher built over it.
#[derive(Debug)]
pub struct ExtensionManager {
    registry: Arc<ExtensionRegistry>,
    dispatcher: Arc<EventDispatcher>,
}

impl ExtensionManager {
    /// Loads extensions per configuration and freezes the registry.
    ///
    /// Returns the manager together with a report of registered and
    /// skipped entries.
    pub async fn load(
        config: &ExtensionsConfig,
        catalog: &ExtensionCatalog,
        init: &ExtensionInit,
        observer: Arc<dyn DispatchObserver>,
    ) -> (Self, LoadReport) {
        let mut registry = ExtensionRegistry::new();
        let mut report = LoadReport::default();

        if !config.enabled {
            info!("Extension subsystem disabled by configuration");
            return (Self::assemble(registry, observer), report);
        }

        let manifest_path = std::path::Path::new(&config.manifest_path);
        let manifest = match Manifest::load(manifest_path) {
            Ok(manifest) => manifest,
            Err(e) if e.kind == ErrorKind::ManifestMissing => {
                info!(
                    path = %manifest_path.display(),
                    "No extension manifest found, loading zero extensions"
                );
                return (Self::assemble(registry, observer), report);
            }
            Err(e) => {
                warn!(
                    path = %manifest_path.display(),
                    error = %e,
                    "Extension manifest unusable, loading zero extensions"
                );
                return (Self::assemble(registry, observer), report);
            }
        };

        info!(
            path = %manifest_path.display(),
            entries = manifest.len(),
            "Loading extensions from manifest"
        );

        for (key, entry) in manifest.entries() {
            match Self::build_entry(catalog, init, entry).await {
                Ok((info_class, instance)) => {
                    let info = ExtensionInfo {
                        key: key.clone(),
                        name: entry.name.clone(),
                        module_name: entry.module_name.clone(),
                        source: entry.source.clone(),
                        class_name: info_class,
                        roles: instance.roles().to_vec(),
                    };
                    registry.register(info, instance);
                    report.registered.push(key.clone());
                }
                Err(reason) => {
                    warn!(
                        key = %key,
                        module_name = %entry.module_name,
                        error = %reason,
                        "Skipping extension"
                    );
                    report.skipped.push(SkippedExtension {
                        key: key.clone(),
                        reason,
                    });
                }
            }
        }

        info!(
            registered = report.registered.len(),
            skipped = report.skipped.len(),
            "Extension load complete"
        );

        (Self::assemble(registry, observer), report)
    }

    /// Resolve, construct and initialize one manifest entry.
    async fn build_entry(
        catalog: &ExtensionCatalog,
        init: &ExtensionInit,
        entry: &crate::manifest::ExtensionManifestEntry,
    ) -> Result<(String, Arc<dyn crate::traits::Extension>), AppError> {
        let factory = catalog.resolve(entry)?;

        let instance = factory(init).map_err(|e| {
            AppError::with_source(
                ErrorKind::ExtensionLoad,
                format!("Constructor for module '{}' failed", entry.module_name),
                e,
            )
        })?;

        if instance.roles().is_empty() {
            return Err(AppError::extension_type(format!(
                "Extension '{}' implements no capability role",
                instance.class_name()
            )));
        }

        instance.on_load(init).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExtensionLoad,
                format!("Extension '{}' failed to initialize", instance.class_name()),
                e,
            )
        })?;

        Ok((instance.class_name().to_string(), instance))
    }

    fn assemble(registry: ExtensionRegistry, observer: Arc<dyn DispatchObserver>) -> Self {
        let registry = Arc::new(registry);
        let dispatcher = Arc::new(EventDispatcher::new(registry.clone(), observer));
        Self {
            registry,
            dispatcher,
        }
    }

    /// The frozen registry.
    pub fn registry(&self) -> &Arc<ExtensionRegistry> {
        &self.registry
    }

    /// The dispatcher for firing lifecycle events.
    pub fn dispatcher(&self) -> &Arc<EventDispatcher> {
        &self.dispatcher
    }
}
