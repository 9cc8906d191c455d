//! Usage-metrics extension for Docq.
//!
//! Counts received lifecycle events by name in memory. Registered with
//! the web UI role, so it sees chat activity plus system events; the
//! counters reset when the process restarts.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use docq_core::AppResult;
use docq_extension::{
    CapabilityRole, EventContext, Extension, ExtensionCatalog, ExtensionInit,
};

/// Module name this extension's constructor registers under.
pub const MODULE_NAME: &str = "docq_extensions.usage_metrics";
/// Constructor name, as referenced by manifests.
pub const CLASS_NAME: &str = "UsageMetricsExtension";

/// Registers this extension's constructor in a catalog.
pub fn register(catalog: &mut ExtensionCatalog) {
    catalog.register_constructor(MODULE_NAME, CLASS_NAME, |_| {
        Ok(Arc::new(UsageMetricsExtension::new()) as Arc<dyn Extension>)
    });
}

/// Web-UI extension counting events per event name.
#[derive(Debug, Default)]
pub struct UsageMetricsExtension {
    counters: DashMap<&'static str, u64>,
}

impl UsageMetricsExtension {
    /// Creates an extension with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current counts, sorted by event name.
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        let mut counts: Vec<(String, u64)> = self
            .counters
            .iter()
            .map(|entry| (entry.key().to_string(), *entry.value()))
            .collect();
        counts.sort();
        counts
    }

    /// Count for one event name, zero when never seen.
    pub fn count(&self, event_name: &str) -> u64 {
        self.counters.get(event_name).map(|c| *c).unwrap_or(0)
    }
}

#[async_trait]
impl Extension for UsageMetricsExtension {
    fn class_name(&self) -> &str {
        CLASS_NAME
    }

    fn roles(&self) -> &[CapabilityRole] {
        &[CapabilityRole::WebUi]
    }

    async fn on_load(&self, _init: &ExtensionInit) -> AppResult<()> {
        debug!("Usage metrics counters ready");
        Ok(())
    }

    async fn handle_event(&self, ctx: &EventContext) -> AppResult<()> {
        *self.counters.entry(ctx.event.as_str()).or_insert(0) += 1;
        Ok(())
    }
}
