//! Event dispatcher: fires lifecycle events and aggregates outcomes.
//!
//! Dispatch is sequential in registration order. A failing hook is
//! recorded and the remaining extensions still receive the event; no
//! hook failure ever propagates to the caller. There is deliberately no
//! per-hook timeout: hooks run inside the calling request and a hanging
//! hook stalls that request only.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use docq_core::error::{AppError, ErrorKind};

use super::definitions::{EventContext, LifecycleEvent};
use super::observer::DispatchObserver;
use crate::registry::ExtensionRegistry;

/// Outcome of one extension's hook invocation.
#[derive(Debug, Clone)]
pub struct HookOutcome {
    /// Manifest key of the extension.
    pub key: String,
    /// `Ok` when the hook completed, otherwise the hook failure.
    pub result: Result<(), AppError>,
}

/// Aggregated result of dispatching one event to all receivers.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// The event that was fired.
    pub event: LifecycleEvent,
    /// Unique identifier of this dispatch.
    pub dispatch_id: Uuid,
    /// When the dispatch started.
    pub fired_at: DateTime<Utc>,
    /// Per-extension outcomes in invocation order.
    pub outcomes: Vec<HookOutcome>,
}

impl DispatchReport {
    /// Keys of extensions whose hook failed.
    pub fn failed_keys(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_err())
            .map(|o| o.key.as_str())
            .collect()
    }

    /// Number of hooks that completed successfully.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }
}

/// Dispatches lifecycle events to registered extensions.
pub struct EventDispatcher {
    /// Frozen extension registry.
    registry: Arc<ExtensionRegistry>,
    /// Observability sink for dispatch reports.
    observer: Arc<dyn DispatchObserver>,
}

impl EventDispatcher {
    /// Creates a new event dispatcher.
    pub fn new(registry: Arc<ExtensionRegistry>, observer: Arc<dyn DispatchObserver>) -> Self {
        Self { registry, observer }
    }

    /// Fires an event to every extension on its surface.
    ///
    /// Firing with zero registered receivers completes without error and
    /// still produces an (empty) report for the observer.
    pub async fn fire(&self, ctx: &EventContext) -> DispatchReport {
        let mut report = DispatchReport {
            event: ctx.event,
            dispatch_id: Uuid::new_v4(),
            fired_at: Utc::now(),
            outcomes: Vec::new(),
        };

        for entry in self.registry.receivers(ctx.event.surface()) {
            let key = entry.info.key.clone();
            let result = match entry.instance.handle_event(ctx).await {
                Ok(()) => {
                    debug!(
                        event = %ctx.event,
                        key = %key,
                        "Extension hook completed"
                    );
                    Ok(())
                }
                Err(e) => {
                    warn!(
                        event = %ctx.event,
                        key = %key,
                        error = %e,
                        "Extension hook failed, continuing with remaining extensions"
                    );
                    Err(AppError::with_source(
                        ErrorKind::ExtensionHook,
                        format!("Extension '{key}' failed handling {}", ctx.event),
                        e,
                    ))
                }
            };
            report.outcomes.push(HookOutcome { key, result });
        }

        self.observer.on_dispatch(&report).await;
        report
    }

    /// Convenience for firing an event without inspecting the report.
    pub async fn fire_and_forget(&self, ctx: &EventContext) {
        let _ = self.fire(ctx).await;
    }

    /// Returns the registry this dispatcher reads from.
    pub fn registry(&self) -> &Arc<ExtensionRegistry> {
        &self.registry
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("extensions", &self.registry.len())
            .finish()
    }
}
