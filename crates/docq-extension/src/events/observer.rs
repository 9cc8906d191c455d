//! Dispatch observation.
//!
//! Every dispatch produces a [`DispatchReport`](super::dispatcher::DispatchReport)
//! which is handed to an observer. Hook failures are therefore never
//! only log lines; whatever observability sink the deployment wires in
//! sees each outcome.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::dispatcher::DispatchReport;

/// Receives the report of every event dispatch.
#[async_trait]
pub trait DispatchObserver: Send + Sync {
    /// Called after all hooks of one dispatch have run.
    async fn on_dispatch(&self, report: &DispatchReport);
}

/// Default observer that writes reports to the log.
#[derive(Debug, Default)]
pub struct LoggingObserver;

#[async_trait]
impl DispatchObserver for LoggingObserver {
    async fn on_dispatch(&self, report: &DispatchReport) {
        let failed = report.failed_keys();
        if failed.is_empty() {
            debug!(
                event = %report.event,
                dispatch_id = %report.dispatch_id,
                hooks = report.outcomes.len(),
                "Event dispatched"
            );
        } else {
            warn!(
                event = %report.event,
                dispatch_id = %report.dispatch_id,
                hooks = report.outcomes.len(),
                failed = ?failed,
                "Event dispatched with hook failures"
            );
        }
    }
}
