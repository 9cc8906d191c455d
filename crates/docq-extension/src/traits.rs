//! The compile-time extension interface.
//!
//! Earlier deployments loaded extension classes by dynamic import and
//! duck-typed them against the capability surfaces. Here every extension
//! implements [`Extension`] and is constructed through the
//! [`catalog`](crate::catalog), so the interface is checked when the
//! binary is built rather than when the manifest is read.

use std::path::PathBuf;

use async_trait::async_trait;

use docq_core::AppResult;

use crate::events::definitions::EventContext;
use crate::roles::CapabilityRole;

/// Construction-time environment handed to every extension.
///
/// Data-layer extensions receive the system database location so they can
/// keep their own tables next to the application's.
#[derive(Debug, Clone)]
pub struct ExtensionInit {
    /// Root data directory.
    pub data_dir: PathBuf,
    /// Path of the system SQLite database file.
    pub sqlite_system_path: PathBuf,
}

/// Trait all extensions implement.
#[async_trait]
pub trait Extension: Send + Sync + std::fmt::Debug {
    /// Constructor name this instance was built from, matching the
    /// manifest's `class_name`.
    fn class_name(&self) -> &str;

    /// Capability roles this extension implements. Must not be empty;
    /// an instance reporting no roles is rejected at load time.
    fn roles(&self) -> &[CapabilityRole];

    /// Called once after construction, before the extension is
    /// registered. A failure skips the manifest entry.
    async fn on_load(&self, _init: &ExtensionInit) -> AppResult<()> {
        Ok(())
    }

    /// Called for every lifecycle event on this extension's surfaces.
    async fn handle_event(&self, _ctx: &EventContext) -> AppResult<()> {
        Ok(())
    }
}
