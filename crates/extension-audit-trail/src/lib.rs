//! Audit-trail extension for Docq.
//!
//! Records every lifecycle event it receives as a row in its own
//! `ext_audit_trail` table, kept in the system SQLite database next to
//! the application's tables. The table belongs to this extension alone;
//! the application never reads or migrates it.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::debug;

use docq_core::AppResult;
use docq_core::config::DatabaseConfig;
use docq_core::error::{AppError, ErrorKind};
use docq_database::connection::DatabasePool;
use docq_extension::{
    CapabilityRole, EventContext, Extension, ExtensionCatalog, ExtensionInit,
};

/// Module name this extension's constructor registers under.
pub const MODULE_NAME: &str = "docq_extensions.audit_trail";
/// Constructor name, as referenced by manifests.
pub const CLASS_NAME: &str = "AuditTrailExtension";

const CREATE_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS ext_audit_trail (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    event TEXT NOT NULL,
    actor INTEGER,
    data TEXT NOT NULL,
    fired_at TEXT NOT NULL
)";

/// Registers this extension's constructor in a catalog.
pub fn register(catalog: &mut ExtensionCatalog) {
    catalog.register_constructor(MODULE_NAME, CLASS_NAME, |_| {
        Ok(Arc::new(AuditTrailExtension::new()) as Arc<dyn Extension>)
    });
}

/// Data-layer extension appending one row per received event.
#[derive(Debug, Default)]
pub struct AuditTrailExtension {
    pool: OnceLock<DatabasePool>,
}

impl AuditTrailExtension {
    /// Creates an unconnected instance; the database opens in `on_load`.
    pub fn new() -> Self {
        Self::default()
    }

    fn pool(&self) -> AppResult<&DatabasePool> {
        self.pool
            .get()
            .ok_or_else(|| AppError::extension_hook("Audit trail database not initialised"))
    }

    /// Number of recorded rows.
    pub async fn recorded(&self) -> AppResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM ext_audit_trail")
            .fetch_one(self.pool()?.pool())
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count audit rows", e)
            })?;
        Ok(row.0)
    }
}

#[async_trait]
impl Extension for AuditTrailExtension {
    fn class_name(&self) -> &str {
        CLASS_NAME
    }

    fn roles(&self) -> &[CapabilityRole] {
        &[CapabilityRole::DataLayer]
    }

    async fn on_load(&self, init: &ExtensionInit) -> AppResult<()> {
        let pool =
            DatabasePool::connect(&init.sqlite_system_path, &DatabaseConfig::default()).await?;
        sqlx::query(CREATE_TABLE)
            .execute(pool.pool())
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    "Failed to create ext_audit_trail table",
                    e,
                )
            })?;
        // First pool wins if load ever races; later ones are dropped.
        let _ = self.pool.set(pool);
        Ok(())
    }

    async fn handle_event(&self, ctx: &EventContext) -> AppResult<()> {
        let data = serde_json::to_string(&ctx.data).map_err(|e| {
            AppError::with_source(ErrorKind::Serialization, "Failed to encode event data", e)
        })?;

        sqlx::query(
            "INSERT INTO ext_audit_trail (event, actor, data, fired_at) VALUES (?, ?, ?, ?)",
        )
        .bind(ctx.event.as_str())
        .bind(ctx.actor.map(|a| a.as_i64()))
        .bind(data)
        .bind(ctx.timestamp.to_rfc3339())
        .execute(self.pool()?.pool())
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to append audit row", e)
        })?;

        debug!(event = %ctx.event, "Audit row appended");
        Ok(())
    }
}
