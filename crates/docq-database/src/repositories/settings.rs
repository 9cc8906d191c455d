//! Settings repository implementation.
//!
//! One row per (org, user, key). Org-wide settings use
//! [`UserId::SYSTEM`] as their user scope.

use sqlx::SqlitePool;

use docq_core::error::{AppError, ErrorKind};
use docq_core::result::AppResult;
use docq_core::types::{OrgId, UserId};
use docq_entity::settings::Setting;

/// Repository for scoped settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Create a new settings repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch one setting by scope and key.
    pub async fn get(
        &self,
        org_id: OrgId,
        user_id: UserId,
        key: &str,
    ) -> AppResult<Option<Setting>> {
        sqlx::query_as::<_, Setting>(
            "SELECT user_id, org_id, key, val FROM settings \
             WHERE org_id = ? AND user_id = ? AND key = ?",
        )
        .bind(org_id)
        .bind(user_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read setting", e))
    }

    /// Insert or overwrite one setting.
    pub async fn upsert(&self, setting: &Setting) -> AppResult<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO settings (org_id, user_id, key, val) VALUES (?, ?, ?, ?)",
        )
        .bind(setting.org_id)
        .bind(setting.user_id)
        .bind(&setting.key)
        .bind(&setting.val)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write setting", e))?;
        Ok(())
    }

    /// All settings stored for a scope.
    pub async fn list_for_scope(&self, org_id: OrgId, user_id: UserId) -> AppResult<Vec<Setting>> {
        sqlx::query_as::<_, Setting>(
            "SELECT user_id, org_id, key, val FROM settings \
             WHERE org_id = ? AND user_id = ? ORDER BY key",
        )
        .bind(org_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list settings", e))
    }
}
