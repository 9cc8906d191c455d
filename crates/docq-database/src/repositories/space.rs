//! Space repository implementation.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use docq_core::error::{AppError, ErrorKind};
use docq_core::result::AppResult;
use docq_core::types::{OrgId, SpaceId};
use docq_entity::space::{CreateSpace, Space, UpdateSpace};

/// Repository for document spaces.
#[derive(Debug, Clone)]
pub struct SpaceRepository {
    pool: SqlitePool,
}

impl SpaceRepository {
    /// Create a new space repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a space. Names are unique within an organisation.
    pub async fn create(&self, create: &CreateSpace, now: DateTime<Utc>) -> AppResult<Space> {
        sqlx::query_as::<_, Space>(
            "INSERT INTO spaces (org_id, name, summary, archived, space_type, created_at, updated_at) \
             VALUES (?, ?, ?, FALSE, ?, ?, ?) \
             RETURNING id, org_id, name, summary, archived, space_type, created_at, updated_at",
        )
        .bind(create.org_id)
        .bind(&create.name)
        .bind(&create.summary)
        .bind(create.space_type)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                AppError::conflict(format!("Space '{}' already exists", create.name))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create space", e)
            }
        })
    }

    /// Apply a partial update. Returns `None` when the space does not exist.
    pub async fn update(
        &self,
        id: SpaceId,
        org_id: OrgId,
        update: &UpdateSpace,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Space>> {
        sqlx::query_as::<_, Space>(
            "UPDATE spaces SET \
                name = COALESCE(?, name), \
                summary = COALESCE(?, summary), \
                archived = COALESCE(?, archived), \
                updated_at = ? \
             WHERE id = ? AND org_id = ? \
             RETURNING id, org_id, name, summary, archived, space_type, created_at, updated_at",
        )
        .bind(update.name.as_deref())
        .bind(update.summary.as_deref())
        .bind(update.archived)
        .bind(now)
        .bind(id)
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                AppError::conflict("Another space already uses that name")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to update space", e)
            }
        })
    }

    /// Mark a space archived. Returns `None` when the space does not exist.
    pub async fn archive(
        &self,
        id: SpaceId,
        org_id: OrgId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Space>> {
        sqlx::query_as::<_, Space>(
            "UPDATE spaces SET archived = TRUE, updated_at = ? \
             WHERE id = ? AND org_id = ? \
             RETURNING id, org_id, name, summary, archived, space_type, created_at, updated_at",
        )
        .bind(now)
        .bind(id)
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to archive space", e))
    }

    /// Find a space by ID within an organisation.
    pub async fn find_by_id(&self, id: SpaceId, org_id: OrgId) -> AppResult<Option<Space>> {
        sqlx::query_as::<_, Space>(
            "SELECT id, org_id, name, summary, archived, space_type, created_at, updated_at \
             FROM spaces WHERE id = ? AND org_id = ?",
        )
        .bind(id)
        .bind(org_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find space", e))
    }

    /// List an organisation's spaces, newest first.
    pub async fn list(&self, org_id: OrgId, include_archived: bool) -> AppResult<Vec<Space>> {
        let sql = if include_archived {
            "SELECT id, org_id, name, summary, archived, space_type, created_at, updated_at \
             FROM spaces WHERE org_id = ? ORDER BY created_at DESC, id DESC"
        } else {
            "SELECT id, org_id, name, summary, archived, space_type, created_at, updated_at \
             FROM spaces WHERE org_id = ? AND archived = FALSE \
             ORDER BY created_at DESC, id DESC"
        };
        sqlx::query_as::<_, Space>(sql)
            .bind(org_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list spaces", e))
    }
}
