//! Space lifecycle: create, update, archive and lookup.

use std::sync::Arc;

use tracing::info;

use docq_core::error::AppError;
use docq_core::types::{SpaceId, SpaceType};
use docq_database::repositories::SpaceRepository;
use docq_entity::space::{CreateSpace, Space, UpdateSpace};
use docq_extension::{EventContext, EventDispatcher, LifecycleEvent};

use crate::context::RequestContext;

/// Manages document spaces for an organisation.
#[derive(Clone)]
pub struct SpaceService {
    /// Space repository.
    spaces: Arc<SpaceRepository>,
    /// Dispatcher for firing lifecycle events.
    dispatcher: Arc<EventDispatcher>,
}

impl std::fmt::Debug for SpaceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpaceService").finish()
    }
}

impl SpaceService {
    /// Creates a new space service.
    pub fn new(spaces: Arc<SpaceRepository>, dispatcher: Arc<EventDispatcher>) -> Self {
        Self { spaces, dispatcher }
    }

    /// Creates a space owned by the caller's organisation.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        name: &str,
        summary: &str,
        space_type: SpaceType,
    ) -> Result<Space, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Space name cannot be empty"));
        }

        let create = CreateSpace {
            org_id: ctx.org_id,
            name: name.to_string(),
            summary: summary.trim().to_string(),
            space_type,
        };
        let space = self.spaces.create(&create, ctx.request_time).await?;

        info!(
            user_id = %ctx.user_id,
            space_id = %space.id,
            name = %space.name,
            space_type = %space.space_type,
            "Created space"
        );
        self.fire(LifecycleEvent::SpaceCreated, ctx, &space).await;

        Ok(space)
    }

    /// Applies a partial update to a space.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: SpaceId,
        update: &UpdateSpace,
    ) -> Result<Space, AppError> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Space name cannot be empty"));
            }
        }

        let space = self
            .spaces
            .update(id, ctx.org_id, update, ctx.request_time)
            .await?
            .ok_or_else(|| AppError::not_found("Space not found"))?;

        info!(user_id = %ctx.user_id, space_id = %space.id, "Updated space");
        self.fire(LifecycleEvent::SpaceUpdated, ctx, &space).await;

        Ok(space)
    }

    /// Archives a space, hiding it from listings.
    pub async fn archive(&self, ctx: &RequestContext, id: SpaceId) -> Result<Space, AppError> {
        let space = self
            .spaces
            .archive(id, ctx.org_id, ctx.request_time)
            .await?
            .ok_or_else(|| AppError::not_found("Space not found"))?;

        info!(user_id = %ctx.user_id, space_id = %space.id, "Archived space");
        self.fire(LifecycleEvent::SpaceArchived, ctx, &space).await;

        Ok(space)
    }

    /// Fetches a space by ID within the caller's organisation.
    pub async fn get(&self, ctx: &RequestContext, id: SpaceId) -> Result<Space, AppError> {
        self.spaces
            .find_by_id(id, ctx.org_id)
            .await?
            .ok_or_else(|| AppError::not_found("Space not found"))
    }

    /// Lists the organisation's spaces, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        include_archived: bool,
    ) -> Result<Vec<Space>, AppError> {
        self.spaces.list(ctx.org_id, include_archived).await
    }

    async fn fire(&self, event: LifecycleEvent, ctx: &RequestContext, space: &Space) {
        self.dispatcher
            .fire_and_forget(
                &EventContext::new(event)
                    .with_actor(ctx.user_id)
                    .with_int("space_id", space.id.as_i64())
                    .with_string("space", &space.key().value())
                    .with_string("name", &space.name),
            )
            .await;
    }
}
