//! Space management handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use docq_core::types::SpaceId;
use docq_entity::space::UpdateSpace;

use crate::dto;
use crate::dto::request::{CreateSpaceRequest, SpaceListParams, UpdateSpaceRequest};
use crate::dto::response::SpaceModel;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/spaces?include_archived=true
pub async fn list_spaces(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SpaceListParams>,
) -> Result<Json<Vec<SpaceModel>>, ApiError> {
    let spaces = state
        .space_service
        .list(&auth, params.include_archived)
        .await?;
    Ok(Json(spaces.into_iter().map(SpaceModel::from).collect()))
}

/// POST /api/spaces
pub async fn create_space(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateSpaceRequest>,
) -> Result<Json<SpaceModel>, ApiError> {
    dto::validate(&req)?;
    let space = state
        .space_service
        .create(&auth, &req.name, &req.summary, req.space_type)
        .await?;
    Ok(Json(space.into()))
}

/// GET /api/spaces/{id}
pub async fn get_space(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<SpaceModel>, ApiError> {
    let space = state.space_service.get(&auth, SpaceId::new(id)).await?;
    Ok(Json(space.into()))
}

/// PUT /api/spaces/{id}
pub async fn update_space(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateSpaceRequest>,
) -> Result<Json<SpaceModel>, ApiError> {
    let update = UpdateSpace {
        name: req.name,
        summary: req.summary,
        archived: req.archived,
    };
    let space = state
        .space_service
        .update(&auth, SpaceId::new(id), &update)
        .await?;
    Ok(Json(space.into()))
}

/// POST /api/spaces/{id}/archive
pub async fn archive_space(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<SpaceModel>, ApiError> {
    let space = state.space_service.archive(&auth, SpaceId::new(id)).await?;
    Ok(Json(space.into()))
}
