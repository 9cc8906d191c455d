//! Organisation settings handlers.

use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};

use docq_core::types::OrgId;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/orgs/{org_id}/settings
pub async fn get_org_settings(
    State(state): State<AppState>,
    Path(org_id): Path<i64>,
) -> Result<Json<HashMap<String, serde_json::Value>>, ApiError> {
    let settings = state
        .settings_service
        .org_settings(OrgId::new(org_id))
        .await?;
    Ok(Json(settings))
}

/// PUT /api/orgs/{org_id}/settings
///
/// Returns the full settings map after the write.
pub async fn update_org_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<i64>,
    Json(values): Json<HashMap<String, serde_json::Value>>,
) -> Result<Json<HashMap<String, serde_json::Value>>, ApiError> {
    let org_id = OrgId::new(org_id);
    state
        .settings_service
        .update_org_settings(&auth, org_id, &values)
        .await?;
    let settings = state.settings_service.org_settings(org_id).await?;
    Ok(Json(settings))
}
