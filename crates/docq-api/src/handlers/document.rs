//! Document upload, listing and indexing handlers.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use bytes::Bytes;

use docq_core::error::AppError;
use docq_core::types::SpaceId;
use docq_entity::space::Space;

use crate::dto::response::DocumentModel;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/spaces/{id}/files
pub async fn list_documents(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Vec<DocumentModel>>, ApiError> {
    let space = state.space_service.get(&auth, SpaceId::new(id)).await?;
    let docs = state.document_service.list(&space.key()).await?;
    Ok(Json(docs.into_iter().map(DocumentModel::from).collect()))
}

/// POST /api/spaces/{id}/files (multipart upload)
pub async fn upload_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<DocumentModel>, ApiError> {
    let space = require_writable(&state, &auth, id).await?;

    let mut file_name: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let file_name = file_name.ok_or_else(|| AppError::validation("file is required"))?;
    let data = data.ok_or_else(|| AppError::validation("file data is required"))?;

    let item = state
        .document_service
        .upload(&auth, &space.key(), &file_name, data)
        .await?;
    Ok(Json(item.into()))
}

/// DELETE /api/spaces/{id}/files/{name}
pub async fn delete_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, name)): Path<(i64, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let space = state.space_service.get(&auth, SpaceId::new(id)).await?;
    state
        .document_service
        .delete(&auth, &space.key(), &name)
        .await?;
    Ok(Json(serde_json::json!({ "deleted": name })))
}

/// POST /api/spaces/{id}/reindex
pub async fn reindex_space(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let space = state.space_service.get(&auth, SpaceId::new(id)).await?;
    let passages = state
        .document_service
        .reindex(&auth, &space.key())
        .await?;
    Ok(Json(serde_json::json!({ "passages": passages })))
}

/// Resolves a space and refuses writes into archived ones.
async fn require_writable(
    state: &AppState,
    auth: &AuthUser,
    id: i64,
) -> Result<Space, ApiError> {
    let space = state.space_service.get(auth, SpaceId::new(id)).await?;
    if space.archived {
        return Err(AppError::validation("Space is archived").into());
    }
    Ok(space)
}
