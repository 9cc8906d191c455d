//! Extension listing handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::ExtensionModel;
use crate::state::AppState;

/// GET /api/extensions
pub async fn list_extensions(State(state): State<AppState>) -> Json<Vec<ExtensionModel>> {
    Json(
        state
            .registry
            .list_info()
            .into_iter()
            .map(ExtensionModel::from)
            .collect(),
    )
}
