//! Liveness handler.

use axum::Json;

/// GET /api/hello
pub async fn hello() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "response": "Hello World!" }))
}
