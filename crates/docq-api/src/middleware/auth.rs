//! Bearer-secret authentication middleware.
//!
//! Every protected route requires `Authorization: Bearer <secret>` where
//! the secret matches `server.api_secret` from configuration. An empty
//! configured secret rejects all protected requests rather than waving
//! them through.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use docq_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Middleware that rejects requests whose bearer token does not match
/// the configured API secret.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let secret = &state.config.server.api_secret;
    if secret.is_empty() {
        return Err(AppError::authentication("API secret is not configured").into());
    }

    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::authentication("Missing bearer token"))?;

    if token != secret {
        return Err(AppError::authentication("Invalid bearer token").into());
    }

    Ok(next.run(request).await)
}
