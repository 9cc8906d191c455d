//! `AuthUser` extractor building the per-request service context.
//!
//! Caller identity comes from the `X-Docq-User-Id` and `X-Docq-Org-Id`
//! headers. Deployments without per-user identity omit them and every
//! request acts as the system identity. Authorization itself is the
//! bearer-secret middleware's job, not this extractor's.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use docq_core::error::AppError;
use docq_core::types::{OrgId, UserId};
use docq_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Header naming the acting user's numeric ID.
pub const HEADER_USER_ID: &str = "x-docq-user-id";
/// Header naming the organisation the request is scoped to.
pub const HEADER_ORG_ID: &str = "x-docq-org-id";

/// Extracted caller context available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn header_id(parts: &Parts, name: &str) -> Result<Option<i64>, AppError> {
    let Some(value) = parts.headers.get(name) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(Some)
        .ok_or_else(|| AppError::validation(format!("Header '{name}' must be an integer")))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = header_id(parts, HEADER_USER_ID)?
            .map(UserId::new)
            .unwrap_or(UserId::SYSTEM);
        let org_id = header_id(parts, HEADER_ORG_ID)?
            .map(OrgId::new)
            .unwrap_or(OrgId::SYSTEM);

        Ok(AuthUser(RequestContext::new(user_id, org_id)))
    }
}
