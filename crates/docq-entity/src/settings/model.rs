//! Settings entity model.

use docq_core::types::{OrgId, UserId};
use docq_core::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One stored setting value.
///
/// Settings are scoped by user and organisation. System-wide values use
/// [`UserId::SYSTEM`] and [`OrgId::SYSTEM`] as their scope.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    /// User scope, [`UserId::SYSTEM`] for org-wide settings.
    pub user_id: UserId,
    /// Organisation scope.
    pub org_id: OrgId,
    /// Setting key.
    pub key: String,
    /// JSON-encoded value.
    pub val: String,
}

impl Setting {
    /// Decode the JSON value into a concrete type.
    pub fn parse<T: DeserializeOwned>(&self) -> AppResult<T> {
        serde_json::from_str(&self.val).map_err(|e| {
            AppError::with_source(
                docq_core::error::ErrorKind::Serialization,
                format!("invalid JSON stored for setting '{}'", self.key),
                e,
            )
        })
    }
}
