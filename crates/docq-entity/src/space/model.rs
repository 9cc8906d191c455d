//! Space entity model.

use chrono::{DateTime, Utc};
use docq_core::types::{OrgId, SpaceId, SpaceKey, SpaceType};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named collection of documents owned by an organisation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Space {
    /// Unique space identifier.
    pub id: SpaceId,
    /// Owning organisation.
    pub org_id: OrgId,
    /// Space name, unique within the organisation.
    pub name: String,
    /// Short description of the space contents.
    pub summary: String,
    /// Archived spaces are hidden from listings and refuse uploads.
    pub archived: bool,
    /// Access level of the space.
    pub space_type: SpaceType,
    /// When the space was created.
    pub created_at: DateTime<Utc>,
    /// When the space was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Space {
    /// Storage key for this space.
    pub fn key(&self) -> SpaceKey {
        SpaceKey::new(self.space_type, self.id, self.org_id)
    }
}

/// Data required to create a new space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpace {
    /// Owning organisation.
    pub org_id: OrgId,
    /// Space name.
    pub name: String,
    /// Short description.
    pub summary: String,
    /// Access level.
    pub space_type: SpaceType,
}

/// Data for updating an existing space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSpace {
    /// New name, if changing.
    pub name: Option<String>,
    /// New summary, if changing.
    pub summary: Option<String>,
    /// New archived state, if changing.
    pub archived: Option<bool>,
}
