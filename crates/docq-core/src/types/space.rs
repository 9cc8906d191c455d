//! Space types and the composite space key.
//!
//! A space is a named collection of documents. Every on-disk artifact
//! belonging to a space (uploaded files, index shards) lives under a
//! directory derived from the space key, so the string forms here are
//! part of the storage layout and must stay stable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::id::{OrgId, SpaceId};

/// Classification of a document space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlite", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlite", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum SpaceType {
    /// Documents belonging to a single user.
    Personal,
    /// Documents shared within an organisation.
    Shared,
    /// Documents accessible to all users, including anonymous ones.
    Public,
    /// Ad-hoc documents attached to a single chat thread.
    Thread,
}

impl SpaceType {
    /// Wire name, used in API payloads and the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Shared => "shared",
            Self::Public => "public",
            Self::Thread => "thread",
        }
    }

    /// Directory segment used under the data dir.
    ///
    /// Upper-case for compatibility with existing deployments, which lay
    /// out storage as `upload/PERSONAL/{id}` and `index/SHARED/{id}`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Personal => "PERSONAL",
            Self::Shared => "SHARED",
            Self::Public => "PUBLIC",
            Self::Thread => "THREAD",
        }
    }
}

impl fmt::Display for SpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SpaceType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(Self::Personal),
            "shared" => Ok(Self::Shared),
            "public" => Ok(Self::Public),
            "thread" => Ok(Self::Thread),
            other => Err(AppError::validation(format!("unknown space type '{other}'"))),
        }
    }
}

/// Composite key identifying a space across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceKey {
    /// Space classification.
    pub space_type: SpaceType,
    /// Row id of the space.
    pub id: SpaceId,
    /// Organisation the space belongs to.
    pub org_id: OrgId,
}

impl SpaceKey {
    /// Create a new space key.
    pub fn new(space_type: SpaceType, id: SpaceId, org_id: OrgId) -> Self {
        Self {
            space_type,
            id,
            org_id,
        }
    }

    /// Underscore-joined form, safe for use in identifiers.
    pub fn value(&self) -> String {
        format!(
            "{}_{}_{}",
            self.space_type.dir_name(),
            self.org_id,
            self.id
        )
    }
}

impl fmt::Display for SpaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.space_type.dir_name(),
            self.org_id,
            self.id
        )
    }
}
