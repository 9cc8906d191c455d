//! Chat feature types and the per-user feature key.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::types::id::UserId;

/// The chat-style features a user can interact with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    /// Question answering over documents in shared spaces.
    AskShared,
    /// Question answering over documents in public spaces.
    AskPublic,
    /// General chat with the model, no document retrieval.
    ChatPrivate,
}

impl FeatureType {
    /// Wire name, also stored in the `feature` column of chat tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AskShared => "ask_shared",
            Self::AskPublic => "ask_public",
            Self::ChatPrivate => "chat_private",
        }
    }

    /// Whether this feature answers from indexed documents.
    pub fn is_ask(&self) -> bool {
        matches!(self, Self::AskShared | Self::AskPublic)
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FeatureType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ask_shared" => Ok(Self::AskShared),
            "ask_public" => Ok(Self::AskPublic),
            "chat_private" => Ok(Self::ChatPrivate),
            other => Err(AppError::validation(format!("unknown feature '{other}'"))),
        }
    }
}

/// Key identifying one feature as used by one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureKey {
    /// The feature.
    pub feature: FeatureType,
    /// The user exercising the feature.
    pub user_id: UserId,
}

impl FeatureKey {
    /// Create a new feature key.
    pub fn new(feature: FeatureType, user_id: UserId) -> Self {
        Self { feature, user_id }
    }

    /// Underscore-joined form, safe for use in identifiers.
    pub fn value(&self) -> String {
        format!("{}_{}", self.feature.as_str(), self.user_id)
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.feature.as_str(), self.user_id)
    }
}
