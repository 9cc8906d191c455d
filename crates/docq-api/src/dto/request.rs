//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use docq_core::error::AppError;
use docq_core::types::{FeatureType, SpaceType};

/// General chat completion request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChatCompletionRequest {
    /// Question text.
    #[validate(length(min = 1, message = "input is required"))]
    pub input: String,
    /// Thread to continue; a new thread is created when absent.
    pub thread_id: Option<i64>,
}

/// Document question-answering request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RagCompletionRequest {
    /// Question text.
    #[validate(length(min = 1, message = "input is required"))]
    pub input: String,
    /// Thread to continue; a new thread is created when absent.
    pub thread_id: Option<i64>,
    /// Primary space searched for passages.
    pub space_id: i64,
    /// Further spaces searched after the primary one.
    #[serde(default)]
    pub extra_space_ids: Vec<i64>,
}

/// Thread creation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateThreadRequest {
    /// Thread topic.
    #[validate(length(min = 1, message = "topic is required"))]
    pub topic: String,
}

/// Space creation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpaceRequest {
    /// Space name, unique within the organisation.
    #[validate(length(min = 1, max = 200, message = "name must be 1-200 characters"))]
    pub name: String,
    /// Short description of the space contents.
    #[serde(default)]
    pub summary: String,
    /// Access level.
    pub space_type: SpaceType,
}

/// Space update request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpaceRequest {
    /// New name, if changing.
    pub name: Option<String>,
    /// New summary, if changing.
    pub summary: Option<String>,
    /// New archived state, if changing.
    pub archived: Option<bool>,
}

/// Maps the `feature` query parameter onto a chat feature.
///
/// `chat` is the general assistant, `rag` answers over documents.
fn feature_from_param(param: Option<&str>) -> Result<FeatureType, AppError> {
    match param {
        None | Some("chat") => Ok(FeatureType::ChatPrivate),
        Some("rag") => Ok(FeatureType::AskShared),
        Some(other) => Err(AppError::validation(format!(
            "Unknown feature '{other}', expected 'chat' or 'rag'"
        ))),
    }
}

/// Query parameters selecting a chat feature.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeatureParams {
    /// Feature name, `chat` (default) or `rag`.
    pub feature: Option<String>,
}

impl FeatureParams {
    /// The selected feature.
    pub fn feature_type(&self) -> Result<FeatureType, AppError> {
        feature_from_param(self.feature.as_deref())
    }
}

/// Query parameters for the chat history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HistoryParams {
    /// Thread to read, required.
    pub thread_id: Option<i64>,
    /// Feature name, `chat` (default) or `rag`.
    pub feature: Option<String>,
    /// Page number, starting at 1.
    pub page: Option<u32>,
    /// Messages per page.
    pub limit: Option<u32>,
}

impl HistoryParams {
    /// The selected feature.
    pub fn feature_type(&self) -> Result<FeatureType, AppError> {
        feature_from_param(self.feature.as_deref())
    }

    /// Page number, at least 1.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, clamped to 1..=100.
    pub fn limit(&self) -> u32 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }
}

/// Query parameters for space listings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpaceListParams {
    /// Include archived spaces in the listing.
    #[serde(default)]
    pub include_archived: bool,
}
