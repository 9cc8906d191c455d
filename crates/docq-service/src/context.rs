//! Request context carrying the acting user and organisation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docq_core::types::{FeatureKey, FeatureType, OrgId, UserId};

/// Context for the current request.
///
/// Built by the API layer and passed into service methods so that every
/// operation knows who is acting and in which organisation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting user's ID.
    pub user_id: UserId,
    /// The organisation the request is scoped to.
    pub org_id: OrgId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context stamped with the current time.
    pub fn new(user_id: UserId, org_id: OrgId) -> Self {
        Self {
            user_id,
            org_id,
            request_time: Utc::now(),
        }
    }

    /// The feature key for this user exercising `feature`.
    pub fn feature_key(&self, feature: FeatureType) -> FeatureKey {
        FeatureKey::new(feature, self.user_id)
    }
}
