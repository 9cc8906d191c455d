//! Typed identifiers and domain keys.

pub mod feature;
pub mod id;
pub mod space;

pub use feature::{FeatureKey, FeatureType};
pub use id::{MessageId, OrgId, SpaceId, ThreadId, UserId};
pub use space::{SpaceKey, SpaceType};
