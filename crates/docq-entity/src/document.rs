//! Document listing value object.
//!
//! Uploaded documents are stored as plain files under the space's upload
//! directory, so listings come from a directory scan rather than a table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One uploaded document as seen in a space listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentListItem {
    /// File name within the space.
    pub name: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Last modification time.
    pub modified_at: DateTime<Utc>,
}
