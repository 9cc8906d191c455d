//! Capability roles an extension may implement.

use serde::{Deserialize, Serialize};

/// The extensibility surfaces an extension can attach to.
///
/// A web API role existed in earlier deployments but never carried a
/// concrete contract, so it is not modelled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityRole {
    /// Reacts to user-facing chat lifecycle points.
    WebUi,
    /// Reacts to data-access lifecycle points and may keep its own tables.
    DataLayer,
}

impl CapabilityRole {
    /// Returns the string name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WebUi => "web_ui",
            Self::DataLayer => "data_layer",
        }
    }
}

impl std::fmt::Display for CapabilityRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
