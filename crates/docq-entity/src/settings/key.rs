//! Well-known settings keys.

use serde::{Deserialize, Serialize};

/// Keys under which system and organisation settings are stored.
///
/// The string forms carry spaces and title case to stay compatible with
/// settings rows written by existing deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingsKey {
    /// Which features an organisation has switched on.
    EnabledFeatures,
    /// Name of the model settings collection the organisation uses.
    ModelCollection,
}

impl SettingsKey {
    /// Database string form of the key.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsKey::EnabledFeatures => "Enabled Features",
            SettingsKey::ModelCollection => "Model Collection",
        }
    }
}

impl std::fmt::Display for SettingsKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
