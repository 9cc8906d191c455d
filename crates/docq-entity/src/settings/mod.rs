//! Settings domain entities.

pub mod key;
pub mod model;

pub use key::SettingsKey;
pub use model::Setting;
