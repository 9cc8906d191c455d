//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod app;
pub mod chat;
pub mod index;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
pub use self::chat::ChatConfig;
pub use self::index::IndexConfig;
use self::logging::LoggingConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Environment variable pointing at the data directory, kept for
/// compatibility with existing deployments.
pub const ENV_DOCQ_DATA: &str = "DOCQ_DATA";

/// Environment variable holding the API bearer secret, kept for
/// compatibility with existing deployments.
pub const ENV_DOCQ_API_SECRET: &str = "DOCQ_API_SECRET";

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// System database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Data directory and upload settings.
    pub storage: StorageConfig,
    /// Extension subsystem settings.
    #[serde(default)]
    pub extensions: ExtensionsConfig,
    /// Document index settings.
    #[serde(default)]
    pub index: IndexConfig,
    /// Chat and model settings.
    #[serde(default)]
    pub chat: ChatConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// System database connection pool configuration.
///
/// The database file itself lives under the data dir (see
/// [`StorageConfig::system_db_path`]); only pool tuning is configured here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection acquire timeout in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

/// Extension subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionsConfig {
    /// Whether extensions are loaded at startup.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Path to the extensions manifest file.
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
}

impl Default for ExtensionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            manifest_path: default_manifest_path(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `DOCQ__`. The bare `DOCQ_DATA`
    /// and `DOCQ_API_SECRET` variables from existing deployments are applied
    /// last and win over everything else.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("DOCQ")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        if let Ok(data_dir) = std::env::var(ENV_DOCQ_DATA) {
            if !data_dir.is_empty() {
                config.storage.data_dir = data_dir;
            }
        }
        if let Ok(secret) = std::env::var(ENV_DOCQ_API_SECRET) {
            if !secret.is_empty() {
                config.server.api_secret = secret;
            }
        }

        Ok(config)
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_manifest_path() -> String {
    ".docq-extensions.json".to_string()
}

fn default_true() -> bool {
    true
}
