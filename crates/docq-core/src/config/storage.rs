//! Data directory layout and upload limits.
//!
//! Everything Docq persists lives under one data directory:
//!
//! ```text
//! {data_dir}/sqlite/SHARED/system.db      system database
//! {data_dir}/index/                       document index backend files
//! {data_dir}/upload/{TYPE}/{space_id}/    uploaded documents per space
//! ```
//!
//! The layout matches existing deployments, so the path helpers here are
//! the single source of truth for it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::SpaceKey;

/// File storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root data directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_bytes: u64,
}

impl StorageConfig {
    /// Root data directory as a path.
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    /// Directory holding SQLite database files.
    pub fn sqlite_dir(&self) -> PathBuf {
        self.data_dir().join("sqlite").join("SHARED")
    }

    /// Path of the system SQLite database file.
    pub fn system_db_path(&self) -> PathBuf {
        self.sqlite_dir().join("system.db")
    }

    /// Directory holding document index backend files.
    pub fn index_dir(&self) -> PathBuf {
        self.data_dir().join("index")
    }

    /// Upload directory for a space.
    pub fn upload_dir(&self, space: &SpaceKey) -> PathBuf {
        self.data_dir()
            .join("upload")
            .join(space.space_type.dir_name())
            .join(space.id.to_string())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            max_upload_size_bytes: default_max_upload_size(),
        }
    }
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_max_upload_size() -> u64 {
    50 * 1024 * 1024
}
