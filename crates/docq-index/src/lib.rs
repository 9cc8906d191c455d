//! # docq-index
//!
//! The bundled "local" implementation of
//! [`DocumentIndex`](docq_core::traits::DocumentIndex): passages in a
//! dedicated SQLite file, term-overlap retrieval, no external services.
//! Deployments wanting a hosted retrieval backend implement the same
//! trait and register another backend name.

pub mod chunker;
pub mod local;

use std::path::Path;
use std::sync::Arc;

use docq_core::config::IndexConfig;
use docq_core::traits::DocumentIndex;
use docq_core::{AppError, AppResult};

pub use local::LocalIndex;

/// Open the configured index backend.
pub async fn open_index(config: &IndexConfig, data_dir: &Path) -> AppResult<Arc<dyn DocumentIndex>> {
    match config.backend.as_str() {
        "local" => {
            let index = LocalIndex::open(&data_dir.join("index"), config).await?;
            Ok(Arc::new(index))
        }
        other => Err(AppError::not_implemented(format!(
            "Index backend '{other}' is not available in this build"
        ))),
    }
}
