//! # docq-core
//!
//! Core crate for Docq. Contains configuration schemas, typed space and
//! feature keys, the collaborator traits for model inference and document
//! retrieval, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Docq crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
