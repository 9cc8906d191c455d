//! # docq-api
//!
//! HTTP API layer for Docq built on Axum.
//!
//! Provides the REST endpoints, bearer-secret and logging middleware,
//! extractors, DTOs with validation, and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
