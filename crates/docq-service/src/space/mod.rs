//! Space management service.

pub mod service;

pub use service::SpaceService;
