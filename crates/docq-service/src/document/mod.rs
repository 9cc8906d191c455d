//! Document upload, listing, deletion and reindexing.

pub mod service;

pub use service::DocumentService;
