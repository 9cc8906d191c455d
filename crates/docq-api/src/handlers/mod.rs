//! Route handlers organized by domain.

pub mod chat;
pub mod document;
pub mod extension;
pub mod hello;
pub mod settings;
pub mod space;
