//! Space domain entities.

pub mod model;

pub use model::{CreateSpace, Space, UpdateSpace};
