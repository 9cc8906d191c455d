//! Collaborator traits implemented by the LLM and index crates.
//!
//! Services depend on these traits, never on a concrete provider or
//! backend, so either side can be swapped without touching chat logic.

pub mod completion;
pub mod index;

pub use completion::{Completion, CompletionProvider, CompletionRequest};
pub use index::{DocumentIndex, IndexableDocument, ScoredPassage};
