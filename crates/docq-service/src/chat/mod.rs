//! Chat and ask services: threads, history windows, prompt assembly and
//! the query flow that turns a question into a persisted exchange.

pub mod prompt;
pub mod service;

pub use service::{ChatExchange, ChatService, QueryParams};
