//! End-to-end tests against the assembled HTTP application.

mod helpers;

mod auth_test;
mod chat_test;
mod document_test;
mod extension_test;
mod settings_test;
mod space_test;
