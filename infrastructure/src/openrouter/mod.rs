//! OpenRouter adapter
//!
//! Implements [`LlmGateway`](council_application::LlmGateway) and
//! [`ModelCatalog`](council_application::ModelCatalog) over an
//! OpenRouter-compatible HTTP API.

pub mod catalog;
pub mod client;
pub mod error;
pub mod gateway;
pub mod protocol;
pub mod session;
