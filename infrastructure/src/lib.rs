//! Infrastructure layer for llm-council
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod openrouter;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileCouncilConfig, FileExecutionConfig, FileOutputConfig,
    FileProviderConfig,
};
pub use openrouter::{
    catalog::OpenRouterCatalog,
    client::{OpenRouterClient, OpenRouterConfig},
    error::{OpenRouterError, Result},
    gateway::OpenRouterGateway,
    session::OpenRouterSession,
};
