//! Model catalog port
//!
//! Lists the models a provider currently offers, for dynamic discovery of
//! a tier's participants.

use async_trait::async_trait;
use council_domain::CatalogEntry;
use thiserror::Error;

/// Errors from a model catalog. Never fatal to a deliberation: the
/// registry falls back to the static tier lineup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed catalog response: {0}")]
    Malformed(String),
}

#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// Every model the provider lists
    async fn list_models(&self) -> Result<Vec<CatalogEntry>, CatalogError>;
}
