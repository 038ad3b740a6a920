//! OpenRouter model catalog with a shared TTL cache

use super::client::OpenRouterClient;
use async_trait::async_trait;
use council_application::{CatalogError, ModelCatalog};
use council_domain::CatalogEntry;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(60 * 60);

struct CachedCatalog {
    fetched_at: Instant,
    entries: Vec<CatalogEntry>,
}

/// [`ModelCatalog`] backed by `GET /models`.
///
/// Successful listings are cached for `ttl`; failures are never cached.
pub struct OpenRouterCatalog {
    client: Arc<OpenRouterClient>,
    ttl: Duration,
    cache: RwLock<Option<CachedCatalog>>,
}

impl OpenRouterCatalog {
    pub fn new(client: Arc<OpenRouterClient>) -> Self {
        Self::with_ttl(client, DEFAULT_CATALOG_TTL)
    }

    pub fn with_ttl(client: Arc<OpenRouterClient>, ttl: Duration) -> Self {
        Self {
            client,
            ttl,
            cache: RwLock::new(None),
        }
    }

    fn fresh(&self, cached: &Option<CachedCatalog>) -> Option<Vec<CatalogEntry>> {
        cached
            .as_ref()
            .filter(|c| c.fetched_at.elapsed() < self.ttl)
            .map(|c| c.entries.clone())
    }
}

#[async_trait]
impl ModelCatalog for OpenRouterCatalog {
    async fn list_models(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        if let Some(entries) = self.fresh(&*self.cache.read().await) {
            debug!("Model catalog served from cache ({} entries)", entries.len());
            return Ok(entries);
        }

        let mut cache = self.cache.write().await;
        // Another caller may have refreshed while we waited for the lock
        if let Some(entries) = self.fresh(&cache) {
            return Ok(entries);
        }

        let entries = self.client.list_models().await?;
        info!("Fetched model catalog ({} entries)", entries.len());
        *cache = Some(CachedCatalog {
            fetched_at: Instant::now(),
            entries: entries.clone(),
        });
        Ok(entries)
    }
}
