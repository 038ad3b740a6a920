//! Resolve Council use case
//!
//! Turns a participant selection (tier, explicit models, chairman) into a
//! [`Council`]. This is the participant registry: static tier lineups,
//! optional dynamic discovery through a [`ModelCatalog`], and chairman
//! designation.

use crate::ports::model_catalog::ModelCatalog;
use council_domain::{
    Council, CostTier, DomainError, LineupSource, Model, TierLineup, select_chairman,
    select_frontier,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while resolving the council
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid council configuration: {0}")]
    Configuration(#[from] DomainError),
}

/// Who should sit on the council
#[derive(Debug, Clone, Default)]
pub struct CouncilSelection {
    /// Cost tier name; `None` means the default tier
    pub tier: Option<String>,
    /// Explicit participants; non-empty overrides the tier lineup
    pub models: Vec<String>,
    pub chairman: Option<String>,
    /// Alternate chairmen in fallback order
    pub fallback_chairmen: Vec<String>,
    pub dynamic_discovery: bool,
}

impl CouncilSelection {
    pub fn tier(tier: impl Into<String>) -> Self {
        Self {
            tier: Some(tier.into()),
            ..Default::default()
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    pub fn with_chairman(mut self, chairman: impl Into<String>) -> Self {
        self.chairman = Some(chairman.into());
        self
    }

    pub fn with_fallback_chairmen(mut self, chairmen: Vec<String>) -> Self {
        self.fallback_chairmen = chairmen;
        self
    }

    pub fn with_discovery(mut self, enabled: bool) -> Self {
        self.dynamic_discovery = enabled;
        self
    }
}

/// Use case for resolving the council's participants
pub struct ResolveCouncilUseCase {
    catalog: Option<Arc<dyn ModelCatalog>>,
}

impl Default for ResolveCouncilUseCase {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolveCouncilUseCase {
    /// A registry that only knows the static tier lineups
    pub fn new() -> Self {
        Self { catalog: None }
    }

    /// A registry that may consult `catalog` when discovery is requested
    pub fn with_catalog(catalog: Arc<dyn ModelCatalog>) -> Self {
        Self {
            catalog: Some(catalog),
        }
    }

    pub async fn execute(&self, selection: &CouncilSelection) -> Result<Council, RegistryError> {
        let tier = match &selection.tier {
            Some(name) => name.parse::<CostTier>()?,
            None => CostTier::default(),
        };

        let configured_chairman = selection.chairman.as_deref().map(Model::new).transpose()?;
        let alternates = parse_models(&selection.fallback_chairmen)?;
        let explicit = parse_models(&selection.models)?;

        let (council_tier, source, contributors, chairman) = if !explicit.is_empty() {
            // Explicit lists ignore the tier lineup, except for its chairman
            // when the tier itself was asked for.
            let chairman = match configured_chairman {
                Some(chairman) => chairman,
                None if selection.tier.is_some() => tier.static_lineup().chairman,
                None => explicit[0].clone(),
            };
            (None, LineupSource::Explicit, explicit, chairman)
        } else {
            let (source, lineup) = self.lineup_for(tier, selection.dynamic_discovery).await;
            let chairman = configured_chairman.unwrap_or(lineup.chairman);
            (Some(tier), source, lineup.council, chairman)
        };

        let alternates = if alternates.is_empty() {
            contributors.clone()
        } else {
            alternates
        };

        let council = Council::new(council_tier, source, contributors, chairman, alternates)?;
        info!(
            "Council resolved ({:?}): {} contributor(s), chairman {}",
            council.source(),
            council.contributors().len(),
            council.chairman()
        );
        Ok(council)
    }

    /// Discovered lineup when possible, static table otherwise
    async fn lineup_for(&self, tier: CostTier, discovery: bool) -> (LineupSource, TierLineup) {
        let static_lineup = tier.static_lineup();
        let Some(catalog) = self.catalog.as_ref().filter(|_| discovery) else {
            debug!("Using static lineup for tier {}", tier);
            return (LineupSource::Static, static_lineup);
        };

        match catalog.list_models().await {
            Ok(entries) => {
                let council = select_frontier(&entries, tier, 1);
                if council.is_empty() {
                    warn!("Model catalog had no matching models for tier {}; using static lineup", tier);
                    return (LineupSource::Static, static_lineup);
                }
                let chairman = select_chairman(&entries).unwrap_or(static_lineup.chairman);
                (LineupSource::Discovered, TierLineup { council, chairman })
            }
            Err(e) => {
                warn!("Model discovery failed ({}); using static lineup for tier {}", e, tier);
                (LineupSource::Static, static_lineup)
            }
        }
    }
}

fn parse_models(names: &[String]) -> Result<Vec<Model>, DomainError> {
    names.iter().map(Model::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::model_catalog::CatalogError;
    use async_trait::async_trait;
    use council_domain::CatalogEntry;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedCatalog {
        result: Result<Vec<CatalogEntry>, CatalogError>,
        calls: AtomicUsize,
    }

    impl FixedCatalog {
        fn new(result: Result<Vec<CatalogEntry>, CatalogError>) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ModelCatalog for FixedCatalog {
        async fn list_models(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn ids(models: &[Model]) -> Vec<&str> {
        models.iter().map(|m| m.as_str()).collect()
    }

    #[tokio::test]
    async fn test_static_budget_lineup() {
        let council = ResolveCouncilUseCase::new()
            .execute(&CouncilSelection::tier("budget"))
            .await
            .unwrap();

        assert_eq!(council.source(), LineupSource::Static);
        assert_eq!(council.tier(), Some(CostTier::Budget));
        assert_eq!(council.contributors().len(), 4);
        assert_eq!(council.chairman().as_str(), "google/gemini-2.0-flash-001");
        // Default alternates are the other contributors
        assert!(!council.alternates().contains(council.chairman()));
        assert_eq!(council.alternates().len(), 3);
    }

    #[tokio::test]
    async fn test_unknown_tier() {
        let err = ResolveCouncilUseCase::new()
            .execute(&CouncilSelection::tier("gold"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Configuration(DomainError::UnknownTier("gold".to_string()))
        );
    }

    #[tokio::test]
    async fn test_explicit_list_overrides_tier() {
        let selection = CouncilSelection::default().with_models(vec![
            "openai/gpt-5.2".to_string(),
            "x-ai/grok-4".to_string(),
            "openai/gpt-5.2".to_string(),
        ]);
        let council = ResolveCouncilUseCase::new().execute(&selection).await.unwrap();

        assert_eq!(council.source(), LineupSource::Explicit);
        assert_eq!(council.tier(), None);
        assert_eq!(ids(council.contributors()), vec!["openai/gpt-5.2", "x-ai/grok-4"]);
        assert_eq!(council.chairman().as_str(), "openai/gpt-5.2");
    }

    #[tokio::test]
    async fn test_explicit_list_with_tier_uses_tier_chairman() {
        let selection = CouncilSelection::tier("premium").with_models(vec!["x-ai/grok-4".to_string()]);
        let council = ResolveCouncilUseCase::new().execute(&selection).await.unwrap();
        assert_eq!(council.chairman().as_str(), "google/gemini-3-pro-preview");
        assert!(!council.chairman_contributes());
    }

    #[tokio::test]
    async fn test_configured_chairman_and_alternates() {
        let selection = CouncilSelection::tier("balanced")
            .with_chairman("anthropic/claude-opus-4.5")
            .with_fallback_chairmen(vec!["x-ai/grok-4".to_string()]);
        let council = ResolveCouncilUseCase::new().execute(&selection).await.unwrap();
        assert_eq!(council.chairman().as_str(), "anthropic/claude-opus-4.5");
        assert_eq!(ids(council.alternates()), vec!["x-ai/grok-4"]);
    }

    #[tokio::test]
    async fn test_empty_model_name_is_rejected() {
        let selection = CouncilSelection::default().with_models(vec!["openai/gpt-5.2".to_string(), "  ".to_string()]);
        let err = ResolveCouncilUseCase::new().execute(&selection).await.unwrap_err();
        assert!(matches!(err, RegistryError::Configuration(DomainError::InvalidModel(_))));
    }

    #[tokio::test]
    async fn test_discovery_picks_newest_per_vendor() {
        let catalog = FixedCatalog::new(Ok(vec![
            CatalogEntry::new("openai/gpt-5.2", 200),
            CatalogEntry::new("openai/gpt-5.1", 100),
            CatalogEntry::new("anthropic/claude-sonnet-4.5", 150),
            CatalogEntry::new("google/gemini-3-pro-preview", 180),
            CatalogEntry::new("x-ai/grok-4.1-fast", 170),
        ]));
        let registry = ResolveCouncilUseCase::with_catalog(catalog.clone());
        let council = registry
            .execute(&CouncilSelection::tier("balanced").with_discovery(true))
            .await
            .unwrap();

        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
        assert_eq!(council.source(), LineupSource::Discovered);
        assert_eq!(council.contributors()[0].as_str(), "openai/gpt-5.2");
        assert_eq!(council.chairman().as_str(), "google/gemini-3-pro-preview");
    }

    #[tokio::test]
    async fn test_discovery_failure_falls_back_to_static() {
        let catalog = FixedCatalog::new(Err(CatalogError::Unavailable("connection refused".into())));
        let registry = ResolveCouncilUseCase::with_catalog(catalog);
        let council = registry
            .execute(&CouncilSelection::tier("premium").with_discovery(true))
            .await
            .unwrap();
        assert_eq!(council.source(), LineupSource::Static);
        assert_eq!(council.contributors(), CostTier::Premium.static_lineup().council.as_slice());
    }

    #[tokio::test]
    async fn test_discovery_empty_result_falls_back_to_static() {
        let catalog = FixedCatalog::new(Ok(vec![CatalogEntry::new("mistral/large", 1)]));
        let registry = ResolveCouncilUseCase::with_catalog(catalog);
        let council = registry
            .execute(&CouncilSelection::tier("budget").with_discovery(true))
            .await
            .unwrap();
        assert_eq!(council.source(), LineupSource::Static);
    }

    #[tokio::test]
    async fn test_discovery_disabled_skips_catalog() {
        let catalog = FixedCatalog::new(Ok(vec![]));
        let registry = ResolveCouncilUseCase::with_catalog(catalog.clone());
        registry.execute(&CouncilSelection::tier("budget")).await.unwrap();
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 0);
    }
}
