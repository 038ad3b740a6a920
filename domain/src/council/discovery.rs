//! Frontier model selection from a provider catalog
//!
//! Pure functions over catalog entries; fetching the catalog is an
//! infrastructure concern behind the `ModelCatalog` port.

use super::tier::CostTier;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Vendors represented on a discovered council, in seating order
pub const FRONTIER_VENDORS: [&str; 4] = ["openai", "anthropic", "google", "x-ai"];

/// Include/exclude substring filters for one vendor's model names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorPreference {
    pub vendor: &'static str,
    pub include: &'static [&'static str],
    pub exclude: &'static [&'static str],
}

impl VendorPreference {
    pub const fn new(
        vendor: &'static str,
        include: &'static [&'static str],
        exclude: &'static [&'static str],
    ) -> Self {
        Self {
            vendor,
            include,
            exclude,
        }
    }

    /// Check a model id (`vendor/name`) against this preference.
    ///
    /// The name part must contain at least one include pattern (when any are
    /// given) and none of the exclude patterns. Matching is case-insensitive.
    pub fn matches(&self, model_id: &str) -> bool {
        let name = model_id.rsplit('/').next().unwrap_or(model_id).to_lowercase();

        if !self.include.is_empty()
            && !self
                .include
                .iter()
                .any(|inc| name.contains(&inc.to_lowercase()))
        {
            return false;
        }

        !self
            .exclude
            .iter()
            .any(|exc| name.contains(&exc.to_lowercase()))
    }
}

/// One model listed by a provider catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Creation time (seconds since epoch)
    #[serde(default)]
    pub created: i64,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, created: i64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            created,
        }
    }

    fn vendor(&self) -> Option<&str> {
        self.id.split_once('/').map(|(vendor, _)| vendor)
    }
}

/// Pick the newest `per_vendor` models of each frontier vendor that match the
/// tier's preferences. Vendors with no matching model are left out.
pub fn select_frontier(entries: &[CatalogEntry], tier: CostTier, per_vendor: usize) -> Vec<Model> {
    let preferences = tier.vendor_preferences();
    let mut selected = Vec::new();

    for vendor in FRONTIER_VENDORS {
        let Some(pref) = preferences.iter().find(|p| p.vendor == vendor) else {
            continue;
        };

        let mut candidates: Vec<&CatalogEntry> = entries
            .iter()
            .filter(|e| e.vendor() == Some(vendor) && pref.matches(&e.id))
            .collect();
        // Stable sort keeps catalog order among equal timestamps
        candidates.sort_by(|a, b| b.created.cmp(&a.created));

        selected.extend(
            candidates
                .into_iter()
                .take(per_vendor)
                .filter_map(|e| Model::new(e.id.as_str()).ok()),
        );
    }

    selected
}

/// Pick a synthesis-friendly chairman: the first Gemini Pro listing that is
/// neither a flash nor an image variant.
pub fn select_chairman(entries: &[CatalogEntry]) -> Option<Model> {
    entries
        .iter()
        .find(|e| e.id.contains("gemini-3-pro") && !e.id.contains("flash") && !e.id.contains("image"))
        .and_then(|e| Model::new(e.id.as_str()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogEntry> {
        vec![
            CatalogEntry::new("openai/gpt-5.2", 300),
            CatalogEntry::new("openai/gpt-5.2-pro", 310),
            CatalogEntry::new("openai/gpt-4o", 100),
            CatalogEntry::new("openai/gpt-4o-mini", 90),
            CatalogEntry::new("anthropic/claude-sonnet-4.5", 250),
            CatalogEntry::new("anthropic/claude-sonnet-4", 150),
            CatalogEntry::new("anthropic/claude-opus-4.5", 260),
            CatalogEntry::new("google/gemini-3-pro-preview", 280),
            CatalogEntry::new("google/gemini-3-pro-image-preview", 290),
            CatalogEntry::new("google/gemini-2.5-flash", 200),
            CatalogEntry::new("x-ai/grok-4", 220),
            CatalogEntry::new("x-ai/grok-4.1-fast", 240),
            CatalogEntry::new("meta-llama/llama-4", 500),
        ]
    }

    #[test]
    fn test_preference_matching() {
        let pref = VendorPreference::new("openai", &["gpt-5.2"], &["pro"]);
        assert!(pref.matches("openai/gpt-5.2"));
        assert!(!pref.matches("openai/gpt-5.2-pro"));
        assert!(!pref.matches("openai/gpt-4o"));

        let open = VendorPreference::new("anthropic", &[], &["haiku"]);
        assert!(open.matches("anthropic/claude-opus-4.5"));
        assert!(!open.matches("anthropic/claude-HAIKU-4.5"));
    }

    #[test]
    fn test_select_balanced_frontier() {
        let models = select_frontier(&catalog(), CostTier::Balanced, 1);
        let ids: Vec<_> = models.iter().map(|m| m.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "openai/gpt-5.2",
                "anthropic/claude-sonnet-4.5",
                "google/gemini-3-pro-preview",
                "x-ai/grok-4.1-fast",
            ]
        );
    }

    #[test]
    fn test_select_premium_frontier() {
        let models = select_frontier(&catalog(), CostTier::Premium, 1);
        let ids: Vec<_> = models.iter().map(|m| m.as_str()).collect();
        // premium excludes "fast" grok variants
        assert_eq!(
            ids,
            vec![
                "openai/gpt-5.2-pro",
                "anthropic/claude-opus-4.5",
                "google/gemini-3-pro-preview",
                "x-ai/grok-4",
            ]
        );
    }

    #[test]
    fn test_select_skips_vendors_without_match() {
        let entries = vec![CatalogEntry::new("anthropic/claude-sonnet-4.5", 1)];
        let models = select_frontier(&entries, CostTier::Balanced, 1);
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].vendor(), Some("anthropic"));
    }

    #[test]
    fn test_select_chairman() {
        let chairman = select_chairman(&catalog()).unwrap();
        assert_eq!(chairman.as_str(), "google/gemini-3-pro-preview");
        assert!(select_chairman(&[CatalogEntry::new("openai/gpt-5.2", 1)]).is_none());
    }

    #[test]
    fn test_catalog_entry_deserialize_with_defaults() {
        let entry: CatalogEntry = serde_json::from_str(r#"{"id": "x-ai/grok-4"}"#).unwrap();
        assert_eq!(entry.created, 0);
        assert!(entry.name.is_empty());
    }
}
