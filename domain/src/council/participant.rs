//! Participants and the resolved council

use super::tier::CostTier;
use crate::core::error::DomainError;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Role a participant plays in a deliberation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Answers the question and reviews peers
    Contributor,
    /// Synthesizes the final answer
    Chairman,
}

/// Where the council lineup came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineupSource {
    /// Explicit participant list from the caller or config
    Explicit,
    /// Discovered from the provider's model catalog
    Discovered,
    /// Built-in table for the tier
    Static,
}

/// A model seated on the council for one deliberation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub model: Model,
    pub roles: Vec<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<CostTier>,
}

impl Participant {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_contributor(&self) -> bool {
        self.has_role(Role::Contributor)
    }

    pub fn is_chairman(&self) -> bool {
        self.has_role(Role::Chairman)
    }
}

/// The resolved council for one deliberation (Entity)
///
/// Contributors are ordered and de-duplicated; exactly one chairman is
/// designated, who may also be a contributor. Alternates are tried in order
/// when the chairman cannot synthesize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Council {
    tier: Option<CostTier>,
    source: LineupSource,
    contributors: Vec<Model>,
    chairman: Model,
    alternates: Vec<Model>,
}

impl Council {
    pub fn new(
        tier: Option<CostTier>,
        source: LineupSource,
        contributors: Vec<Model>,
        chairman: Model,
        alternates: Vec<Model>,
    ) -> Result<Self, DomainError> {
        let contributors = dedup(contributors);
        if contributors.is_empty() {
            return Err(DomainError::NoParticipants);
        }

        let alternates = dedup(alternates)
            .into_iter()
            .filter(|m| *m != chairman)
            .collect();

        Ok(Self {
            tier,
            source,
            contributors,
            chairman,
            alternates,
        })
    }

    pub fn tier(&self) -> Option<CostTier> {
        self.tier
    }

    pub fn source(&self) -> LineupSource {
        self.source
    }

    /// Contributors in registry order
    pub fn contributors(&self) -> &[Model] {
        &self.contributors
    }

    pub fn chairman(&self) -> &Model {
        &self.chairman
    }

    /// Alternate chairmen in fallback order (never includes the chairman)
    pub fn alternates(&self) -> &[Model] {
        &self.alternates
    }

    pub fn chairman_contributes(&self) -> bool {
        self.contributors.contains(&self.chairman)
    }

    /// Every participant with its roles; contributors first, then a
    /// non-contributing chairman.
    pub fn participants(&self) -> Vec<Participant> {
        let mut participants: Vec<Participant> = self
            .contributors
            .iter()
            .map(|model| {
                let mut roles = vec![Role::Contributor];
                if *model == self.chairman {
                    roles.push(Role::Chairman);
                }
                Participant {
                    model: model.clone(),
                    roles,
                    tier: self.tier,
                }
            })
            .collect();

        if !self.chairman_contributes() {
            participants.push(Participant {
                model: self.chairman.clone(),
                roles: vec![Role::Chairman],
                tier: self.tier,
            });
        }

        participants
    }
}

fn dedup(models: Vec<Model>) -> Vec<Model> {
    let mut seen = Vec::with_capacity(models.len());
    for model in models {
        if !seen.contains(&model) {
            seen.push(model);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(id: &str) -> Model {
        Model::new(id).unwrap()
    }

    #[test]
    fn test_empty_council_rejected() {
        let result = Council::new(None, LineupSource::Explicit, vec![], m("a/chair"), vec![]);
        assert_eq!(result, Err(DomainError::NoParticipants));
    }

    #[test]
    fn test_contributors_deduplicated_in_order() {
        let council = Council::new(
            Some(CostTier::Budget),
            LineupSource::Static,
            vec![m("a/one"), m("b/two"), m("a/one"), m("c/three")],
            m("b/two"),
            vec![],
        )
        .unwrap();

        let ids: Vec<_> = council.contributors().iter().map(|m| m.as_str()).collect();
        assert_eq!(ids, vec!["a/one", "b/two", "c/three"]);
    }

    #[test]
    fn test_contributing_chairman_has_both_roles() {
        let council = Council::new(
            None,
            LineupSource::Explicit,
            vec![m("a/one"), m("b/two")],
            m("b/two"),
            vec![],
        )
        .unwrap();

        let participants = council.participants();
        assert_eq!(participants.len(), 2);
        assert!(participants[1].is_contributor());
        assert!(participants[1].is_chairman());
        assert!(!participants[0].is_chairman());
    }

    #[test]
    fn test_external_chairman_appended() {
        let council = Council::new(
            Some(CostTier::Premium),
            LineupSource::Static,
            vec![m("a/one")],
            m("z/chair"),
            vec![],
        )
        .unwrap();

        let participants = council.participants();
        assert_eq!(participants.len(), 2);
        assert_eq!(participants[1].model, m("z/chair"));
        assert_eq!(participants[1].roles, vec![Role::Chairman]);
        assert_eq!(participants[1].tier, Some(CostTier::Premium));
    }

    #[test]
    fn test_alternates_exclude_chairman() {
        let council = Council::new(
            None,
            LineupSource::Explicit,
            vec![m("a/one"), m("b/two")],
            m("a/one"),
            vec![m("a/one"), m("b/two"), m("b/two")],
        )
        .unwrap();

        assert_eq!(council.alternates(), &[m("b/two")]);
    }
}
