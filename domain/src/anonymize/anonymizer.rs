//! Random label assignment over successful answers

use super::label::Label;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// A successful stage-1 answer, in collection order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedAnswer {
    pub participant: Model,
    pub text: String,
}

impl CollectedAnswer {
    pub fn new(participant: Model, text: impl Into<String>) -> Self {
        Self {
            participant,
            text: text.into(),
        }
    }
}

/// An answer as peer reviewers see it: label and text, no owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnonymizedAnswer {
    pub label: Label,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct LabelEntry {
    label: Label,
    participant: Model,
    /// Position in stage-1 collection order (0 = earliest)
    collected: usize,
}

/// Private label↔participant mapping for one deliberation
///
/// Write-once: built by [`anonymize`] and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMap {
    entries: Vec<LabelEntry>,
}

impl LabelMap {
    /// Build a map directly from `(label, participant)` pairs given in
    /// collection order.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Label, Model)>) -> Self {
        let entries = pairs
            .into_iter()
            .enumerate()
            .map(|(collected, (label, participant))| LabelEntry {
                label,
                participant,
                collected,
            })
            .collect();
        Self { entries }
    }

    pub fn owner_of(&self, label: &Label) -> Option<&Model> {
        self.entries
            .iter()
            .find(|e| &e.label == label)
            .map(|e| &e.participant)
    }

    pub fn label_of(&self, participant: &Model) -> Option<&Label> {
        self.entries
            .iter()
            .find(|e| &e.participant == participant)
            .map(|e| &e.label)
    }

    /// Labels ordered by stage-1 collection (earliest-collected first)
    pub fn collection_order(&self) -> Vec<Label> {
        let mut entries: Vec<&LabelEntry> = self.entries.iter().collect();
        entries.sort_by_key(|e| e.collected);
        entries.into_iter().map(|e| e.label.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Output of the anonymizer: what reviewers may see plus the private map
#[derive(Debug, Clone)]
pub struct Anonymization {
    /// Sorted by label slot (A, B, C, …), not by collection order
    answers: Vec<AnonymizedAnswer>,
    label_map: LabelMap,
}

impl Anonymization {
    pub fn answers(&self) -> &[AnonymizedAnswer] {
        &self.answers
    }

    pub fn label_map(&self) -> &LabelMap {
        &self.label_map
    }

    /// Answers shown to `reviewer`: every answer except the reviewer's own
    pub fn shown_to(&self, reviewer: &Model) -> Vec<AnonymizedAnswer> {
        let own = self.label_map.label_of(reviewer);
        self.answers
            .iter()
            .filter(|a| Some(&a.label) != own)
            .cloned()
            .collect()
    }
}

/// Assign a fresh random permutation of labels to `answers`.
///
/// `answers` must be in collection order. Failed participants are not part
/// of the input and therefore never receive a label.
pub fn anonymize(answers: &[CollectedAnswer], rng: &mut fastrand::Rng) -> Anonymization {
    let mut slots: Vec<usize> = (0..answers.len()).collect();
    rng.shuffle(&mut slots);

    let mut labeled: Vec<(usize, AnonymizedAnswer)> = Vec::with_capacity(answers.len());
    let mut pairs = Vec::with_capacity(answers.len());

    for (answer, slot) in answers.iter().zip(slots) {
        let label = Label::from_index(slot);
        labeled.push((
            slot,
            AnonymizedAnswer {
                label: label.clone(),
                text: answer.text.clone(),
            },
        ));
        pairs.push((label, answer.participant.clone()));
    }

    labeled.sort_by_key(|(slot, _)| *slot);

    Anonymization {
        answers: labeled.into_iter().map(|(_, a)| a).collect(),
        label_map: LabelMap::from_pairs(pairs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn collected() -> Vec<CollectedAnswer> {
        vec![
            CollectedAnswer::new(Model::new("openai/gpt-5.2").unwrap(), "red"),
            CollectedAnswer::new(Model::new("anthropic/claude-sonnet-4.5").unwrap(), "blue"),
            CollectedAnswer::new(Model::new("google/gemini-3-pro-preview").unwrap(), "green"),
        ]
    }

    #[test]
    fn test_labels_form_a_bijection() {
        let answers = collected();
        let anon = anonymize(&answers, &mut fastrand::Rng::with_seed(7));

        assert_eq!(anon.answers().len(), answers.len());
        assert_eq!(anon.label_map().len(), answers.len());

        let labels: HashSet<_> = anon.answers().iter().map(|a| a.label.clone()).collect();
        assert_eq!(labels.len(), answers.len());

        for answer in &answers {
            let label = anon.label_map().label_of(&answer.participant).unwrap();
            assert_eq!(anon.label_map().owner_of(label), Some(&answer.participant));
            let shown = anon.answers().iter().find(|a| &a.label == label).unwrap();
            assert_eq!(shown.text, answer.text);
        }
    }

    #[test]
    fn test_answers_sorted_by_label_slot() {
        let anon = anonymize(&collected(), &mut fastrand::Rng::with_seed(3));
        let labels: Vec<_> = anon.answers().iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Response A", "Response B", "Response C"]);
    }

    #[test]
    fn test_repeated_runs_vary_the_assignment() {
        let answers = collected();
        let mut rng = fastrand::Rng::with_seed(42);
        let mut orderings = HashSet::new();

        for _ in 0..20 {
            let anon = anonymize(&answers, &mut rng);
            let ordering: Vec<String> = answers
                .iter()
                .map(|a| anon.label_map().label_of(&a.participant).unwrap().to_string())
                .collect();
            orderings.insert(ordering);
        }

        assert!(orderings.len() > 1);
    }

    #[test]
    fn test_shown_to_excludes_own_answer() {
        let answers = collected();
        let anon = anonymize(&answers, &mut fastrand::Rng::new());

        for answer in &answers {
            let own = anon.label_map().label_of(&answer.participant).unwrap();
            let shown = anon.shown_to(&answer.participant);
            assert_eq!(shown.len(), answers.len() - 1);
            assert!(shown.iter().all(|a| &a.label != own));
        }
    }

    #[test]
    fn test_collection_order_preserved_in_map() {
        let answers = collected();
        let anon = anonymize(&answers, &mut fastrand::Rng::with_seed(11));
        let order = anon.label_map().collection_order();
        let owners: Vec<_> = order
            .iter()
            .map(|l| anon.label_map().owner_of(l).unwrap().clone())
            .collect();
        let expected: Vec<_> = answers.iter().map(|a| a.participant.clone()).collect();
        assert_eq!(owners, expected);
    }

    #[test]
    fn test_empty_input() {
        let anon = anonymize(&[], &mut fastrand::Rng::new());
        assert!(anon.answers().is_empty());
        assert!(anon.label_map().is_empty());
    }
}
