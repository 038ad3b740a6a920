//! Consensus ordering over all ballots

use super::aggregation::{AggregationMethod, Ballot};
use crate::anonymize::{Label, LabelMap};
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Whether the ordering reflects any peer signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsensusStatus {
    Ranked,
    /// No valid ballots; entries are in collection order
    Unranked,
}

/// One label's place in the consensus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusEntry {
    /// 1-based
    pub position: usize,
    pub label: Label,
    /// Mean points, `None` when no ballot was shown this label
    pub score: Option<f64>,
    /// Number of valid ballots that were shown this label
    pub ballots: usize,
}

/// Ordering of all labels, best first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusRanking {
    pub method: AggregationMethod,
    pub status: ConsensusStatus,
    pub valid_ballots: usize,
    pub entries: Vec<ConsensusEntry>,
}

/// A consensus entry with its owner revealed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributedRank {
    pub position: usize,
    pub label: Label,
    pub participant: Model,
    pub score: Option<f64>,
}

impl ConsensusRanking {
    /// Combine ballots into one ordering over `collection_order`.
    ///
    /// Labels are ordered by mean points (direction set by the method). Ties
    /// and labels no ballot evaluated fall back to collection order, earliest
    /// first; unevaluated labels always come after evaluated ones. The result
    /// depends only on ballot positions, never on label text.
    pub fn aggregate(method: AggregationMethod, collection_order: &[Label], ballots: &[Ballot]) -> Self {
        if ballots.is_empty() {
            return Self::unranked(method, collection_order);
        }

        let aggregator = method.aggregator();
        let mut totals: Vec<(f64, usize)> = vec![(0.0, 0); collection_order.len()];
        for ballot in ballots {
            for (label, points) in aggregator.ballot_points(ballot) {
                if let Some(idx) = collection_order.iter().position(|l| *l == label) {
                    totals[idx].0 += points;
                    totals[idx].1 += 1;
                }
            }
        }

        let mut scored: Vec<(usize, Option<f64>, usize)> = totals
            .iter()
            .enumerate()
            .map(|(idx, &(sum, n))| (idx, (n > 0).then(|| sum / n as f64), n))
            .collect();

        let higher_is_better = aggregator.higher_is_better();
        scored.sort_by(|a, b| match (a.1, b.1) {
            (Some(x), Some(y)) => {
                let by_score = if higher_is_better { y.total_cmp(&x) } else { x.total_cmp(&y) };
                by_score.then(a.0.cmp(&b.0))
            }
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        let entries = scored
            .into_iter()
            .enumerate()
            .map(|(rank, (idx, score, n))| ConsensusEntry {
                position: rank + 1,
                label: collection_order[idx].clone(),
                score,
                ballots: n,
            })
            .collect();

        Self {
            method,
            status: ConsensusStatus::Ranked,
            valid_ballots: ballots.len(),
            entries,
        }
    }

    /// Collection order, flagged as carrying no peer signal
    pub fn unranked(method: AggregationMethod, collection_order: &[Label]) -> Self {
        let entries = collection_order
            .iter()
            .enumerate()
            .map(|(idx, label)| ConsensusEntry {
                position: idx + 1,
                label: label.clone(),
                score: None,
                ballots: 0,
            })
            .collect();
        Self {
            method,
            status: ConsensusStatus::Unranked,
            valid_ballots: 0,
            entries,
        }
    }

    pub fn is_ranked(&self) -> bool {
        self.status == ConsensusStatus::Ranked
    }

    /// Reveal owners through the deliberation's label map.
    /// Labels missing from the map are skipped.
    pub fn attribute(&self, label_map: &LabelMap) -> Vec<AttributedRank> {
        self.entries
            .iter()
            .filter_map(|entry| {
                label_map.owner_of(&entry.label).map(|participant| AttributedRank {
                    position: entry.position,
                    label: entry.label.clone(),
                    participant: participant.clone(),
                    score: entry.score,
                })
            })
            .collect()
    }
}
