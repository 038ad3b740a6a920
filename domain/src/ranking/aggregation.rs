//! Ballot sanitation and pluggable scoring rules
//!
//! A [`Ballot`] is one reviewer's ordering restricted to the labels that
//! reviewer was actually shown. A [`RankingAggregator`] turns a ballot into
//! per-label points; [`ConsensusRanking::aggregate`](super::ConsensusRanking::aggregate)
//! averages those points across ballots.

use super::parsing::ParsedRanking;
use crate::anonymize::Label;
use crate::core::error::DomainError;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Which scoring rule produces the consensus ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationMethod {
    /// Normalized Borda count, higher is better
    #[default]
    Borda,
    /// Average 1-based position, lower is better
    MeanRank,
}

impl AggregationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggregationMethod::Borda => "borda",
            AggregationMethod::MeanRank => "mean-rank",
        }
    }

    pub fn aggregator(&self) -> Box<dyn RankingAggregator> {
        match self {
            AggregationMethod::Borda => Box::new(BordaCount),
            AggregationMethod::MeanRank => Box::new(MeanRank),
        }
    }
}

impl std::fmt::Display for AggregationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AggregationMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "borda" | "borda-count" => Ok(AggregationMethod::Borda),
            "mean-rank" | "mean_rank" | "meanrank" | "average-rank" => Ok(AggregationMethod::MeanRank),
            _ => Err(DomainError::UnknownAggregation(s.to_string())),
        }
    }
}

/// One reviewer's usable ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub reviewer: Model,
    /// Labels this reviewer was shown
    pub shown: Vec<Label>,
    /// Groups of equally preferred shown labels, best group first; may omit some
    pub tiers: Vec<Vec<Label>>,
    /// Labels in the raw ranking that were dropped (own, unknown, repeats)
    pub discarded: Vec<Label>,
}

impl Ballot {
    /// Restrict a parsed ranking to the labels the reviewer was shown.
    ///
    /// Returns `None` when nothing usable remains, so the submission
    /// contributes no signal.
    pub fn from_parsed(reviewer: Model, shown: Vec<Label>, parsed: &ParsedRanking) -> Option<Self> {
        let mut tiers: Vec<Vec<Label>> = Vec::new();
        let mut seen: Vec<Label> = Vec::new();
        let mut discarded = Vec::new();
        for group in parsed.tiers() {
            let mut tier = Vec::new();
            for label in group {
                if shown.contains(&label) && !seen.contains(&label) {
                    seen.push(label.clone());
                    tier.push(label);
                } else {
                    discarded.push(label);
                }
            }
            if !tier.is_empty() {
                tiers.push(tier);
            }
        }
        if tiers.is_empty() {
            return None;
        }
        Some(Self {
            reviewer,
            shown,
            tiers,
            discarded,
        })
    }

    /// 0-based position of a ranked label; tied labels share the mean of
    /// the positions their group spans.
    fn position_of(&self, label: &Label) -> Option<f64> {
        let mut start = 0usize;
        for tier in &self.tiers {
            if tier.contains(label) {
                return Some(start as f64 + (tier.len() - 1) as f64 / 2.0);
            }
            start += tier.len();
        }
        None
    }
}

/// Scoring rule applied to each ballot
pub trait RankingAggregator: Send + Sync {
    fn method(&self) -> AggregationMethod;

    /// Whether larger aggregate values rank first
    fn higher_is_better(&self) -> bool;

    /// Points for every label the ballot's reviewer was shown
    fn ballot_points(&self, ballot: &Ballot) -> Vec<(Label, f64)>;
}

/// Normalized Borda count
///
/// Among `m` shown labels, position `p` (0-based) earns `(m-1-p)/(m-1)`;
/// a single shown label earns 1. Shown labels the reviewer left out earn 0.
/// Tied labels use their averaged position, so they earn equal points.
#[derive(Debug, Clone, Copy, Default)]
pub struct BordaCount;

impl RankingAggregator for BordaCount {
    fn method(&self) -> AggregationMethod {
        AggregationMethod::Borda
    }

    fn higher_is_better(&self) -> bool {
        true
    }

    fn ballot_points(&self, ballot: &Ballot) -> Vec<(Label, f64)> {
        let m = ballot.shown.len();
        ballot
            .shown
            .iter()
            .map(|label| {
                let points = match ballot.position_of(label) {
                    Some(_) if m == 1 => 1.0,
                    Some(p) => ((m - 1) as f64 - p) / (m - 1) as f64,
                    None => 0.0,
                };
                (label.clone(), points)
            })
            .collect()
    }
}

/// Mean 1-based rank position
///
/// Shown labels the reviewer left out take the worst position `m`; tied
/// labels take the mean of the positions they span.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanRank;

impl RankingAggregator for MeanRank {
    fn method(&self) -> AggregationMethod {
        AggregationMethod::MeanRank
    }

    fn higher_is_better(&self) -> bool {
        false
    }

    fn ballot_points(&self, ballot: &Ballot) -> Vec<(Label, f64)> {
        let m = ballot.shown.len();
        ballot
            .shown
            .iter()
            .map(|label| {
                let position = ballot.position_of(label).map_or(m as f64, |p| p + 1.0);
                (label.clone(), position)
            })
            .collect()
    }
}
