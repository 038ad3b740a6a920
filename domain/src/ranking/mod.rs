//! Peer ranking: parsing reviewer output and combining it into a consensus
//!
//! - [`parsing`] - tolerant extraction of an ordering from free text
//! - [`aggregation`] - ballots and the [`RankingAggregator`] scoring rules
//! - [`consensus`] - the combined ordering and its attribution

pub mod aggregation;
pub mod consensus;
pub mod parsing;

pub use aggregation::{AggregationMethod, Ballot, BordaCount, MeanRank, RankingAggregator};
pub use consensus::{AttributedRank, ConsensusEntry, ConsensusRanking, ConsensusStatus};
pub use parsing::{LabelScore, ParsedRanking, parse_ranking};
