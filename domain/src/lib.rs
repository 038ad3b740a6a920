//! Domain layer for llm-council
//!
//! This crate contains the core deliberation logic, entities, and value
//! objects. It performs no I/O and has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! ## Council
//!
//! A [`Council`] is an ordered set of contributor models plus exactly one
//! chairman, resolved from a [`CostTier`] lineup or an explicit list.
//!
//! ## Deliberation
//!
//! 1. **Collect** - every contributor answers the [`Question`] independently
//! 2. **Review** - answers are [`anonymize`]d, each contributor ranks the
//!    others' answers, and the ballots are combined into a
//!    [`ConsensusRanking`]
//! 3. **Synthesis** - the chairman writes the final answer from the
//!    attributed answers and ranking
//!
//! [`ResultAssembler`] packages all of it into a [`DeliberationResult`].

pub mod anonymize;
pub mod config;
pub mod core;
pub mod council;
pub mod orchestration;
pub mod prompt;
pub mod ranking;

// Re-export commonly used types
pub use anonymize::{AnonymizedAnswer, Anonymization, CollectedAnswer, Label, LabelMap, anonymize};
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{error::DomainError, model::Model, question::Question};
pub use council::{
    CatalogEntry, Council, CostTier, LineupSource, Participant, Role, TierLineup, VendorPreference,
    select_chairman, select_frontier,
};
pub use orchestration::{
    assembler::{DeliberationRecord, ResultAssembler},
    entities::Stage,
    value_objects::{
        AttributedAnswer, DeliberationResult, DeliberationStatus, FailureKind, ParticipantFailure,
        QueryAttempt, QueryOutcome, RankingSubmission, StageStatus, StageSummary, SynthesisResult,
        Timing,
    },
};
pub use prompt::PromptTemplate;
pub use ranking::{
    AggregationMethod, AttributedRank, Ballot, ConsensusEntry, ConsensusRanking, ConsensusStatus,
    ParsedRanking, RankingAggregator, parse_ranking,
};
