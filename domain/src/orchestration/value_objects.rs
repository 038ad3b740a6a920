//! Orchestration value objects - immutable records of a deliberation.
//!
//! - [`QueryAttempt`] - one participant's query in one stage
//! - [`RankingSubmission`] - one reviewer's parsed ranking
//! - [`SynthesisResult`] - the chairman's final answer
//! - [`StageSummary`] / [`DeliberationStatus`] - per-stage and overall outcome
//! - [`DeliberationResult`] - the complete trace handed to the caller

use super::entities::Stage;
use crate::anonymize::Label;
use crate::core::model::Model;
use crate::core::question::Question;
use crate::council::{CostTier, LineupSource, Participant};
use crate::ranking::{AttributedRank, Ballot, ConsensusRanking, ParsedRanking};
use serde::{Deserialize, Serialize};

/// Why a participant produced no usable answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    Timeout,
    RateLimited,
    Malformed,
    Authentication,
    Transport,
    Server,
    ModelUnavailable,
    Other,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::RateLimited => "rate-limited",
            FailureKind::Malformed => "malformed",
            FailureKind::Authentication => "authentication",
            FailureKind::Transport => "transport",
            FailureKind::Server => "server",
            FailureKind::ModelUnavailable => "model-unavailable",
            FailureKind::Other => "other",
        }
    }
}

/// A recorded, non-fatal participant failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ParticipantFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::new(FailureKind::Timeout, "stage deadline exceeded")
    }
}

impl std::fmt::Display for ParticipantFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.as_str(), self.message)
    }
}

/// Outcome of one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QueryOutcome {
    Success { text: String },
    Failure { failure: ParticipantFailure },
}

/// One participant's query within one stage. Never mutated after completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAttempt {
    pub participant: Model,
    pub stage: Stage,
    #[serde(flatten)]
    pub outcome: QueryOutcome,
    pub latency_ms: u64,
    /// Total tries including retries
    pub tries: u32,
}

impl QueryAttempt {
    pub fn success(participant: Model, stage: Stage, text: impl Into<String>, latency_ms: u64, tries: u32) -> Self {
        Self {
            participant,
            stage,
            outcome: QueryOutcome::Success { text: text.into() },
            latency_ms,
            tries,
        }
    }

    pub fn failure(participant: Model, stage: Stage, failure: ParticipantFailure, latency_ms: u64, tries: u32) -> Self {
        Self {
            participant,
            stage,
            outcome: QueryOutcome::Failure { failure },
            latency_ms,
            tries,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, QueryOutcome::Success { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match &self.outcome {
            QueryOutcome::Success { text } => Some(text),
            QueryOutcome::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&ParticipantFailure> {
        match &self.outcome {
            QueryOutcome::Success { .. } => None,
            QueryOutcome::Failure { failure } => Some(failure),
        }
    }
}

/// One reviewer's stage-2 submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingSubmission {
    pub reviewer: Model,
    /// Labels the reviewer was shown (never its own)
    pub shown: Vec<Label>,
    pub attempt: QueryAttempt,
    pub parsed: ParsedRanking,
}

impl RankingSubmission {
    /// Build from a finished stage-2 attempt; failed attempts parse as
    /// [`ParsedRanking::Unparsed`].
    pub fn from_attempt(shown: Vec<Label>, attempt: QueryAttempt) -> Self {
        let parsed = attempt
            .text()
            .map(crate::ranking::parse_ranking)
            .unwrap_or(ParsedRanking::Unparsed);
        Self {
            reviewer: attempt.participant.clone(),
            shown,
            attempt,
            parsed,
        }
    }

    /// The usable part of this submission, if any
    pub fn ballot(&self) -> Option<Ballot> {
        Ballot::from_parsed(self.reviewer.clone(), self.shown.clone(), &self.parsed)
    }
}

/// The chairman's answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisResult {
    /// Who actually produced the synthesis
    pub chairman: Model,
    pub text: String,
    /// True when an alternate stood in for the designated chairman
    pub fallback: bool,
}

/// How a stage went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Succeeded,
    /// Produced output, but some participants failed
    Degraded,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSummary {
    pub stage: Stage,
    pub status: StageStatus,
    pub attempted: usize,
    pub succeeded: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Overall outcome of a deliberation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliberationStatus {
    Complete,
    PartialNoSynthesis,
    Failed,
}

impl DeliberationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliberationStatus::Complete => "complete",
            DeliberationStatus::PartialNoSynthesis => "partial-no-synthesis",
            DeliberationStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for DeliberationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wall-clock facts supplied by the caller of the assembler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// RFC 3339 start timestamp
    pub started_at: String,
    pub collect_ms: u64,
    pub review_ms: u64,
    pub synthesis_ms: u64,
    pub total_ms: u64,
}

/// A successful answer with its owner revealed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributedAnswer {
    pub label: Label,
    pub participant: Model,
    pub text: String,
}

/// Complete record of one deliberation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationResult {
    pub question: Question,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<CostTier>,
    pub lineup: LineupSource,
    pub participants: Vec<Participant>,
    pub chairman: Model,
    /// Stage-1 attempts in registry order
    pub responses: Vec<QueryAttempt>,
    /// Successful answers by label
    pub answers: Vec<AttributedAnswer>,
    pub reviews: Vec<RankingSubmission>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consensus: Option<ConsensusRanking>,
    pub ranking: Vec<AttributedRank>,
    pub synthesis_attempts: Vec<QueryAttempt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesis: Option<SynthesisResult>,
    pub stages: Vec<StageSummary>,
    pub timing: Timing,
    pub status: DeliberationStatus,
}

impl DeliberationResult {
    pub fn successful_responses(&self) -> impl Iterator<Item = &QueryAttempt> {
        self.responses.iter().filter(|a| a.is_success())
    }

    pub fn failed_responses(&self) -> impl Iterator<Item = &QueryAttempt> {
        self.responses.iter().filter(|a| !a.is_success())
    }

    pub fn stage(&self, stage: Stage) -> Option<&StageSummary> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    pub fn final_answer(&self) -> Option<&str> {
        self.synthesis.as_ref().map(|s| s.text.as_str())
    }

    pub fn is_complete(&self) -> bool {
        self.status == DeliberationStatus::Complete
    }
}
