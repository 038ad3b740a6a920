//! Packaging a finished deliberation into its immutable result
//!
//! [`ResultAssembler::assemble`] performs no I/O and reads no clock: timing
//! is part of its input, so assembling the same record twice yields
//! byte-identical serialized output.

use super::entities::Stage;
use super::value_objects::{
    AttributedAnswer, DeliberationResult, DeliberationStatus, QueryAttempt, RankingSubmission,
    StageStatus, StageSummary, SynthesisResult, Timing,
};
use crate::anonymize::Anonymization;
use crate::core::question::Question;
use crate::council::Council;
use crate::ranking::ConsensusRanking;

/// Everything the pipeline produced, before packaging
#[derive(Debug, Clone)]
pub struct DeliberationRecord {
    pub question: Question,
    pub council: Council,
    /// Stage-1 attempts in registry order
    pub responses: Vec<QueryAttempt>,
    /// Present once at least one answer succeeded
    pub anonymization: Option<Anonymization>,
    pub reviews: Vec<RankingSubmission>,
    pub consensus: Option<ConsensusRanking>,
    pub synthesis_attempts: Vec<QueryAttempt>,
    pub synthesis: Option<SynthesisResult>,
    pub timing: Timing,
}

impl DeliberationRecord {
    /// A record with only the question and council filled in
    pub fn new(question: Question, council: Council) -> Self {
        Self {
            question,
            council,
            responses: Vec::new(),
            anonymization: None,
            reviews: Vec::new(),
            consensus: None,
            synthesis_attempts: Vec::new(),
            synthesis: None,
            timing: Timing::default(),
        }
    }
}

pub struct ResultAssembler;

impl ResultAssembler {
    pub fn assemble(record: &DeliberationRecord) -> DeliberationResult {
        let answers = record
            .anonymization
            .as_ref()
            .map(|anon| {
                anon.answers()
                    .iter()
                    .filter_map(|answer| {
                        anon.label_map().owner_of(&answer.label).map(|owner| AttributedAnswer {
                            label: answer.label.clone(),
                            participant: owner.clone(),
                            text: answer.text.clone(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let ranking = match (&record.consensus, &record.anonymization) {
            (Some(consensus), Some(anon)) => consensus.attribute(anon.label_map()),
            _ => Vec::new(),
        };

        let collect = Self::collect_summary(&record.responses);
        let review = Self::review_summary(collect.succeeded, &record.reviews);
        let synthesis = Self::synthesis_summary(collect.succeeded, record);

        let status = if collect.succeeded == 0 {
            DeliberationStatus::Failed
        } else if record.synthesis.is_none() {
            DeliberationStatus::PartialNoSynthesis
        } else {
            DeliberationStatus::Complete
        };

        DeliberationResult {
            question: record.question.clone(),
            tier: record.council.tier(),
            lineup: record.council.source(),
            participants: record.council.participants(),
            chairman: record.council.chairman().clone(),
            responses: record.responses.clone(),
            answers,
            reviews: record.reviews.clone(),
            consensus: record.consensus.clone(),
            ranking,
            synthesis_attempts: record.synthesis_attempts.clone(),
            synthesis: record.synthesis.clone(),
            stages: vec![collect, review, synthesis],
            timing: record.timing.clone(),
            status,
        }
    }

    fn collect_summary(responses: &[QueryAttempt]) -> StageSummary {
        let attempted = responses.len();
        let succeeded = responses.iter().filter(|a| a.is_success()).count();
        let (status, note) = if succeeded == 0 {
            (StageStatus::Failed, Some("all participants failed".to_string()))
        } else if succeeded == attempted {
            (StageStatus::Succeeded, None)
        } else {
            (
                StageStatus::Degraded,
                Some(format!("{} participant(s) unavailable", attempted - succeeded)),
            )
        };
        StageSummary {
            stage: Stage::Collect,
            status,
            attempted,
            succeeded,
            note,
        }
    }

    fn review_summary(answers: usize, reviews: &[RankingSubmission]) -> StageSummary {
        if answers < 2 {
            return StageSummary {
                stage: Stage::Review,
                status: StageStatus::Skipped,
                attempted: 0,
                succeeded: 0,
                note: Some("fewer than two answers to compare".to_string()),
            };
        }

        let attempted = reviews.len();
        let succeeded = reviews.iter().filter(|r| r.ballot().is_some()).count();
        let (status, note) = if succeeded == 0 {
            (
                StageStatus::Failed,
                Some("no usable rankings; synthesis proceeded unranked".to_string()),
            )
        } else if succeeded == attempted {
            (StageStatus::Succeeded, None)
        } else {
            (
                StageStatus::Degraded,
                Some(format!("{} ranking(s) missing or unparsable", attempted - succeeded)),
            )
        };
        StageSummary {
            stage: Stage::Review,
            status,
            attempted,
            succeeded,
            note,
        }
    }

    fn synthesis_summary(answers: usize, record: &DeliberationRecord) -> StageSummary {
        let attempted = record.synthesis_attempts.len();
        let (status, succeeded, note) = match &record.synthesis {
            _ if answers == 0 => (StageStatus::Skipped, 0, Some("no answers to synthesize".to_string())),
            Some(synthesis) if synthesis.fallback => (
                StageStatus::Degraded,
                1,
                Some(format!("synthesized by alternate {}", synthesis.chairman)),
            ),
            Some(_) if attempted > 1 => (StageStatus::Degraded, 1, None),
            Some(_) => (StageStatus::Succeeded, 1, None),
            None => (StageStatus::Failed, 0, Some("no chairman reachable".to_string())),
        };
        StageSummary {
            stage: Stage::Synthesis,
            status,
            attempted,
            succeeded,
            note,
        }
    }
}
