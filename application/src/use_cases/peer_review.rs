//! Peer review stage
//!
//! Every contributor with a successful answer ranks the anonymized answers
//! of the others. Rankings are parsed leniently and combined into a
//! [`ConsensusRanking`]; reviewers that fail or answer without a usable
//! ranking simply contribute no ballot.

use super::collect_responses::{QueryRequest, ResponseCollector, StageAttempts};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::ProgressNotifier;
use council_domain::{
    AggregationMethod, Anonymization, ConsensusRanking, Label, PromptTemplate, Question,
    RankingSubmission, Stage,
};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info, warn};

/// Stage-2 output
#[derive(Debug, Clone)]
pub struct PeerReviewOutcome {
    /// One submission per reviewer, in reviewer order
    pub submissions: Vec<RankingSubmission>,
    pub consensus: ConsensusRanking,
}

/// Use case for the peer review stage
pub struct PeerReviewUseCase<G: LlmGateway + 'static> {
    collector: ResponseCollector<G>,
    aggregation: AggregationMethod,
}

impl<G: LlmGateway + 'static> PeerReviewUseCase<G> {
    pub fn new(gateway: Arc<G>, max_retries: u32, aggregation: AggregationMethod) -> Self {
        Self {
            collector: ResponseCollector::new(gateway, max_retries),
            aggregation,
        }
    }

    pub async fn execute(
        &self,
        question: &Question,
        anonymization: &Anonymization,
        deadline: Instant,
        progress: &dyn ProgressNotifier,
    ) -> PeerReviewOutcome {
        let label_map = anonymization.label_map();
        let mut shown_labels: Vec<Vec<Label>> = Vec::new();
        let mut requests = Vec::new();

        for label in label_map.collection_order() {
            let Some(reviewer) = label_map.owner_of(&label) else {
                continue;
            };
            let shown = anonymization.shown_to(reviewer);
            requests.push(QueryRequest::new(
                reviewer.clone(),
                PromptTemplate::review_system(),
                PromptTemplate::review_prompt(question, &shown),
            ));
            shown_labels.push(shown.into_iter().map(|a| a.label).collect());
        }

        let attempts = self.collector.collect(Stage::Review, requests, deadline, progress).await;
        let outcome = Self::aggregate(self.aggregation, anonymization, shown_labels, attempts);

        if outcome.consensus.is_ranked() {
            info!(
                "Peer review: {} valid ballot(s) of {}",
                outcome.consensus.valid_ballots,
                outcome.submissions.len()
            );
        } else {
            warn!("Peer review produced no usable rankings; continuing unranked");
        }
        outcome
    }

    fn aggregate(
        method: AggregationMethod,
        anonymization: &Anonymization,
        shown_labels: Vec<Vec<Label>>,
        attempts: StageAttempts,
    ) -> PeerReviewOutcome {
        let submissions: Vec<RankingSubmission> = shown_labels
            .into_iter()
            .zip(attempts.into_attempts())
            .map(|(shown, attempt)| RankingSubmission::from_attempt(shown, attempt))
            .collect();

        for submission in &submissions {
            if submission.attempt.is_success() && !submission.parsed.is_parsed() {
                warn!("No ranking found in review by {}", submission.reviewer);
            }
        }

        let ballots: Vec<_> = submissions.iter().filter_map(|s| s.ballot()).collect();
        let consensus = ConsensusRanking::aggregate(
            method,
            &anonymization.label_map().collection_order(),
            &ballots,
        );

        PeerReviewOutcome {
            submissions,
            consensus,
        }
    }
}
