//! Synthesis stage
//!
//! The chairman receives the question, every successful answer with its
//! author, and the attributed consensus ranking. If the chairman cannot
//! answer, alternates are tried one at a time.

use super::collect_responses::{QueryRequest, ResponseCollector};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::ProgressNotifier;
use council_domain::{
    AttributedRank, CollectedAnswer, Council, Model, PromptTemplate, QueryAttempt, Question,
    Stage, SynthesisResult,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Everything the chairman is shown
#[derive(Debug, Clone)]
pub struct SynthesisInput<'a> {
    pub question: &'a Question,
    /// Successful answers in collection order
    pub answers: &'a [CollectedAnswer],
    /// `None` when peer review was skipped or produced no ballots
    pub ranking: Option<&'a [AttributedRank]>,
    pub unavailable: &'a [Model],
}

/// Stage-3 output
#[derive(Debug, Clone)]
pub struct SynthesisOutcome {
    /// Every chairman attempt, in the order tried
    pub attempts: Vec<QueryAttempt>,
    pub result: Option<SynthesisResult>,
}

/// The designated chairman followed by alternates, skipping anyone who
/// failed to answer in stage 1.
pub fn chairman_candidates(council: &Council, failed: &[Model]) -> Vec<Model> {
    std::iter::once(council.chairman())
        .chain(council.alternates())
        .filter(|m| !failed.contains(m))
        .cloned()
        .collect()
}

/// Use case for the synthesis stage
pub struct SynthesizeUseCase<G: LlmGateway + 'static> {
    collector: ResponseCollector<G>,
    timeout: Duration,
}

impl<G: LlmGateway + 'static> SynthesizeUseCase<G> {
    /// `timeout` bounds each chairman attempt separately.
    pub fn new(gateway: Arc<G>, max_retries: u32, timeout: Duration) -> Self {
        Self {
            collector: ResponseCollector::new(gateway, max_retries),
            timeout,
        }
    }

    pub async fn execute(
        &self,
        input: SynthesisInput<'_>,
        candidates: &[Model],
        designated: &Model,
        progress: &dyn ProgressNotifier,
    ) -> SynthesisOutcome {
        progress.on_stage_start(Stage::Synthesis, candidates.len().min(1));

        let prompt = PromptTemplate::synthesis_prompt(
            input.question,
            input.answers,
            input.ranking,
            input.unavailable,
        );

        let mut attempts = Vec::new();
        let mut result = None;

        for candidate in candidates {
            info!("Stage 3: requesting synthesis from {}", candidate);
            let request = QueryRequest::new(
                candidate.clone(),
                PromptTemplate::synthesis_system(),
                prompt.clone(),
            );
            let attempt = self
                .collector
                .query_one(Stage::Synthesis, request, Instant::now() + self.timeout)
                .await;
            progress.on_task_complete(Stage::Synthesis, candidate, attempt.is_success());

            if let Some(text) = attempt.text() {
                result = Some(SynthesisResult {
                    chairman: candidate.clone(),
                    text: text.to_string(),
                    fallback: candidate != designated,
                });
                attempts.push(attempt);
                break;
            }

            if let Some(failure) = attempt.failure_reason() {
                warn!("Chairman {} failed: {}", candidate, failure);
            }
            attempts.push(attempt);
        }

        progress.on_stage_complete(Stage::Synthesis);
        SynthesisOutcome { attempts, result }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{CostTier, LineupSource};

    fn model(id: &str) -> Model {
        Model::new(id).unwrap()
    }

    #[test]
    fn test_candidates_skip_failed_contributors() {
        let council = Council::new(
            Some(CostTier::Budget),
            LineupSource::Static,
            vec![model("v/a"), model("v/b"), model("v/c")],
            model("v/a"),
            vec![model("v/c"), model("v/b")],
        )
        .unwrap();

        assert_eq!(
            chairman_candidates(&council, &[model("v/a")]),
            vec![model("v/c"), model("v/b")]
        );
        assert_eq!(
            chairman_candidates(&council, &[model("v/c")]),
            vec![model("v/a"), model("v/b")]
        );
        assert!(chairman_candidates(&council, &[model("v/a"), model("v/b"), model("v/c")]).is_empty());
    }
}
