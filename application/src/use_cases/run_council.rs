//! Run Council use case
//!
//! Orchestrates the full deliberation: independent answers, anonymized peer
//! review, and chairman synthesis.

use super::collect_responses::{QueryRequest, ResponseCollector};
use super::peer_review::PeerReviewUseCase;
use super::synthesize::{SynthesisInput, SynthesizeUseCase, chairman_candidates};
use crate::config::DeliberationParams;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use council_domain::{
    Council, DeliberationRecord, DeliberationResult, PromptTemplate, Question, ResultAssembler,
    Stage, Timing, anonymize,
};
use std::sync::Arc;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Errors that end a deliberation early. Both carry everything gathered so
/// far as a partial result.
#[derive(Error, Debug)]
pub enum RunCouncilError {
    #[error("All participants failed to respond")]
    AllParticipantsFailed { partial: Box<DeliberationResult> },

    #[error("Synthesis unavailable: no chairman could produce an answer")]
    SynthesisUnavailable { partial: Box<DeliberationResult> },
}

impl RunCouncilError {
    pub fn partial(&self) -> &DeliberationResult {
        match self {
            RunCouncilError::AllParticipantsFailed { partial }
            | RunCouncilError::SynthesisUnavailable { partial } => partial,
        }
    }

    pub fn into_partial(self) -> DeliberationResult {
        match self {
            RunCouncilError::AllParticipantsFailed { partial }
            | RunCouncilError::SynthesisUnavailable { partial } => *partial,
        }
    }
}

/// Input for the RunCouncil use case
#[derive(Debug, Clone)]
pub struct RunCouncilInput {
    /// The question to ask
    pub question: Question,
    /// Resolved participants and chairman
    pub council: Council,
}

impl RunCouncilInput {
    pub fn new(question: Question, council: Council) -> Self {
        Self { question, council }
    }
}

/// Use case for running a council deliberation
pub struct RunCouncilUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    params: DeliberationParams,
    seed: Option<u64>,
}

impl<G: LlmGateway + 'static> RunCouncilUseCase<G> {
    pub fn new(gateway: Arc<G>, params: DeliberationParams) -> Self {
        Self {
            gateway,
            params,
            seed: None,
        }
    }

    /// Fix the label permutation seed (reproducible runs)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunCouncilInput) -> Result<DeliberationResult, RunCouncilError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunCouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<DeliberationResult, RunCouncilError> {
        let RunCouncilInput { question, council } = input;
        let started = Instant::now();
        let mut timing = Timing {
            started_at: chrono::Utc::now().to_rfc3339(),
            ..Default::default()
        };
        let mut record = DeliberationRecord::new(question.clone(), council.clone());

        info!(
            "Starting council with {} contributor(s), chairman {}",
            council.contributors().len(),
            council.chairman()
        );

        // Stage 1: independent answers
        let stage_start = Instant::now();
        let requests = council
            .contributors()
            .iter()
            .map(|model| {
                QueryRequest::new(
                    model.clone(),
                    PromptTemplate::initial_system(),
                    PromptTemplate::initial_query(&question),
                )
            })
            .collect();
        let collector = ResponseCollector::new(Arc::clone(&self.gateway), self.params.max_retries);
        let stage1 = collector
            .collect(Stage::Collect, requests, stage_start + self.params.stage_timeout, progress)
            .await;
        timing.collect_ms = elapsed_ms(stage_start);

        let answers = stage1.answers();
        let failed = stage1.failed_participants();
        record.responses = stage1.into_attempts();
        info!("Stage 1: {} answer(s), {} failure(s)", answers.len(), failed.len());

        if answers.is_empty() {
            warn!("All participants failed in stage 1");
            progress.on_stage_skipped(Stage::Review, "no answers");
            progress.on_stage_skipped(Stage::Synthesis, "no answers");
            timing.total_ms = elapsed_ms(started);
            record.timing = timing;
            return Err(RunCouncilError::AllParticipantsFailed {
                partial: Box::new(ResultAssembler::assemble(&record)),
            });
        }

        let mut rng = match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let anonymization = anonymize(&answers, &mut rng);

        // Stage 2: anonymized peer review
        if answers.len() >= 2 {
            let stage_start = Instant::now();
            let reviewer = PeerReviewUseCase::new(
                Arc::clone(&self.gateway),
                self.params.max_retries,
                self.params.aggregation,
            );
            let outcome = reviewer
                .execute(&question, &anonymization, stage_start + self.params.stage_timeout, progress)
                .await;
            timing.review_ms = elapsed_ms(stage_start);
            record.reviews = outcome.submissions;
            record.consensus = Some(outcome.consensus);
        } else {
            debug!("Skipping peer review: only one answer");
            progress.on_stage_skipped(Stage::Review, "only one answer");
        }

        // Stage 3: synthesis
        let stage_start = Instant::now();
        let ranking = record
            .consensus
            .as_ref()
            .filter(|c| c.is_ranked())
            .map(|c| c.attribute(anonymization.label_map()));
        let candidates = chairman_candidates(&council, &failed);
        debug!("Chairman candidates: {:?}", candidates);

        let synthesizer = SynthesizeUseCase::new(
            Arc::clone(&self.gateway),
            self.params.max_retries,
            self.params.stage_timeout,
        );
        let outcome = synthesizer
            .execute(
                SynthesisInput {
                    question: &question,
                    answers: &answers,
                    ranking: ranking.as_deref(),
                    unavailable: &failed,
                },
                &candidates,
                council.chairman(),
                progress,
            )
            .await;
        timing.synthesis_ms = elapsed_ms(stage_start);
        timing.total_ms = elapsed_ms(started);

        record.anonymization = Some(anonymization);
        record.synthesis_attempts = outcome.attempts;
        record.synthesis = outcome.result;
        record.timing = timing;

        let result = ResultAssembler::assemble(&record);
        if result.synthesis.is_none() {
            warn!("No chairman could produce a synthesis");
            return Err(RunCouncilError::SynthesisUnavailable {
                partial: Box::new(result),
            });
        }

        info!("Council complete in {}ms", result.timing.total_ms);
        Ok(result)
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    since.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::{GatewayError, LlmSession};
    use async_trait::async_trait;
    use council_domain::{
        CostTier, DeliberationStatus, FailureKind, LineupSource, Model, StageStatus,
    };
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Clone)]
    enum Reply {
        Text(&'static str),
        Slow(&'static str, Duration),
        Fail(GatewayError),
    }

    #[derive(Clone)]
    enum ReviewReply {
        /// Rank shown answers by this order of answer texts
        Prefer(Vec<&'static str>),
        Raw(Reply),
    }

    #[derive(Clone)]
    struct Script {
        answer: Reply,
        review: ReviewReply,
        synthesis: Reply,
    }

    #[derive(Debug, Clone)]
    struct RecordedPrompt {
        model: String,
        stage: Stage,
        prompt: String,
    }

    /// Gateway that answers from per-model scripts and records every prompt
    struct CouncilGateway {
        scripts: HashMap<String, Script>,
        prompts: Arc<Mutex<Vec<RecordedPrompt>>>,
    }

    impl CouncilGateway {
        fn new(scripts: Vec<(&str, Script)>) -> Arc<Self> {
            Arc::new(Self {
                scripts: scripts.into_iter().map(|(m, s)| (m.to_string(), s)).collect(),
                prompts: Arc::new(Mutex::new(Vec::new())),
            })
        }

        fn prompts(&self, stage: Stage) -> Vec<RecordedPrompt> {
            self.prompts
                .lock()
                .unwrap()
                .iter()
                .filter(|p| p.stage == stage)
                .cloned()
                .collect()
        }
    }

    struct CouncilSession {
        model: Model,
        stage: Stage,
        script: Script,
        prompts: Arc<Mutex<Vec<RecordedPrompt>>>,
    }

    /// `(label, text)` pairs from a review prompt
    fn shown_answers(prompt: &str) -> Vec<(String, String)> {
        let lines: Vec<&str> = prompt.lines().collect();
        lines
            .windows(2)
            .filter(|w| w[0].starts_with("Response ") && w[0].ends_with(':'))
            .map(|w| (w[0].trim_end_matches(':').to_string(), w[1].to_string()))
            .collect()
    }

    async fn play(reply: &Reply) -> Result<String, GatewayError> {
        match reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Slow(text, delay) => {
                tokio::time::sleep(*delay).await;
                Ok(text.to_string())
            }
            Reply::Fail(e) => Err(e.clone()),
        }
    }

    #[async_trait]
    impl LlmSession for CouncilSession {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn send(&self, content: &str) -> Result<String, GatewayError> {
            self.prompts.lock().unwrap().push(RecordedPrompt {
                model: self.model.to_string(),
                stage: self.stage,
                prompt: content.to_string(),
            });

            match self.stage {
                Stage::Collect => play(&self.script.answer).await,
                Stage::Synthesis => play(&self.script.synthesis).await,
                Stage::Review => match &self.script.review {
                    ReviewReply::Raw(reply) => play(reply).await,
                    ReviewReply::Prefer(order) => {
                        let mut shown = shown_answers(content);
                        shown.sort_by_key(|(_, text)| {
                            order.iter().position(|o| o == text).unwrap_or(usize::MAX)
                        });
                        let lines: Vec<String> = shown
                            .iter()
                            .enumerate()
                            .map(|(i, (label, _))| format!("{}. {}", i + 1, label))
                            .collect();
                        Ok(format!("All fine.\n\nFINAL RANKING:\n{}", lines.join("\n")))
                    }
                },
            }
        }
    }

    #[async_trait]
    impl LlmGateway for CouncilGateway {
        async fn create_session_with_system_prompt(
            &self,
            model: &Model,
            system_prompt: &str,
        ) -> Result<Box<dyn LlmSession>, GatewayError> {
            let script = self
                .scripts
                .get(model.as_str())
                .cloned()
                .ok_or_else(|| GatewayError::ModelNotAvailable(model.to_string()))?;
            let stage = if system_prompt == PromptTemplate::review_system() {
                Stage::Review
            } else if system_prompt == PromptTemplate::synthesis_system() {
                Stage::Synthesis
            } else {
                Stage::Collect
            };
            Ok(Box::new(CouncilSession {
                model: model.clone(),
                stage,
                script,
                prompts: Arc::clone(&self.prompts),
            }))
        }
    }

    const PREFERENCE: [&str; 3] = ["Sky blue", "Cobalt blue", "Forest green"];

    fn answering(text: &'static str) -> Script {
        Script {
            answer: Reply::Text(text),
            review: ReviewReply::Prefer(PREFERENCE.to_vec()),
            synthesis: Reply::Text("Blue."),
        }
    }

    fn failing(error: GatewayError) -> Script {
        Script {
            answer: Reply::Fail(error.clone()),
            review: ReviewReply::Raw(Reply::Fail(error.clone())),
            synthesis: Reply::Fail(error),
        }
    }

    fn model(id: &str) -> Model {
        Model::new(id).unwrap()
    }

    fn budget_council() -> Council {
        let lineup = CostTier::Budget.static_lineup();
        let alternates = lineup.council.clone();
        Council::new(
            Some(CostTier::Budget),
            LineupSource::Static,
            lineup.council,
            lineup.chairman,
            alternates,
        )
        .unwrap()
    }

    fn small_council(chairman: &str, alternates: &[&str]) -> Council {
        Council::new(
            None,
            LineupSource::Explicit,
            vec![model("v/a"), model("v/b"), model("v/c")],
            model(chairman),
            alternates.iter().map(|m| model(m)).collect(),
        )
        .unwrap()
    }

    fn input(council: Council) -> RunCouncilInput {
        RunCouncilInput::new(Question::new("Pick a color").unwrap(), council)
    }

    fn use_case(gateway: Arc<CouncilGateway>) -> RunCouncilUseCase<CouncilGateway> {
        RunCouncilUseCase::new(gateway, DeliberationParams::default()).with_seed(42)
    }

    #[tokio::test(start_paused = true)]
    async fn test_pick_a_color_with_one_timeout() {
        let gateway = CouncilGateway::new(vec![
            ("openai/gpt-4o-mini", answering("Cobalt blue")),
            ("anthropic/claude-3-5-sonnet", answering("Forest green")),
            ("google/gemini-2.0-flash-001", answering("Sky blue")),
            (
                "x-ai/grok-4.1-fast",
                Script {
                    answer: Reply::Slow("Red", Duration::from_secs(600)),
                    ..answering("Red")
                },
            ),
        ]);

        let result = use_case(Arc::clone(&gateway))
            .execute(input(budget_council()))
            .await
            .unwrap();

        assert_eq!(result.status, DeliberationStatus::Complete);
        assert_eq!(result.responses.len(), 4);
        let late = result.failed_responses().next().unwrap();
        assert_eq!(late.participant.as_str(), "x-ai/grok-4.1-fast");
        assert_eq!(late.failure_reason().unwrap().kind, FailureKind::Timeout);
        assert_eq!(late.latency_ms, 120_000);
        assert_eq!(result.stage(Stage::Collect).unwrap().status, StageStatus::Degraded);

        // Three reviewers, each shown the two answers that are not its own
        let reviews = gateway.prompts(Stage::Review);
        assert_eq!(reviews.len(), 3);
        for review in &reviews {
            let own = result
                .answers
                .iter()
                .find(|a| a.participant.as_str() == review.model)
                .unwrap();
            let shown = shown_answers(&review.prompt);
            assert_eq!(shown.len(), 2);
            assert!(shown.iter().all(|(label, _)| *label != own.label.as_str()));
            assert!(!review.prompt.contains(&own.text));
            assert!(!review.prompt.contains("gpt-4o-mini"));
        }

        let consensus = result.consensus.as_ref().unwrap();
        assert!(consensus.is_ranked());
        assert_eq!(consensus.valid_ballots, 3);
        let ranked: Vec<&str> = result.ranking.iter().map(|r| r.participant.as_str()).collect();
        assert_eq!(
            ranked,
            vec![
                "google/gemini-2.0-flash-001",
                "openai/gpt-4o-mini",
                "anthropic/claude-3-5-sonnet"
            ]
        );

        let synthesis = result.synthesis.as_ref().unwrap();
        assert_eq!(synthesis.chairman.as_str(), "google/gemini-2.0-flash-001");
        assert!(!synthesis.fallback);
        assert_eq!(result.final_answer(), Some("Blue."));

        let chairman_prompt = &gateway.prompts(Stage::Synthesis)[0].prompt;
        assert!(chairman_prompt.contains("Original Question: Pick a color"));
        assert!(chairman_prompt.contains("Model: anthropic/claude-3-5-sonnet\nResponse:\nForest green"));
        assert!(chairman_prompt.contains("1. google/gemini-2.0-flash-001 (score 1.00)"));
        assert!(chairman_prompt.contains("Unavailable council members (no response): x-ai/grok-4.1-fast"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_success_skips_peer_review() {
        let gateway = CouncilGateway::new(vec![
            ("v/a", answering("Sky blue")),
            ("v/b", failing(GatewayError::Authentication("bad key".into()))),
            ("v/c", failing(GatewayError::RateLimited("429".into()))),
        ]);

        let result = use_case(Arc::clone(&gateway))
            .execute(input(small_council("v/a", &[])))
            .await
            .unwrap();

        assert_eq!(result.status, DeliberationStatus::Complete);
        assert!(gateway.prompts(Stage::Review).is_empty());
        assert!(result.consensus.is_none());
        assert_eq!(result.stage(Stage::Review).unwrap().status, StageStatus::Skipped);
        let chairman_prompt = &gateway.prompts(Stage::Synthesis)[0].prompt;
        assert!(chairman_prompt.contains("No peer ranking is available"));
        assert!(chairman_prompt.contains("v/b, v/c"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_successes_fails_without_synthesis() {
        let gateway = CouncilGateway::new(vec![
            ("v/a", failing(GatewayError::Connection("reset".into()))),
            ("v/b", failing(GatewayError::Malformed("no choices".into()))),
            ("v/c", failing(GatewayError::Timeout)),
        ]);

        let err = use_case(Arc::clone(&gateway))
            .execute(input(small_council("v/a", &[])))
            .await
            .unwrap_err();

        assert!(matches!(err, RunCouncilError::AllParticipantsFailed { .. }));
        let partial = err.into_partial();
        assert_eq!(partial.status, DeliberationStatus::Failed);
        assert_eq!(partial.responses.len(), 3);
        // Connection reset is retried once
        assert_eq!(partial.responses[0].tries, 2);
        assert_eq!(partial.responses[1].tries, 1);
        assert!(gateway.prompts(Stage::Synthesis).is_empty());
        assert!(gateway.prompts(Stage::Review).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_chairman_failure_falls_back_to_alternate() {
        let gateway = CouncilGateway::new(vec![
            (
                "v/a",
                Script {
                    synthesis: Reply::Fail(GatewayError::Server {
                        status: 500,
                        message: "boom".into(),
                    }),
                    ..answering("Sky blue")
                },
            ),
            ("v/b", answering("Cobalt blue")),
            ("v/c", answering("Forest green")),
        ]);

        let result = use_case(Arc::clone(&gateway))
            .execute(input(small_council("v/a", &["v/c", "v/b"])))
            .await
            .unwrap();

        let synthesis = result.synthesis.as_ref().unwrap();
        assert_eq!(synthesis.chairman.as_str(), "v/c");
        assert!(synthesis.fallback);
        assert_eq!(result.synthesis_attempts.len(), 2);
        assert_eq!(result.synthesis_attempts[0].tries, 2);
        assert_eq!(result.stage(Stage::Synthesis).unwrap().status, StageStatus::Degraded);
        assert_eq!(result.status, DeliberationStatus::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn test_chairman_that_failed_stage_one_is_skipped() {
        let gateway = CouncilGateway::new(vec![
            ("v/a", failing(GatewayError::ModelNotAvailable("v/a".into()))),
            ("v/b", answering("Cobalt blue")),
            ("v/c", answering("Forest green")),
        ]);

        let result = use_case(Arc::clone(&gateway))
            .execute(input(small_council("v/a", &["v/b", "v/c"])))
            .await
            .unwrap();

        let synthesis_prompts = gateway.prompts(Stage::Synthesis);
        assert_eq!(synthesis_prompts.len(), 1);
        assert_eq!(synthesis_prompts[0].model, "v/b");
        assert_eq!(result.synthesis.unwrap().chairman.as_str(), "v/b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_reachable_chairman_returns_partial() {
        let down = Reply::Fail(GatewayError::Authentication("revoked".into()));
        let gateway = CouncilGateway::new(vec![
            (
                "v/a",
                Script {
                    synthesis: down.clone(),
                    ..answering("Sky blue")
                },
            ),
            (
                "v/b",
                Script {
                    synthesis: down.clone(),
                    ..answering("Cobalt blue")
                },
            ),
            (
                "v/c",
                Script {
                    synthesis: down,
                    ..answering("Forest green")
                },
            ),
        ]);

        let err = use_case(gateway)
            .execute(input(small_council("v/a", &["v/b", "v/c"])))
            .await
            .unwrap_err();

        let partial = err.partial();
        assert!(matches!(err, RunCouncilError::SynthesisUnavailable { .. }));
        assert_eq!(partial.status, DeliberationStatus::PartialNoSynthesis);
        assert_eq!(partial.synthesis_attempts.len(), 3);
        assert!(partial.consensus.as_ref().unwrap().is_ranked());
        assert_eq!(partial.answers.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unparsable_reviews_degrade_to_unranked() {
        let rambling = ReviewReply::Raw(Reply::Text("They are all lovely colors."));
        let gateway = CouncilGateway::new(vec![
            (
                "v/a",
                Script {
                    review: rambling.clone(),
                    ..answering("Sky blue")
                },
            ),
            (
                "v/b",
                Script {
                    review: rambling.clone(),
                    ..answering("Cobalt blue")
                },
            ),
            (
                "v/c",
                Script {
                    review: rambling,
                    ..answering("Forest green")
                },
            ),
        ]);

        let result = use_case(Arc::clone(&gateway))
            .execute(input(small_council("v/a", &[])))
            .await
            .unwrap();

        assert_eq!(result.status, DeliberationStatus::Complete);
        assert!(!result.consensus.as_ref().unwrap().is_ranked());
        assert_eq!(result.stage(Stage::Review).unwrap().status, StageStatus::Failed);
        assert!(result.ranking.iter().all(|r| r.score.is_none()));
        let chairman_prompt = &gateway.prompts(Stage::Synthesis)[0].prompt;
        assert!(chairman_prompt.contains("No peer ranking is available"));
    }
}
