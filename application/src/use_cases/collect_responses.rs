//! Response collection
//!
//! Fans one prompt per participant out to the gateway, one task per
//! participant, under a shared stage deadline. A participant's failure is
//! recorded as a [`QueryAttempt`] and never affects the others.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::ProgressNotifier;
use council_domain::core::string::one_line;
use council_domain::{CollectedAnswer, FailureKind, Model, ParticipantFailure, QueryAttempt, Stage};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::task::JoinSet;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, warn};

const LOG_REASON_LEN: usize = 200;

/// One participant's prompt for a stage
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub participant: Model,
    pub system_prompt: String,
    pub prompt: String,
}

impl QueryRequest {
    pub fn new(participant: Model, system_prompt: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            participant,
            system_prompt: system_prompt.into(),
            prompt: prompt.into(),
        }
    }
}

/// Attempts of one stage, kept in request order along with the order in
/// which they finished
#[derive(Debug, Clone)]
pub struct StageAttempts {
    attempts: Vec<QueryAttempt>,
    completion: Vec<usize>,
}

impl StageAttempts {
    /// Attempts in the order the requests were given
    pub fn attempts(&self) -> &[QueryAttempt] {
        &self.attempts
    }

    /// Attempts in the order they finished, earliest first
    pub fn in_completion_order(&self) -> impl Iterator<Item = &QueryAttempt> {
        self.completion.iter().map(|&slot| &self.attempts[slot])
    }

    /// Successful answers in completion order
    pub fn answers(&self) -> Vec<CollectedAnswer> {
        self.in_completion_order()
            .filter_map(|a| a.text().map(|text| CollectedAnswer::new(a.participant.clone(), text)))
            .collect()
    }

    pub fn success_count(&self) -> usize {
        self.attempts.iter().filter(|a| a.is_success()).count()
    }

    pub fn failed_participants(&self) -> Vec<Model> {
        self.attempts
            .iter()
            .filter(|a| !a.is_success())
            .map(|a| a.participant.clone())
            .collect()
    }

    pub fn into_attempts(self) -> Vec<QueryAttempt> {
        self.attempts
    }
}

/// Issues failure-isolated queries with bounded retries
pub struct ResponseCollector<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    max_retries: u32,
}

impl<G: LlmGateway + 'static> ResponseCollector<G> {
    pub fn new(gateway: Arc<G>, max_retries: u32) -> Self {
        Self { gateway, max_retries }
    }

    /// Query every participant concurrently; all tasks share `deadline`.
    pub async fn collect(
        &self,
        stage: Stage,
        requests: Vec<QueryRequest>,
        deadline: Instant,
        progress: &dyn ProgressNotifier,
    ) -> StageAttempts {
        info!("{}: querying {} participant(s)", stage, requests.len());
        progress.on_stage_start(stage, requests.len());

        let participants: Vec<Model> = requests.iter().map(|r| r.participant.clone()).collect();
        let mut join_set = JoinSet::new();

        for (slot, request) in requests.into_iter().enumerate() {
            let gateway = Arc::clone(&self.gateway);
            let max_retries = self.max_retries;

            join_set.spawn(async move {
                let attempt = Self::query_with_deadline(gateway, stage, request, deadline, max_retries).await;
                (slot, attempt)
            });
        }

        let mut slots: Vec<Option<QueryAttempt>> = vec![None; participants.len()];
        let mut completion = Vec::with_capacity(participants.len());

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((slot, attempt)) => {
                    match attempt.failure_reason() {
                        None => debug!("{} responded in {}ms", attempt.participant, attempt.latency_ms),
                        Some(failure) => {
                            warn!("{} failed: {}", attempt.participant, one_line(&failure.to_string(), LOG_REASON_LEN))
                        }
                    }
                    progress.on_task_complete(stage, &attempt.participant, attempt.is_success());
                    slots[slot] = Some(attempt);
                    completion.push(slot);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                }
            }
        }

        // A task that panicked still leaves a record for its participant
        for (slot, entry) in slots.iter_mut().enumerate() {
            if entry.is_none() {
                let participant = participants[slot].clone();
                progress.on_task_complete(stage, &participant, false);
                *entry = Some(QueryAttempt::failure(
                    participant,
                    stage,
                    ParticipantFailure::new(FailureKind::Other, "query task aborted"),
                    0,
                    0,
                ));
                completion.push(slot);
            }
        }

        progress.on_stage_complete(stage);
        StageAttempts {
            attempts: slots.into_iter().flatten().collect(),
            completion,
        }
    }

    /// Query a single participant; used for sequential chairman attempts.
    pub async fn query_one(
        &self,
        stage: Stage,
        request: QueryRequest,
        deadline: Instant,
    ) -> QueryAttempt {
        Self::query_with_deadline(Arc::clone(&self.gateway), stage, request, deadline, self.max_retries).await
    }

    async fn query_with_deadline(
        gateway: Arc<G>,
        stage: Stage,
        request: QueryRequest,
        deadline: Instant,
        max_retries: u32,
    ) -> QueryAttempt {
        let started = Instant::now();
        let tries = AtomicU32::new(0);

        let outcome = timeout_at(
            deadline,
            Self::query_with_retry(gateway.as_ref(), &request, max_retries, &tries),
        )
        .await;
        let latency_ms = started.elapsed().as_millis() as u64;
        let tries = tries.load(Ordering::SeqCst);

        match outcome {
            Ok(Ok(text)) => QueryAttempt::success(request.participant, stage, text, latency_ms, tries),
            Ok(Err(e)) => QueryAttempt::failure(request.participant, stage, e.to_failure(), latency_ms, tries),
            Err(_) => QueryAttempt::failure(
                request.participant,
                stage,
                ParticipantFailure::timeout(),
                latency_ms,
                tries,
            ),
        }
    }

    async fn query_with_retry(
        gateway: &G,
        request: &QueryRequest,
        max_retries: u32,
        tries: &AtomicU32,
    ) -> Result<String, GatewayError> {
        loop {
            let attempt = tries.fetch_add(1, Ordering::SeqCst) + 1;
            match Self::query_once(gateway, request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt <= max_retries => {
                    warn!("{} transient failure ({}), retrying", request.participant, e);
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn query_once(gateway: &G, request: &QueryRequest) -> Result<String, GatewayError> {
        let session = gateway
            .create_session_with_system_prompt(&request.participant, &request.system_prompt)
            .await?;
        session.send(&request.prompt).await
    }
}
