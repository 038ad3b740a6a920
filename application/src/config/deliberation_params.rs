//! Deliberation parameters - use case control.
//!
//! [`DeliberationParams`] groups the static parameters that control how
//! [`RunCouncilUseCase`](crate::use_cases::run_council::RunCouncilUseCase)
//! drives each stage. These are application-layer concerns, not domain policy.

use council_domain::AggregationMethod;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound on retries of a transient failure
pub const MAX_RETRIES: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliberationParams {
    /// Deadline for every query in one stage, measured from stage start.
    pub stage_timeout: Duration,
    /// Retries after a transient failure (0 or 1).
    pub max_retries: u32,
    /// How peer rankings are combined.
    pub aggregation: AggregationMethod,
}

impl Default for DeliberationParams {
    fn default() -> Self {
        Self {
            stage_timeout: Duration::from_secs(120),
            max_retries: MAX_RETRIES,
            aggregation: AggregationMethod::default(),
        }
    }
}

impl DeliberationParams {
    // ==================== Builder Methods ====================

    pub fn with_stage_timeout(mut self, timeout: Duration) -> Self {
        self.stage_timeout = timeout;
        self
    }

    /// Values above [`MAX_RETRIES`] are clamped.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries.min(MAX_RETRIES);
        self
    }

    pub fn with_aggregation(mut self, method: AggregationMethod) -> Self {
        self.aggregation = method;
        self
    }
}
