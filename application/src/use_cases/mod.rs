//! Use cases (application services)
//!
//! - [`resolve_council`] - participant registry
//! - [`collect_responses`] - failure-isolated fan-out with deadline and retry
//! - [`peer_review`] - anonymized ranking stage
//! - [`synthesize`] - chairman synthesis with fallback
//! - [`run_council`] - the full deliberation

pub mod collect_responses;
pub mod peer_review;
pub mod resolve_council;
pub mod run_council;
pub mod synthesize;
