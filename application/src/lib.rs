//! Application layer for llm-council
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DeliberationParams, MAX_RETRIES};
pub use ports::{
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
    model_catalog::{CatalogError, ModelCatalog},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::collect_responses::{QueryRequest, ResponseCollector, StageAttempts};
pub use use_cases::peer_review::{PeerReviewOutcome, PeerReviewUseCase};
pub use use_cases::resolve_council::{CouncilSelection, RegistryError, ResolveCouncilUseCase};
pub use use_cases::run_council::{RunCouncilError, RunCouncilInput, RunCouncilUseCase};
pub use use_cases::synthesize::{SynthesisInput, SynthesisOutcome, SynthesizeUseCase, chairman_candidates};
