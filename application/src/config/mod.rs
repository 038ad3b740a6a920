//! Application-level configuration.
//!
//! - [`DeliberationParams`] - stage deadlines, retry policy, ranking aggregation

pub mod deliberation_params;

pub use deliberation_params::{DeliberationParams, MAX_RETRIES};
