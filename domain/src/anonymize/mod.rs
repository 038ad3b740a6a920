//! Anonymization of stage-1 answers
//!
//! Successful answers are relabeled "Response A", "Response B", … under a
//! fresh random permutation for every deliberation. The label→participant
//! mapping lives in a [`LabelMap`] that is handed to the synthesis stage
//! explicitly; reviewer prompts only ever see [`AnonymizedAnswer`]s.

pub mod anonymizer;
pub mod label;

pub use anonymizer::{AnonymizedAnswer, Anonymization, CollectedAnswer, LabelMap, anonymize};
pub use label::Label;
