//! Prompt domain
//!
//! Templates for the answer, review and synthesis stages.

mod template;

pub use template::PromptTemplate;
