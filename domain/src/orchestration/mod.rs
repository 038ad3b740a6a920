//! Deliberation orchestration domain
//!
//! Stages, per-participant attempt records and the pure assembly of the
//! final [`DeliberationResult`](value_objects::DeliberationResult).

pub mod assembler;
pub mod entities;
pub mod value_objects;
