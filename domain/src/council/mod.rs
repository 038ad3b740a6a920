//! Council composition
//!
//! - [`tier::CostTier`] - cost tiers and their built-in participant lineups
//! - [`participant::Council`] - the resolved, ordered set of participants
//!   for one deliberation, with exactly one chairman
//! - [`discovery`] - pure selection of frontier models from a provider catalog

pub mod discovery;
pub mod participant;
pub mod tier;

pub use discovery::{CatalogEntry, VendorPreference, select_chairman, select_frontier};
pub use participant::{Council, LineupSource, Participant, Role};
pub use tier::{CostTier, TierLineup};
