//! Change applier for environment promotion.
//!
//! Folds a reviewed subset of change records into a copy of a snapshot,
//! producing the next state of the higher environment.
//!
//! # Key Types
//!
//! - [`ChangeApplier`] -- Ordered replay of change records onto a snapshot
//! - [`ApplyOutcome`] -- Updated snapshot plus deleted, added, and upgraded roots
//! - [`ApplyConfig`] -- Reserved pseudo-roots and the named-list path marker
//! - [`ApplyError`] -- Validation failures that abort a run

pub mod applier;
pub mod config;
pub mod error;
pub mod list_entry;

pub use applier::{ApplyOutcome, ChangeApplier};
pub use config::ApplyConfig;
pub use error::{ApplyError, ApplyResult};
