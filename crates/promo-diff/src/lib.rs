//! Three-way diff engine for environment promotion.
//!
//! Compares the lower environment's previous and current snapshots against
//! the higher environment's previous snapshot and classifies every difference
//! as an add, modify, delete, pending add, or pending delete.
//!
//! # Key Types
//!
//! - [`DiffEngine`] -- Recursive three-way comparator over snapshots
//! - [`ChangeSet`] -- Ordered change records with per-kind counters
//! - [`ValueTransform`] -- Pluggable rewrite of values bound for the higher environment
//! - [`DiffConfig`] / [`PathStyle`] -- How record paths are reported
//! - [`ValueDiff`] / [`DiffLine`] -- Unified line diff of a value change
//! - [`ServiceStatus`] -- Per-root promotion summary

pub mod change_set;
pub mod config;
pub mod engine;
mod named_list;
pub mod summary;
pub mod transform;
pub mod value_diff;

pub use change_set::ChangeSet;
pub use config::{DiffConfig, PathStyle};
pub use engine::{diff_snapshots, DiffEngine};
pub use summary::{summarize, ServiceStatus};
pub use transform::{IdentityTransform, ImageTagTransform, ValueTransform};
pub use value_diff::{diff_values, DiffLine, ValueDiff};
