//! Foundation types for promoting configuration values between environments.
//!
//! Every other promo crate depends on `promo-types`. The types here describe
//! the documents being compared and the change records flowing from the diff
//! engine, through human review, into the applier.
//!
//! # Key Types
//!
//! - [`Document`] / [`Scalar`] -- Generic configuration tree (objects, lists, scalars)
//! - [`Snapshot`] -- Root object name to document mapping for one environment
//! - [`ChangeRecord`] / [`ChangeKind`] -- A single classified change
//! - [`EnvPair`] -- The lower/higher environment names of a promotion
//! - [`ReviewRow`] / [`ReviewSheet`] -- Flat, string-valued rendering of change records

pub mod change;
pub mod document;
pub mod env;
pub mod error;
pub mod path;
pub mod review;
pub mod snapshot;

pub use change::{comment, ChangeKind, ChangeRecord};
pub use document::{Document, Scalar};
pub use env::EnvPair;
pub use error::{TypeError, TypeResult};
pub use review::{parse_value, ReviewRow, ReviewSheet};
pub use snapshot::Snapshot;
