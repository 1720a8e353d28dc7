//! Snapshot storage for environment promotion.
//!
//! An environment's values live in a directory with one YAML file per root
//! object. This crate turns such a directory into a [`Snapshot`] and back.
//!
//! # Key Types
//!
//! - [`load_dir`] / [`write_dir`] -- Directory of value files to snapshot and back
//! - [`seed_missing_roots`] -- Pre-fill a higher snapshot with roots it never received
//! - [`SnapshotError`] -- I/O and YAML failures, naming the offending file
//!
//! [`Snapshot`]: promo_types::Snapshot

pub mod dir;
pub mod error;
pub mod seed;

pub use dir::{is_value_file, load_dir, load_file, write_dir, WriteReport};
pub use error::{SnapshotError, SnapshotResult};
pub use seed::seed_missing_roots;
