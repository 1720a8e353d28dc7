//! Error types for applying change records.

/// Errors that abort an apply run.
///
/// Rows are 1-based positions in the supplied change list, matching the row
/// numbers a reviewer sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    /// A record that writes a value carries none.
    #[error("row {row} ({root} at {path:?}): {reason}")]
    Validation {
        /// Position of the record in the change list.
        row: usize,
        /// Root object the record targets.
        root: String,
        /// Key path of the record.
        path: String,
        /// What is wrong with the record.
        reason: String,
    },

    /// A record below a root object names no key.
    #[error("row {row} ({root}): missing or empty key")]
    MissingKey {
        /// Position of the record in the change list.
        row: usize,
        /// Root object the record targets.
        root: String,
    },
}

/// Convenience alias for apply results.
pub type ApplyResult<T> = Result<T, ApplyError>;
