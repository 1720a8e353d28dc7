//! Error types for snapshot storage.

use std::path::PathBuf;

/// Errors that can occur while reading or writing snapshot directories.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    /// The snapshot location is missing or is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Reading, writing, or listing a file failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// Listing a directory failed.
    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// A value file is not valid YAML.
    #[error("invalid YAML in {}: {source}", .path.display())]
    Yaml {
        /// The offending file.
        path: PathBuf,
        /// The parser error.
        source: serde_yaml::Error,
    },

    /// A document could not be converted to or from the tree model.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for snapshot results.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
