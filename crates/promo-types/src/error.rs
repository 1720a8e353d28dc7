use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown change request: {0:?}")]
    UnknownChangeKind(String),

    #[error("expected an object at the snapshot root, got {0}")]
    NotAnObject(&'static str),
}

/// Convenience alias for type-level results.
pub type TypeResult<T> = Result<T, TypeError>;
