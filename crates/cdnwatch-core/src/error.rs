//! Shared error types.

/// Top-level error type for cdnwatch infrastructure.
#[derive(Debug, thiserror::Error)]
pub enum CdnWatchError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Convenience result type for cdnwatch operations.
pub type CdnWatchResult<T> = Result<T, CdnWatchError>;
