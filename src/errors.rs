//! Error types for the object pool

use thiserror::Error;

/// Error raised by a user-supplied creator or clearer.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Invalid argument: missing required {0}")]
    InvalidArgument(&'static str),

    #[error("Object creation failed: {0}")]
    CreationFailed(#[source] CallbackError),

    #[error("Object clearing failed: {0}")]
    ClearingFailed(#[source] CallbackError),

    #[error("Operation was cancelled")]
    Cancelled,
}

impl PoolError {
    /// Whether this error came from a user callback rather than the pool itself
    pub fn is_callback_failure(&self) -> bool {
        matches!(self, PoolError::CreationFailed(_) | PoolError::ClearingFailed(_))
    }
}

pub type PoolResult<T> = Result<T, PoolError>;
