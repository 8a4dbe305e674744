//! Mutex error types.

use redis_mutex_store::StoreError;
use thiserror::Error;

/// Result type for mutex operations.
pub type Result<T> = std::result::Result<T, MutexError>;

/// Distributed mutex errors.
#[derive(Debug, Error)]
pub enum MutexError {
    /// The lock could not be acquired before the timeout or the retry
    /// strategy gave up.
    #[error("lock failed")]
    LockFailed,

    /// Release of a lock this handle does not hold.
    #[error("unlock invalid")]
    UnlockInvalid,

    /// Renewal of a lock this handle does not hold.
    #[error("refresh ttl failed")]
    RefreshTtlFailed,

    /// The cancellation token fired while waiting to retry.
    #[error("lock acquisition cancelled")]
    Cancelled,

    /// Rejected mutex options.
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// Store or transport failure, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MutexError {
    /// Whether the error came from the store rather than lock contention or
    /// ownership checks.
    pub fn is_store_error(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
