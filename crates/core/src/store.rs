//! Storage error model shared by the store traits.
//!
//! Every durable-store trait (`ListingStore`, `CartStore`, `OrderLedger`)
//! reports infrastructure failures through this one type so callers can
//! classify retryability uniformly.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Infrastructure-level storage failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend failed transiently; the whole enclosing operation is safe
    /// to retry once the caller has rolled back or compensated.
    #[error("transient storage failure: {0}")]
    Transient(String),

    /// The backend is misconfigured or corrupted; retrying will not help.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
