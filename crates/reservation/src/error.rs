use thiserror::Error;

use remarket_core::{DomainError, ListingId, StoreError};

/// Reservation failure modes.
///
/// The first three are normal, non-retryable rejections: the caller must
/// re-decide (drop the line, lower the quantity), not blindly retry.
/// `Storage` is transient and guarantees **no partial effect**: no stock
/// anywhere in the request was left decremented.
#[derive(Debug, Error)]
pub enum ReservationError {
    #[error("insufficient stock for listing {0}")]
    InsufficientStock(ListingId),

    #[error("listing {0} not found")]
    ListingNotFound(ListingId),

    #[error("listing {0} is disabled")]
    ListingDisabled(ListingId),

    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ReservationError {
    /// Whether retrying the whole checkout attempt from scratch is safe.
    pub fn is_transient(&self) -> bool {
        matches!(self, ReservationError::Storage(StoreError::Transient(_)))
    }
}
