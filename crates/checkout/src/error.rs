use thiserror::Error;

use remarket_core::{DomainError, ListingId, StoreError};
use remarket_orders::LedgerError;
use remarket_reservation::{CommittedReservation, ReservationError};

/// Checkout failure taxonomy.
///
/// `EmptyCart` and the listing rejections are user-facing and
/// non-retryable without user action. `TransientStorage` is safe to retry
/// from scratch: every path that returns it has already rolled back or
/// compensated, so a retry cannot double-charge stock. `ConsistencyFault`
/// means compensation itself failed and stock is out of sync with the
/// order ledger; it must page, not hide behind a generic 500.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("your cart is empty")]
    EmptyCart,

    #[error("insufficient stock for listing {0}")]
    InsufficientStock(ListingId),

    #[error("listing {0} not found")]
    ListingNotFound(ListingId),

    #[error("listing {0} is no longer available")]
    ListingDisabled(ListingId),

    #[error("transient storage failure: {0}")]
    TransientStorage(String),

    /// Compensation failed: the reservation below was charged against
    /// stock but has no order, and the release did not go through.
    /// Requires out-of-band reconciliation.
    #[error("consistency fault, manual reconciliation required: {cause}")]
    ConsistencyFault {
        reservation: CommittedReservation,
        cause: String,
    },

    #[error("validation failure: {0}")]
    Validation(String),
}

impl CheckoutError {
    /// Whether retrying the whole checkout attempt from scratch is safe.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckoutError::TransientStorage(_))
    }
}

impl From<StoreError> for CheckoutError {
    fn from(e: StoreError) -> Self {
        CheckoutError::TransientStorage(e.to_string())
    }
}

impl From<ReservationError> for CheckoutError {
    fn from(e: ReservationError) -> Self {
        match e {
            ReservationError::InsufficientStock(id) => CheckoutError::InsufficientStock(id),
            ReservationError::ListingNotFound(id) => CheckoutError::ListingNotFound(id),
            ReservationError::ListingDisabled(id) => CheckoutError::ListingDisabled(id),
            ReservationError::Storage(err) => CheckoutError::TransientStorage(err.to_string()),
            ReservationError::Domain(err) => CheckoutError::Validation(err.to_string()),
        }
    }
}

impl From<LedgerError> for CheckoutError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::Validation(err) => CheckoutError::Validation(err.to_string()),
            LedgerError::NotFound(id) => {
                CheckoutError::Validation(format!("order {id} not found"))
            }
            LedgerError::Store(err) => CheckoutError::TransientStorage(err.to_string()),
        }
    }
}

impl From<DomainError> for CheckoutError {
    fn from(e: DomainError) -> Self {
        CheckoutError::Validation(e.to_string())
    }
}
