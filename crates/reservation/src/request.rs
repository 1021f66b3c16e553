use serde::{Deserialize, Serialize};

use remarket_core::{DomainError, DomainResult, ListingId, Money};

/// One requested (listing, quantity) decrement. Quantity is >= 1 by
/// construction of the enclosing request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestLine {
    pub listing_id: ListingId,
    pub quantity: u32,
}

/// The immutable snapshot of cart lines submitted for one checkout attempt.
///
/// Line order is submission order: when several lines are short, the
/// rejection names the first one. Listing ids are unique within a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    lines: Vec<RequestLine>,
}

impl ReservationRequest {
    pub fn new(lines: Vec<RequestLine>) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::validation(
                "reservation request must have at least one line",
            ));
        }
        for (idx, line) in lines.iter().enumerate() {
            if line.quantity == 0 {
                return Err(DomainError::validation(format!(
                    "line {idx} has zero quantity"
                )));
            }
            if lines[..idx].iter().any(|l| l.listing_id == line.listing_id) {
                return Err(DomainError::validation(format!(
                    "listing {} appears more than once",
                    line.listing_id
                )));
            }
        }
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[RequestLine] {
        &self.lines
    }
}

/// One committed decrement: what was taken, and at what price.
///
/// `unit_price` is read atomically alongside the stock check, so price and
/// availability are consistent with each other.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservedLine {
    pub listing_id: ListingId,
    pub quantity: u32,
    pub unit_price: Money,
}

/// The committed side of a successful reservation.
///
/// Holding one of these means listing stock has already been decremented.
/// It must end up either inside a persisted order or handed back through
/// [`crate::ReservationEngine::release`]; dropping it on the floor is a
/// phantom stock loss.
#[must_use = "a committed reservation must be turned into an order or released"]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedReservation {
    lines: Vec<ReservedLine>,
}

impl CommittedReservation {
    pub(crate) fn new(lines: Vec<ReservedLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[ReservedLine] {
        &self.lines
    }
}
