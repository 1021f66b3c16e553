//! `remarket-reservation` — atomic stock reservation for checkout.
//!
//! The reservation engine is the only writer of listing stock. For one
//! checkout attempt it either decrements every requested line or none of
//! them, re-reading live stock under a per-listing lock so that two
//! attempts racing for the same unit cannot both win.
//!
//! The inverse operation, [`ReservationEngine::release`], runs under the
//! same locking discipline and is how the checkout orchestrator compensates
//! a reservation whose order never made it to the ledger.

pub mod engine;
pub mod error;
pub mod request;

pub use engine::ReservationEngine;
pub use error::ReservationError;
pub use request::{CommittedReservation, RequestLine, ReservationRequest, ReservedLine};
