//! `remarket-checkout` — the checkout orchestrator.
//!
//! Drives one buyer's cart through reservation and order creation as a
//! single logical unit of work, and owns the one decision no other
//! component is allowed to make: when a failure requires compensating a
//! committed reservation versus simply reporting.

pub mod error;
pub mod orchestrator;
pub mod sink;

pub use error::CheckoutError;
pub use orchestrator::{CheckoutOrchestrator, CheckoutOutcome};
pub use sink::{AuditLogEntry, AuditSink, NotificationEvent, NotificationKind, NotificationSink};
