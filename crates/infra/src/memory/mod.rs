//! In-memory store implementations.
//!
//! All of them follow the same shape: an `RwLock`'d map, clone-on-read,
//! replace-on-write. Lock poisoning is reported as a non-retryable
//! storage failure rather than panicking the caller.

mod carts;
mod listings;
mod orders;
mod sinks;

pub use carts::InMemoryCartStore;
pub use listings::InMemoryListingStore;
pub use orders::InMemoryOrderLedger;
pub use sinks::{InMemoryAuditSink, InMemoryNotificationSink};
