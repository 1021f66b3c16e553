//! `remarket-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod money;
pub mod store;

pub use error::{DomainError, DomainResult};
pub use id::{BuyerId, ListingId, OrderId};
pub use money::Money;
pub use store::{StoreError, StoreResult};
