//! Infrastructure layer: store implementations and test tooling.
//!
//! The in-memory stores here are the reference backends for the store
//! traits in the domain crates. They are intended for tests/dev; a
//! persistent document store slots in behind the same traits.

pub mod fault;
pub mod memory;
