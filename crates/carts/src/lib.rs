//! `remarket-carts` — per-buyer mutable staging area for desired items.
//!
//! A cart is independent of inventory until checkout time: nothing here
//! touches stock. The one behavioral rule that matters downstream is that
//! adding a listing already present merges quantities rather than
//! duplicating the line.

pub mod cart;
pub mod service;
pub mod store;
pub mod view;

pub use cart::{Cart, CartLine};
pub use service::{CartError, CartService};
pub use store::CartStore;
pub use view::{CartView, CartViewLine};
