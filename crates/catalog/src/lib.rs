//! `remarket-catalog` — listings and the listing store seam.
//!
//! The catalog is the authoritative record of each item's available stock
//! and price. It is a leaf dependency: nothing here knows about carts,
//! reservations, or orders.

pub mod listing;
pub mod store;

pub use listing::Listing;
pub use store::ListingStore;
