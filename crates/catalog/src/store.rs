use remarket_core::{ListingId, StoreResult};

use crate::listing::Listing;

/// Durable store of listings.
///
/// Reads must reflect the most recently committed `save` for a listing.
/// Stock-bearing writes go through the reservation engine exclusively;
/// other components treat listings as read-only.
pub trait ListingStore: Send + Sync {
    /// Fetch a listing by id, or `None` if it does not exist.
    fn get(&self, id: ListingId) -> StoreResult<Option<Listing>>;

    /// Create or replace a listing record (seller/admin flows).
    fn insert(&self, listing: Listing) -> StoreResult<()>;

    /// Write back a mutated listing.
    ///
    /// Callers must hold whatever exclusivity the mutation requires; the
    /// reservation engine holds the per-listing lock across its
    /// read-check-save sequence.
    fn save(&self, listing: Listing) -> StoreResult<()>;
}
