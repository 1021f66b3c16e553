use std::collections::HashMap;
use std::sync::RwLock;

use remarket_catalog::{Listing, ListingStore};
use remarket_core::{ListingId, StoreError, StoreResult};

/// In-memory listing store.
///
/// Intended for tests/dev. Atomicity of multi-listing reservations comes
/// from the reservation engine's per-listing locks, not from this map.
#[derive(Debug, Default)]
pub struct InMemoryListingStore {
    listings: RwLock<HashMap<ListingId, Listing>>,
}

impl InMemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.listings.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ListingStore for InMemoryListingStore {
    fn get(&self, id: ListingId) -> StoreResult<Option<Listing>> {
        let listings = self
            .listings
            .read()
            .map_err(|_| StoreError::unavailable("listing store lock poisoned"))?;
        Ok(listings.get(&id).cloned())
    }

    fn insert(&self, listing: Listing) -> StoreResult<()> {
        let mut listings = self
            .listings
            .write()
            .map_err(|_| StoreError::unavailable("listing store lock poisoned"))?;
        listings.insert(listing.id(), listing);
        Ok(())
    }

    fn save(&self, listing: Listing) -> StoreResult<()> {
        self.insert(listing)
    }
}
