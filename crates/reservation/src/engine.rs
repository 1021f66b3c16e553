use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, error};

use remarket_catalog::{Listing, ListingStore};
use remarket_core::{DomainError, ListingId, StoreError};

use crate::error::ReservationError;
use crate::request::{CommittedReservation, ReservationRequest, ReservedLine};

/// Atomic check-and-decrement over listing stock.
///
/// Concurrency discipline: one lock per listing, held for the whole
/// read-check-save sequence. A multi-line request takes every lock it
/// needs in ascending `ListingId` order (ids are unique within a request),
/// so two requests over overlapping listing sets cannot deadlock, and
/// requests over disjoint sets never contend at all.
///
/// With the locks held the engine re-reads live stock; a quantity the
/// caller observed earlier (cart view, search page) carries no weight here.
pub struct ReservationEngine {
    listings: Arc<dyn ListingStore>,
    locks: Mutex<HashMap<ListingId, Arc<Mutex<()>>>>,
}

impl ReservationEngine {
    pub fn new(listings: Arc<dyn ListingStore>) -> Self {
        Self {
            listings,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Commit every decrement in the request, or none of them.
    ///
    /// On success the returned reservation carries, per line, the unit
    /// price read atomically alongside the stock check. On rejection the
    /// error names the first offending line in submission order. On a
    /// storage fault, decrements already applied for this request are
    /// rolled back under the still-held locks before the error is
    /// returned, so callers never observe a partial commit.
    pub fn commit(
        &self,
        request: &ReservationRequest,
    ) -> Result<CommittedReservation, ReservationError> {
        let handles = self.lock_handles(request.lines().iter().map(|l| l.listing_id))?;
        let _guards = acquire_all(&handles)?;

        // Check phase: validate every line against live stock before
        // touching anything. Submission order, so the first shortfall wins.
        let mut snapshots: Vec<Listing> = Vec::with_capacity(request.lines().len());
        for line in request.lines() {
            let listing = self
                .listings
                .get(line.listing_id)?
                .ok_or(ReservationError::ListingNotFound(line.listing_id))?;
            if listing.is_disabled() {
                return Err(ReservationError::ListingDisabled(line.listing_id));
            }
            if listing.stock() < line.quantity {
                debug!(
                    listing_id = %line.listing_id,
                    requested = line.quantity,
                    available = listing.stock(),
                    "reservation rejected: insufficient stock"
                );
                return Err(ReservationError::InsufficientStock(line.listing_id));
            }
            snapshots.push(listing);
        }

        // Apply phase: every line passed, write the decrements.
        let mut reserved = Vec::with_capacity(request.lines().len());
        for (idx, line) in request.lines().iter().enumerate() {
            let mut updated = snapshots[idx].clone();
            updated.decrement_stock(line.quantity)?;
            if let Err(e) = self.listings.save(updated) {
                self.roll_back_saves(&snapshots[..idx]);
                return Err(e.into());
            }
            reserved.push(ReservedLine {
                listing_id: line.listing_id,
                quantity: line.quantity,
                unit_price: snapshots[idx].unit_price(),
            });
        }

        debug!(lines = reserved.len(), "reservation committed");
        Ok(CommittedReservation::new(reserved))
    }

    /// Return previously committed stock — the inverse of [`Self::commit`].
    ///
    /// Runs under the same per-listing locks as commit, so a release and a
    /// concurrent commit on the same listing serialize like any two
    /// commits would.
    pub fn release(&self, reservation: &CommittedReservation) -> Result<(), ReservationError> {
        let handles = self.lock_handles(reservation.lines().iter().map(|l| l.listing_id))?;
        let _guards = acquire_all(&handles)?;

        let mut snapshots: Vec<Listing> = Vec::with_capacity(reservation.lines().len());
        for line in reservation.lines() {
            let listing = self.listings.get(line.listing_id)?.ok_or_else(|| {
                ReservationError::Domain(DomainError::invariant(format!(
                    "listing {} vanished while its stock was reserved",
                    line.listing_id
                )))
            })?;
            snapshots.push(listing);
        }

        for (idx, line) in reservation.lines().iter().enumerate() {
            let mut updated = snapshots[idx].clone();
            updated.restore_stock(line.quantity)?;
            if let Err(e) = self.listings.save(updated) {
                self.roll_back_saves(&snapshots[..idx]);
                return Err(e.into());
            }
        }

        debug!(lines = reservation.lines().len(), "reservation released");
        Ok(())
    }

    /// Undo saves already applied in this request by writing back the
    /// pre-mutation snapshots. Locks are still held. A store that fails
    /// its own rollback write breaks the no-partial-effect guarantee;
    /// that is logged loudly and left to out-of-band reconciliation.
    fn roll_back_saves(&self, originals: &[Listing]) {
        for original in originals {
            if let Err(e) = self.listings.save(original.clone()) {
                error!(
                    listing_id = %original.id(),
                    error = %e,
                    "rollback write failed; stock requires manual reconciliation"
                );
            }
        }
    }

    /// Resolve lock handles for the given listings, sorted by id so every
    /// caller acquires overlapping lock sets in the same order.
    fn lock_handles(
        &self,
        ids: impl Iterator<Item = ListingId>,
    ) -> Result<Vec<Arc<Mutex<()>>>, ReservationError> {
        let mut ids: Vec<ListingId> = ids.collect();
        ids.sort_unstable();

        let mut registry = self
            .locks
            .lock()
            .map_err(|_| StoreError::unavailable("listing lock registry poisoned"))?;
        Ok(ids
            .into_iter()
            .map(|id| Arc::clone(registry.entry(id).or_default()))
            .collect())
    }
}

fn acquire_all(handles: &[Arc<Mutex<()>>]) -> Result<Vec<MutexGuard<'_, ()>>, ReservationError> {
    let mut guards = Vec::with_capacity(handles.len());
    for handle in handles {
        guards.push(
            handle
                .lock()
                .map_err(|_| StoreError::unavailable("listing lock poisoned"))?,
        );
    }
    Ok(guards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::RwLock;

    use remarket_core::{Money, StoreResult};

    use crate::request::RequestLine;

    /// Minimal map-backed listing store for engine unit tests.
    #[derive(Default)]
    struct MapListingStore {
        inner: RwLock<HashMap<ListingId, Listing>>,
        // Fail the nth save (1-based); 0 disables fault injection.
        fail_on_save: AtomicU32,
        saves: AtomicU32,
    }

    impl MapListingStore {
        fn fail_on_save(&self, nth: u32) {
            self.fail_on_save.store(nth, Ordering::SeqCst);
            self.saves.store(0, Ordering::SeqCst);
        }
    }

    impl ListingStore for MapListingStore {
        fn get(&self, id: ListingId) -> StoreResult<Option<Listing>> {
            Ok(self.inner.read().expect("lock").get(&id).cloned())
        }

        fn insert(&self, listing: Listing) -> StoreResult<()> {
            self.inner
                .write()
                .expect("lock")
                .insert(listing.id(), listing);
            Ok(())
        }

        fn save(&self, listing: Listing) -> StoreResult<()> {
            let nth = self.fail_on_save.load(Ordering::SeqCst);
            if nth > 0 && self.saves.fetch_add(1, Ordering::SeqCst) + 1 == nth {
                return Err(StoreError::transient("injected save failure"));
            }
            self.inner
                .write()
                .expect("lock")
                .insert(listing.id(), listing);
            Ok(())
        }
    }

    fn seed(store: &MapListingStore, stock: u32, cents: u64) -> ListingId {
        let id = ListingId::new();
        store
            .insert(
                Listing::new(id, "iPhone 12, grade B", "Apple", "swapshop", Money::from_cents(cents), stock)
                    .unwrap(),
            )
            .unwrap();
        id
    }

    fn line(listing_id: ListingId, quantity: u32) -> RequestLine {
        RequestLine {
            listing_id,
            quantity,
        }
    }

    fn setup() -> (Arc<MapListingStore>, ReservationEngine) {
        let store = Arc::new(MapListingStore::default());
        let engine = ReservationEngine::new(store.clone());
        (store, engine)
    }

    #[test]
    fn commit_decrements_and_captures_price() {
        let (store, engine) = setup();
        let id = seed(&store, 10, 30_000);

        let request = ReservationRequest::new(vec![line(id, 3)]).unwrap();
        let committed = engine.commit(&request).unwrap();

        assert_eq!(committed.lines().len(), 1);
        assert_eq!(committed.lines()[0].quantity, 3);
        assert_eq!(committed.lines()[0].unit_price, Money::from_cents(30_000));
        assert_eq!(store.get(id).unwrap().unwrap().stock(), 7);
    }

    #[test]
    fn shortfall_on_any_line_commits_nothing() {
        let (store, engine) = setup();
        let a = seed(&store, 10, 10_000);
        let b = seed(&store, 2, 20_000);

        let request = ReservationRequest::new(vec![line(a, 5), line(b, 9_999)]).unwrap();
        let err = engine.commit(&request).unwrap_err();

        assert!(matches!(err, ReservationError::InsufficientStock(id) if id == b));
        assert_eq!(store.get(a).unwrap().unwrap().stock(), 10);
        assert_eq!(store.get(b).unwrap().unwrap().stock(), 2);
    }

    #[test]
    fn first_shortfall_in_submission_order_is_reported() {
        let (store, engine) = setup();
        let a = seed(&store, 0, 10_000);
        let b = seed(&store, 0, 20_000);

        let request = ReservationRequest::new(vec![line(b, 1), line(a, 1)]).unwrap();
        let err = engine.commit(&request).unwrap_err();
        assert!(matches!(err, ReservationError::InsufficientStock(id) if id == b));
    }

    #[test]
    fn disabled_listing_rejects_the_whole_request() {
        let (store, engine) = setup();
        let a = seed(&store, 5, 10_000);
        let b = seed(&store, 5, 10_000);
        let mut listing = store.get(b).unwrap().unwrap();
        listing.set_disabled(true);
        store.insert(listing).unwrap();

        let request = ReservationRequest::new(vec![line(a, 1), line(b, 1)]).unwrap();
        let err = engine.commit(&request).unwrap_err();
        assert!(matches!(err, ReservationError::ListingDisabled(id) if id == b));
        assert_eq!(store.get(a).unwrap().unwrap().stock(), 5);
    }

    #[test]
    fn unknown_listing_rejects_the_whole_request() {
        let (store, engine) = setup();
        let a = seed(&store, 5, 10_000);
        let ghost = ListingId::new();

        let request = ReservationRequest::new(vec![line(a, 1), line(ghost, 1)]).unwrap();
        let err = engine.commit(&request).unwrap_err();
        assert!(matches!(err, ReservationError::ListingNotFound(id) if id == ghost));
        assert_eq!(store.get(a).unwrap().unwrap().stock(), 5);
    }

    #[test]
    fn release_restores_committed_stock() {
        let (store, engine) = setup();
        let id = seed(&store, 4, 15_000);

        let request = ReservationRequest::new(vec![line(id, 4)]).unwrap();
        let committed = engine.commit(&request).unwrap();
        assert_eq!(store.get(id).unwrap().unwrap().stock(), 0);

        engine.release(&committed).unwrap();
        assert_eq!(store.get(id).unwrap().unwrap().stock(), 4);
    }

    #[test]
    fn storage_fault_mid_commit_leaves_no_partial_effect() {
        let (store, engine) = setup();
        let a = seed(&store, 10, 10_000);
        let b = seed(&store, 10, 20_000);

        // First save (line A) succeeds, second save (line B) fails.
        store.fail_on_save(2);
        let request = ReservationRequest::new(vec![line(a, 2), line(b, 2)]).unwrap();
        let err = engine.commit(&request).unwrap_err();
        assert!(err.is_transient());

        store.fail_on_save(0);
        assert_eq!(store.get(a).unwrap().unwrap().stock(), 10);
        assert_eq!(store.get(b).unwrap().unwrap().stock(), 10);
    }

    #[test]
    fn racing_commits_for_the_last_unit_admit_exactly_one() {
        let (store, engine) = setup();
        let id = seed(&store, 1, 10_000);
        let engine = Arc::new(engine);

        let mut handles = Vec::new();
        for _ in 0..16 {
            let engine = engine.clone();
            handles.push(std::thread::spawn(move || {
                let request = ReservationRequest::new(vec![line(id, 1)]).unwrap();
                match engine.commit(&request) {
                    Ok(committed) => {
                        // Keep it committed; the winner's stock stays taken.
                        let _ = committed.lines();
                        true
                    }
                    Err(ReservationError::InsufficientStock(_)) => false,
                    Err(other) => panic!("unexpected error: {other:?}"),
                }
            }));
        }

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(store.get(id).unwrap().unwrap().stock(), 0);
    }

    #[test]
    fn overlapping_multi_line_requests_never_oversell() {
        let (store, engine) = setup();
        let a = seed(&store, 5, 10_000);
        let b = seed(&store, 5, 10_000);
        let engine = Arc::new(engine);

        // Opposite submission orders force opposite lock-want orders.
        let mut handles = Vec::new();
        for i in 0..8 {
            let engine = engine.clone();
            handles.push(std::thread::spawn(move || {
                let lines = if i % 2 == 0 {
                    vec![line(a, 1), line(b, 1)]
                } else {
                    vec![line(b, 1), line(a, 1)]
                };
                let request = ReservationRequest::new(lines).unwrap();
                engine.commit(&request).is_ok()
            }));
        }

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        // 5 units of each, one of each per winning request.
        assert_eq!(wins, 5);
        assert_eq!(store.get(a).unwrap().unwrap().stock(), 0);
        assert_eq!(store.get(b).unwrap().unwrap().stock(), 0);
    }
}
