//! Fault-injection wrappers around the store traits.
//!
//! Used by the integration tests to fail a specific storage call at a
//! specific point in a checkout attempt (the compensation and
//! no-partial-effect properties are unobservable otherwise). Each wrapper
//! delegates to its inner store until armed.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use remarket_carts::{Cart, CartStore};
use remarket_catalog::{Listing, ListingStore};
use remarket_checkout::{AuditLogEntry, AuditSink, NotificationEvent, NotificationSink};
use remarket_core::{BuyerId, ListingId, OrderId, StoreError, StoreResult};
use remarket_orders::{LedgerError, NewOrder, Order, OrderLedger, OrderStatus};

/// Listing store that starts failing `save` after a configured number of
/// successful saves.
pub struct FlakyListingStore {
    inner: Arc<dyn ListingStore>,
    // Remaining save budget; -1 means fault injection is disabled.
    saves_until_failure: AtomicI64,
}

impl FlakyListingStore {
    pub fn new(inner: Arc<dyn ListingStore>) -> Self {
        Self {
            inner,
            saves_until_failure: AtomicI64::new(-1),
        }
    }

    /// Let `n` more saves through, then fail every save until healed.
    pub fn fail_after_saves(&self, n: u64) {
        self.saves_until_failure.store(n as i64, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.saves_until_failure.store(-1, Ordering::SeqCst);
    }
}

impl ListingStore for FlakyListingStore {
    fn get(&self, id: ListingId) -> StoreResult<Option<Listing>> {
        self.inner.get(id)
    }

    fn insert(&self, listing: Listing) -> StoreResult<()> {
        self.inner.insert(listing)
    }

    fn save(&self, listing: Listing) -> StoreResult<()> {
        let budget = self.saves_until_failure.fetch_update(
            Ordering::SeqCst,
            Ordering::SeqCst,
            |v| if v > 0 { Some(v - 1) } else { None },
        );
        match budget {
            Ok(_) | Err(-1) => self.inner.save(listing),
            Err(_) => Err(StoreError::transient("injected listing save failure")),
        }
    }
}

/// Order ledger whose next `persist` fails once.
pub struct FlakyOrderLedger {
    inner: Arc<dyn OrderLedger>,
    fail_next_persist: AtomicBool,
}

impl FlakyOrderLedger {
    pub fn new(inner: Arc<dyn OrderLedger>) -> Self {
        Self {
            inner,
            fail_next_persist: AtomicBool::new(false),
        }
    }

    pub fn fail_next_persist(&self) {
        self.fail_next_persist.store(true, Ordering::SeqCst);
    }
}

impl OrderLedger for FlakyOrderLedger {
    fn persist(&self, new_order: NewOrder) -> Result<Order, LedgerError> {
        if self.fail_next_persist.swap(false, Ordering::SeqCst) {
            return Err(LedgerError::Store(StoreError::transient(
                "injected order persist failure",
            )));
        }
        self.inner.persist(new_order)
    }

    fn order(&self, id: OrderId) -> Result<Option<Order>, LedgerError> {
        self.inner.order(id)
    }

    fn status(&self, id: OrderId) -> Result<Option<OrderStatus>, LedgerError> {
        self.inner.status(id)
    }

    fn transition(&self, id: OrderId, next: OrderStatus) -> Result<Order, LedgerError> {
        self.inner.transition(id, next)
    }
}

/// Cart store whose next `clear` fails once.
pub struct FlakyCartStore {
    inner: Arc<dyn CartStore>,
    fail_next_clear: AtomicBool,
}

impl FlakyCartStore {
    pub fn new(inner: Arc<dyn CartStore>) -> Self {
        Self {
            inner,
            fail_next_clear: AtomicBool::new(false),
        }
    }

    pub fn fail_next_clear(&self) {
        self.fail_next_clear.store(true, Ordering::SeqCst);
    }
}

impl CartStore for FlakyCartStore {
    fn get(&self, buyer: BuyerId) -> StoreResult<Option<Cart>> {
        self.inner.get(buyer)
    }

    fn save(&self, cart: Cart) -> StoreResult<()> {
        self.inner.save(cart)
    }

    fn clear(&self, buyer: BuyerId) -> StoreResult<()> {
        if self.fail_next_clear.swap(false, Ordering::SeqCst) {
            return Err(StoreError::transient("injected cart clear failure"));
        }
        self.inner.clear(buyer)
    }
}

/// Audit sink that always fails.
#[derive(Debug, Default)]
pub struct FailingAuditSink;

impl AuditSink for FailingAuditSink {
    fn record(&self, _entry: AuditLogEntry) -> StoreResult<()> {
        Err(StoreError::transient("audit sink unavailable"))
    }
}

/// Notification sink that always fails.
#[derive(Debug, Default)]
pub struct FailingNotificationSink;

impl NotificationSink for FailingNotificationSink {
    fn emit(&self, _event: NotificationEvent) -> StoreResult<()> {
        Err(StoreError::transient("notification sink unavailable"))
    }
}
