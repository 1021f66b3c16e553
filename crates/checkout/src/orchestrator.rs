use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, info_span, warn};

use remarket_carts::CartStore;
use remarket_core::{BuyerId, OrderId};
use remarket_orders::{NewOrder, Order, OrderLedger, OrderLine, OrderStatus};
use remarket_reservation::{
    CommittedReservation, RequestLine, ReservationEngine, ReservationRequest,
};

use crate::error::CheckoutError;
use crate::sink::{AuditLogEntry, AuditSink, NotificationEvent, NotificationKind, NotificationSink};

/// Per-attempt state machine. Transitions are logged; failure exits are
/// taken at the stage where the failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    CartLoaded,
    Reserved,
    OrderPersisted,
    CartCleared,
    Logged,
    Done,
}

/// Result of a successful checkout.
///
/// `cart_cleared` is `false` when the order stands but the cart record
/// could not be deleted: a correctness nuisance the caller may retry, not
/// a data-integrity violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOutcome {
    pub order: Order,
    pub cart_cleared: bool,
}

/// Sequences one buyer's cart through reservation, order persistence and
/// the trailing side effects.
///
/// Ordering discipline per attempt:
/// cart read → reservation commit → order persist → cart clear → audit/notify.
/// A failure between reservation commit and order persistence is the one
/// hazard that mutates durable state without a record of why, so that
/// window — and only that window — triggers compensation
/// ([`ReservationEngine::release`]). An attempt abandoned in that window
/// (timeout, shutdown) must take the same path before reporting.
pub struct CheckoutOrchestrator {
    carts: Arc<dyn CartStore>,
    reservations: Arc<ReservationEngine>,
    ledger: Arc<dyn OrderLedger>,
    audit: Arc<dyn AuditSink>,
    notifications: Arc<dyn NotificationSink>,
}

impl CheckoutOrchestrator {
    pub fn new(
        carts: Arc<dyn CartStore>,
        reservations: Arc<ReservationEngine>,
        ledger: Arc<dyn OrderLedger>,
        audit: Arc<dyn AuditSink>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            carts,
            reservations,
            ledger,
            audit,
            notifications,
        }
    }

    /// Turn the buyer's cart into a persisted order.
    ///
    /// The buyer id arrives already authenticated; identity resolution is
    /// an upstream concern.
    pub fn checkout(&self, buyer: BuyerId) -> Result<CheckoutOutcome, CheckoutError> {
        let span = info_span!("checkout", %buyer);
        let _guard = span.enter();

        let cart = self
            .carts
            .get(buyer)?
            .filter(|cart| !cart.is_empty())
            .ok_or(CheckoutError::EmptyCart)?;
        debug!(stage = ?Stage::CartLoaded, lines = cart.lines().len());

        let request = ReservationRequest::new(
            cart.lines()
                .iter()
                .map(|l| RequestLine {
                    listing_id: l.listing_id,
                    quantity: l.quantity,
                })
                .collect(),
        )?;

        let reservation = self.reservations.commit(&request)?;
        debug!(stage = ?Stage::Reserved);

        let order = match self.persist_order(buyer, &reservation) {
            Ok(order) => order,
            Err(cause) => return Err(self.compensate(reservation, cause)),
        };
        debug!(stage = ?Stage::OrderPersisted, order_id = %order.id());

        // Best-effort relative to the order: a stale cart is retryable,
        // the order is not rolled back for it.
        let cart_cleared = match self.carts.clear(buyer) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, order_id = %order.id(), "cart clear failed after order persistence");
                false
            }
        };
        debug!(stage = ?Stage::CartCleared, cart_cleared);

        self.log_and_notify(&order);
        debug!(stage = ?Stage::Logged);

        info!(stage = ?Stage::Done, order_id = %order.id(), total = %order.total(), "checkout complete");
        Ok(CheckoutOutcome {
            order,
            cart_cleared,
        })
    }

    /// Order lookup for downstream fulfillment and reporting.
    pub fn order(&self, id: OrderId) -> Result<Option<Order>, CheckoutError> {
        Ok(self.ledger.order(id)?)
    }

    /// Order status lookup for downstream fulfillment and reporting.
    pub fn order_status(&self, id: OrderId) -> Result<Option<OrderStatus>, CheckoutError> {
        Ok(self.ledger.status(id)?)
    }

    fn persist_order(
        &self,
        buyer: BuyerId,
        reservation: &CommittedReservation,
    ) -> Result<Order, CheckoutError> {
        let lines: Vec<OrderLine> = reservation
            .lines()
            .iter()
            .map(|l| OrderLine {
                listing_id: l.listing_id,
                quantity: l.quantity,
                // Frozen at reservation time; never re-read from the listing.
                unit_price: l.unit_price,
            })
            .collect();
        let new_order = NewOrder::new(buyer, lines)?;
        Ok(self.ledger.persist(new_order)?)
    }

    /// Undo a committed reservation whose order never reached the ledger.
    ///
    /// Returns the error the caller should surface: the original cause if
    /// the release went through (retry is then safe), or a
    /// `ConsistencyFault` carrying the orphaned reservation if it did not.
    fn compensate(
        &self,
        reservation: CommittedReservation,
        cause: CheckoutError,
    ) -> CheckoutError {
        warn!(error = %cause, "order persistence failed after reservation commit; releasing stock");
        match self.reservations.release(&reservation) {
            Ok(()) => cause,
            Err(release_err) => {
                error!(
                    error = %release_err,
                    original = %cause,
                    "compensation failed: stock decremented with no order on record"
                );
                CheckoutError::ConsistencyFault {
                    reservation,
                    cause: format!("{cause}; release failed: {release_err}"),
                }
            }
        }
    }

    /// Fire-and-forget tail: audit log and notification. Failures are
    /// recorded and dropped; the order already stands.
    fn log_and_notify(&self, order: &Order) {
        let entry = AuditLogEntry {
            buyer: order.buyer(),
            order_id: order.id(),
            total: order.total(),
            lines: order.lines().to_vec(),
            timestamp: Utc::now(),
        };
        if let Err(e) = self.audit.record(entry) {
            warn!(error = %e, order_id = %order.id(), "audit log write failed");
        }

        let event = NotificationEvent {
            kind: NotificationKind::Order,
            message: format!("New order {} placed (${})", order.id(), order.total()),
            order_id: Some(order.id()),
            created_at: Utc::now(),
        };
        if let Err(e) = self.notifications.emit(event) {
            warn!(error = %e, order_id = %order.id(), "notification emission failed");
        }
    }
}
