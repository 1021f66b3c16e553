use thiserror::Error;

use remarket_core::{DomainError, OrderId, StoreError};

use crate::order::{NewOrder, Order, OrderStatus};

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed order shape (zero lines, non-positive total). The
    /// `NewOrder` constructor makes this unreachable for well-behaved
    /// callers; the ledger still refuses to store one.
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("order {0} not found")]
    NotFound(OrderId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Durable, write-once order ledger.
///
/// `persist` assigns the order its immutable identity, `pending` status and
/// creation timestamp, exactly once per successful checkout attempt. A
/// failed `persist` must leave no order behind: the orchestrator decides
/// whether to compensate the reservation based on that guarantee.
pub trait OrderLedger: Send + Sync {
    fn persist(&self, new_order: NewOrder) -> Result<Order, LedgerError>;

    fn order(&self, id: OrderId) -> Result<Option<Order>, LedgerError>;

    fn status(&self, id: OrderId) -> Result<Option<OrderStatus>, LedgerError>;

    /// Status transition used by external fulfillment, never by checkout.
    /// Only `pending → completed` and `pending → canceled` are legal.
    fn transition(&self, id: OrderId, next: OrderStatus) -> Result<Order, LedgerError>;
}
