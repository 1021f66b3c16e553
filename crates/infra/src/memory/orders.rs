use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use remarket_core::{OrderId, StoreError};
use remarket_orders::{LedgerError, NewOrder, Order, OrderLedger, OrderStatus};

/// In-memory order ledger.
///
/// Assigns identity/timestamp at persist time and holds orders immutably
/// thereafter; `transition` re-inserts a changed copy under the write lock
/// so status updates are atomic per order.
#[derive(Debug, Default)]
pub struct InMemoryOrderLedger {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All persisted orders, unordered. Test/reporting convenience.
    pub fn all(&self) -> Vec<Order> {
        self.orders
            .read()
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl OrderLedger for InMemoryOrderLedger {
    fn persist(&self, new_order: NewOrder) -> Result<Order, LedgerError> {
        let order = Order::from_new(OrderId::new(), new_order, Utc::now());
        let mut orders = self
            .orders
            .write()
            .map_err(|_| StoreError::unavailable("order ledger lock poisoned"))
            .map_err(LedgerError::Store)?;
        orders.insert(order.id(), order.clone());
        Ok(order)
    }

    fn order(&self, id: OrderId) -> Result<Option<Order>, LedgerError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| StoreError::unavailable("order ledger lock poisoned"))
            .map_err(LedgerError::Store)?;
        Ok(orders.get(&id).cloned())
    }

    fn status(&self, id: OrderId) -> Result<Option<OrderStatus>, LedgerError> {
        Ok(self.order(id)?.map(|o| o.status()))
    }

    fn transition(&self, id: OrderId, next: OrderStatus) -> Result<Order, LedgerError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| StoreError::unavailable("order ledger lock poisoned"))
            .map_err(LedgerError::Store)?;
        let order = orders.get_mut(&id).ok_or(LedgerError::NotFound(id))?;
        order.transition(next)?;
        Ok(order.clone())
    }
}
