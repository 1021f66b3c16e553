use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use remarket_core::{BuyerId, DomainError, DomainResult, ListingId, Money, OrderId};

/// Order status lifecycle. `Pending` is the only state the checkout core
/// ever writes; fulfillment moves orders onward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Canceled,
}

impl OrderStatus {
    /// Permitted transitions: `pending → completed` and `pending → canceled`.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Completed)
                | (OrderStatus::Pending, OrderStatus::Canceled)
        )
    }
}

/// One purchased line. `unit_price` is the price captured at reservation
/// time, never re-read from the listing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub listing_id: ListingId,
    pub quantity: u32,
    pub unit_price: Money,
}

impl OrderLine {
    pub fn subtotal(&self) -> DomainResult<Money> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// A validated, not-yet-persisted order. Construction computes the total
/// and rejects malformed shapes, so the ledger never stores one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    buyer: BuyerId,
    lines: Vec<OrderLine>,
    total: Money,
}

impl NewOrder {
    pub fn new(buyer: BuyerId, lines: Vec<OrderLine>) -> DomainResult<Self> {
        if lines.is_empty() {
            return Err(DomainError::validation("order must have at least one line"));
        }
        let mut total = Money::ZERO;
        for line in &lines {
            if line.quantity == 0 {
                return Err(DomainError::validation("line quantity must be positive"));
            }
            if line.unit_price.is_zero() {
                return Err(DomainError::validation("line unit_price must be positive"));
            }
            total = total.checked_add(line.subtotal()?)?;
        }
        if total.is_zero() {
            return Err(DomainError::validation("order total must be positive"));
        }
        Ok(Self {
            buyer,
            lines,
            total,
        })
    }

    pub fn buyer(&self) -> BuyerId {
        self.buyer
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn total(&self) -> Money {
        self.total
    }
}

/// A persisted order. Immutable to this core except for status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    buyer: BuyerId,
    lines: Vec<OrderLine>,
    total: Money,
    status: OrderStatus,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Seal a validated `NewOrder` under a fresh identity. Ledger use only.
    pub fn from_new(id: OrderId, new_order: NewOrder, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            buyer: new_order.buyer,
            lines: new_order.lines,
            total: new_order.total,
            status: OrderStatus::Pending,
            created_at,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn buyer(&self) -> BuyerId {
        self.buyer
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn total(&self) -> Money {
        self.total
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply a status transition, enforcing the lifecycle rules.
    pub fn transition(&mut self, next: OrderStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::conflict(format!(
                "illegal status transition {:?} -> {:?}",
                self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }
}
