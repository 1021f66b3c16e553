//! Audit and notification sinks.
//!
//! External collaborators consumed by checkout. Both are best-effort: a
//! sink failure is recorded but never rolls back or blocks an order that
//! already exists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use remarket_core::{BuyerId, Money, OrderId, StoreResult};
use remarket_orders::OrderLine;

/// Write-once durable sales-log record, one per completed checkout.
///
/// Deliberately denormalized: reporting reads this copy, not the order,
/// and the two have independent lifecycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub buyer: BuyerId,
    pub order_id: OrderId,
    pub total: Money,
    pub lines: Vec<OrderLine>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Order,
    Review,
    Message,
}

/// Fire-and-forget operational event (back-office notification feed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub kind: NotificationKind,
    pub message: String,
    pub order_id: Option<OrderId>,
    pub created_at: DateTime<Utc>,
}

/// Durable sales log consumed by admin reporting.
pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditLogEntry) -> StoreResult<()>;
}

/// Operational event emission (admin notification feed, email fan-out).
pub trait NotificationSink: Send + Sync {
    fn emit(&self, event: NotificationEvent) -> StoreResult<()>;
}
