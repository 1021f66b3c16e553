//! `remarket-orders` — the immutable order record and its ledger.
//!
//! An order is written exactly once per successful checkout. After that the
//! only permitted write is a status transition driven by fulfillment;
//! quantities, prices and the total are frozen at reservation time.

pub mod ledger;
pub mod order;

pub use ledger::{LedgerError, OrderLedger};
pub use order::{NewOrder, Order, OrderLine, OrderStatus};
