use serde::{Deserialize, Serialize};

use remarket_core::{ListingId, Money};

/// One cart line joined with its listing's display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartViewLine {
    pub listing_id: ListingId,
    pub title: String,
    pub unit_price: Money,
    pub stock: u32,
    pub quantity: u32,
    pub subtotal: Money,
}

/// A cart rendered for display: per-line subtotals plus cart totals.
///
/// Prices here are informational; the binding price is captured by the
/// reservation engine at checkout time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartView {
    pub lines: Vec<CartViewLine>,
    pub total_quantity: u32,
    pub total_price: Money,
}

impl CartView {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            total_quantity: 0,
            total_price: Money::ZERO,
        }
    }
}
