use serde::{Deserialize, Serialize};

use remarket_core::{DomainError, DomainResult, ListingId, Money};

/// One used phone offered for sale.
///
/// `stock` is a `u32`, so a negative stock level is unrepresentable; the
/// reservation engine is the only writer allowed to change it (see
/// [`crate::store::ListingStore::save`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    id: ListingId,
    title: String,
    brand: String,
    seller: String,
    unit_price: Money,
    stock: u32,
    disabled: bool,
}

impl Listing {
    pub fn new(
        id: ListingId,
        title: impl Into<String>,
        brand: impl Into<String>,
        seller: impl Into<String>,
        unit_price: Money,
        stock: u32,
    ) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        if unit_price.is_zero() {
            return Err(DomainError::validation("unit_price must be positive"));
        }
        Ok(Self {
            id,
            title,
            brand: brand.into(),
            seller: seller.into(),
            unit_price,
            stock,
            disabled: false,
        })
    }

    pub fn id(&self) -> ListingId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn seller(&self) -> &str {
        &self.seller
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether `quantity` units could be taken from current stock.
    pub fn can_fulfill(&self, quantity: u32) -> bool {
        !self.disabled && self.stock >= quantity
    }

    /// Re-price the listing. Placed orders are unaffected: order lines carry
    /// the price captured at reservation time.
    pub fn set_unit_price(&mut self, unit_price: Money) -> DomainResult<()> {
        if unit_price.is_zero() {
            return Err(DomainError::validation("unit_price must be positive"));
        }
        self.unit_price = unit_price;
        Ok(())
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Take `quantity` units out of stock.
    ///
    /// Only the reservation engine calls this, under the per-listing lock.
    pub fn decrement_stock(&mut self, quantity: u32) -> DomainResult<()> {
        let remaining = self
            .stock
            .checked_sub(quantity)
            .ok_or_else(|| DomainError::invariant("stock cannot go negative"))?;
        self.stock = remaining;
        Ok(())
    }

    /// Return `quantity` units to stock (reservation release).
    pub fn restore_stock(&mut self, quantity: u32) -> DomainResult<()> {
        let restored = self
            .stock
            .checked_add(quantity)
            .ok_or_else(|| DomainError::invariant("stock counter overflowed"))?;
        self.stock = restored;
        Ok(())
    }
}
