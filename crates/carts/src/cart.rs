use serde::{Deserialize, Serialize};

use remarket_core::{BuyerId, DomainError, DomainResult, ListingId};

/// One desired (listing, quantity) pair. Quantity is always >= 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub listing_id: ListingId,
    pub quantity: u32,
}

/// A buyer's cart: an ordered collection of lines, one per listing.
///
/// Created lazily on first add; an empty cart still exists until checkout
/// clears it (removing the last line does not delete the cart).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    buyer: BuyerId,
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new(buyer: BuyerId) -> Self {
        Self {
            buyer,
            lines: Vec::new(),
        }
    }

    pub fn buyer(&self) -> BuyerId {
        self.buyer
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, listing_id: ListingId) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.listing_id == listing_id)
    }

    /// Add `quantity` units of a listing. Re-adding a listing already in
    /// the cart merges into the existing line; insertion order of first
    /// adds is preserved.
    pub fn add(&mut self, listing_id: ListingId, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        if let Some(line) = self.lines.iter_mut().find(|l| l.listing_id == listing_id) {
            line.quantity = line
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| DomainError::invariant("cart quantity overflowed"))?;
        } else {
            self.lines.push(CartLine {
                listing_id,
                quantity,
            });
        }
        Ok(())
    }

    /// Replace the quantity of an existing line.
    pub fn update_quantity(&mut self, listing_id: ListingId, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation(
                "quantity must be greater than zero",
            ));
        }
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.listing_id == listing_id)
            .ok_or_else(DomainError::not_found)?;
        line.quantity = quantity;
        Ok(())
    }

    /// Remove a line entirely. The cart may become empty but keeps existing.
    pub fn remove(&mut self, listing_id: ListingId) -> DomainResult<()> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.listing_id == listing_id)
            .ok_or_else(DomainError::not_found)?;
        self.lines.remove(idx);
        Ok(())
    }
}
