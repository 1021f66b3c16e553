use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use remarket_catalog::ListingStore;
use remarket_core::{BuyerId, DomainError, ListingId, Money, StoreError};

use crate::cart::Cart;
use crate::store::CartStore;
use crate::view::{CartView, CartViewLine};

#[derive(Debug, Error)]
pub enum CartError {
    #[error("listing {0} not found")]
    ListingNotFound(ListingId),

    /// Courtesy precheck only: the authoritative stock gate is reservation
    /// commit at checkout time.
    #[error("not enough stock available for listing {0}")]
    NotEnoughStock(ListingId),

    #[error("cart not found")]
    CartNotFound,

    #[error("item not found in cart")]
    LineNotFound,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Cart operations exposed to the web layer.
///
/// Wraps the `CartStore` with the listing lookups the original flows do:
/// stock prechecks on add/update and display joins for the cart view.
/// Never writes to listings.
pub struct CartService {
    carts: Arc<dyn CartStore>,
    listings: Arc<dyn ListingStore>,
}

impl CartService {
    pub fn new(carts: Arc<dyn CartStore>, listings: Arc<dyn ListingStore>) -> Self {
        Self { carts, listings }
    }

    /// Add `quantity` units of a listing to the buyer's cart, creating the
    /// cart lazily on first add. Merges into an existing line.
    pub fn add(&self, buyer: BuyerId, listing_id: ListingId, quantity: u32) -> Result<(), CartError> {
        let listing = self
            .listings
            .get(listing_id)?
            .ok_or(CartError::ListingNotFound(listing_id))?;
        if !listing.can_fulfill(quantity) {
            return Err(CartError::NotEnoughStock(listing_id));
        }

        let mut cart = self
            .carts
            .get(buyer)?
            .unwrap_or_else(|| Cart::new(buyer));
        cart.add(listing_id, quantity)?;
        self.carts.save(cart)?;
        debug!(%buyer, %listing_id, quantity, "added to cart");
        Ok(())
    }

    /// Replace the quantity of a line already in the cart.
    pub fn update_quantity(
        &self,
        buyer: BuyerId,
        listing_id: ListingId,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::Domain(DomainError::validation(
                "quantity must be greater than zero",
            )));
        }
        let mut cart = self.carts.get(buyer)?.ok_or(CartError::CartNotFound)?;
        if cart.line(listing_id).is_none() {
            return Err(CartError::LineNotFound);
        }

        let listing = self
            .listings
            .get(listing_id)?
            .ok_or(CartError::ListingNotFound(listing_id))?;
        if !listing.can_fulfill(quantity) {
            return Err(CartError::NotEnoughStock(listing_id));
        }

        cart.update_quantity(listing_id, quantity)?;
        self.carts.save(cart)?;
        Ok(())
    }

    /// Remove a line from the cart. The emptied cart keeps existing.
    pub fn remove(&self, buyer: BuyerId, listing_id: ListingId) -> Result<(), CartError> {
        let mut cart = self.carts.get(buyer)?.ok_or(CartError::CartNotFound)?;
        match cart.remove(listing_id) {
            Ok(()) => {}
            Err(DomainError::NotFound) => return Err(CartError::LineNotFound),
            Err(e) => return Err(e.into()),
        }
        self.carts.save(cart)?;
        Ok(())
    }

    /// Render the buyer's cart with per-line subtotals and totals.
    ///
    /// Lines whose listing has since disappeared are omitted from the view;
    /// they still fail checkout properly if left in the cart.
    pub fn view(&self, buyer: BuyerId) -> Result<CartView, CartError> {
        let Some(cart) = self.carts.get(buyer)? else {
            return Ok(CartView::empty());
        };

        let mut lines = Vec::with_capacity(cart.lines().len());
        let mut total_quantity: u32 = 0;
        let mut total_price = Money::ZERO;
        for line in cart.lines() {
            let Some(listing) = self.listings.get(line.listing_id)? else {
                continue;
            };
            let subtotal = listing.unit_price().checked_mul(line.quantity)?;
            total_quantity = total_quantity.saturating_add(line.quantity);
            total_price = total_price.checked_add(subtotal)?;
            lines.push(CartViewLine {
                listing_id: line.listing_id,
                title: listing.title().to_string(),
                unit_price: listing.unit_price(),
                stock: listing.stock(),
                quantity: line.quantity,
                subtotal,
            });
        }

        Ok(CartView {
            lines,
            total_quantity,
            total_price,
        })
    }
}
