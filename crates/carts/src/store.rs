use remarket_core::{BuyerId, StoreResult};

use crate::cart::Cart;

/// Durable store of carts, one per buyer.
///
/// Reads must reflect the most recently committed `save` for that buyer:
/// the checkout orchestrator reserves stock based on what `get` returns,
/// so a stale read here turns directly into a wrong reservation.
pub trait CartStore: Send + Sync {
    /// Fetch the buyer's cart, or `None` if the buyer never added anything
    /// (or checkout already cleared it).
    fn get(&self, buyer: BuyerId) -> StoreResult<Option<Cart>>;

    /// Create or replace the buyer's cart.
    fn save(&self, cart: Cart) -> StoreResult<()>;

    /// Delete the buyer's cart record. Deleting an absent cart is a no-op.
    fn clear(&self, buyer: BuyerId) -> StoreResult<()>;
}
