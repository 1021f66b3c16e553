use std::collections::HashMap;
use std::sync::RwLock;

use remarket_carts::{Cart, CartStore};
use remarket_core::{BuyerId, StoreError, StoreResult};

/// In-memory cart store, one record per buyer.
///
/// Writes replace the whole cart under the write lock, so a `get` after a
/// committed `save` always observes it (the read-your-writes requirement
/// the orchestrator depends on).
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
    carts: RwLock<HashMap<BuyerId, Cart>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStore for InMemoryCartStore {
    fn get(&self, buyer: BuyerId) -> StoreResult<Option<Cart>> {
        let carts = self
            .carts
            .read()
            .map_err(|_| StoreError::unavailable("cart store lock poisoned"))?;
        Ok(carts.get(&buyer).cloned())
    }

    fn save(&self, cart: Cart) -> StoreResult<()> {
        let mut carts = self
            .carts
            .write()
            .map_err(|_| StoreError::unavailable("cart store lock poisoned"))?;
        carts.insert(cart.buyer(), cart);
        Ok(())
    }

    fn clear(&self, buyer: BuyerId) -> StoreResult<()> {
        let mut carts = self
            .carts
            .write()
            .map_err(|_| StoreError::unavailable("cart store lock poisoned"))?;
        carts.remove(&buyer);
        Ok(())
    }
}
