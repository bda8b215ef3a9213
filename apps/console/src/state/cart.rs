//! # Cart State
//!
//! Shared cart store persisted to local storage.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Pages and dialogs all reach the same cart
//! 2. Only one action should modify the cart at a time
//! 3. The persisted copy must match the order of mutations
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Action                   Store method            Persisted?            │
//! │  ──────                   ────────────            ──────────            │
//! │                                                                         │
//! │  Add to cart ────────────► add() ───────────────► yes                  │
//! │  Change quantity ────────► update_quantity() ───► yes                  │
//! │  Remove line ────────────► remove() ────────────► yes                  │
//! │  Clear / checkout ───────► clear() ─────────────► yes                  │
//! │  Open drawer ────────────► toggle()/open() ─────► no                   │
//! │                                                                         │
//! │  NOTE: the lock is held until the write has finished.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use appliance_core::cart::{Cart, CartItem, CartTotals};
use appliance_core::Appliance;
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::storage::{LocalStorage, KEY_CART};

#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
    storage: LocalStorage,
}

impl CartState {
    /// Restores the persisted lines.
    pub fn restore(storage: LocalStorage) -> Self {
        let items: Vec<CartItem> = storage.get(KEY_CART).unwrap_or_default();
        let cart = Cart::from_items(items);
        debug!(lines = cart.line_count(), "Cart restored");
        CartState {
            cart: Arc::new(Mutex::new(cart)),
            storage,
        }
    }

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        f(&self.lock())
    }

    /// Runs a cart mutation and persists the lines when it succeeds.
    fn mutate<F, R>(&self, f: F) -> AppResult<R>
    where
        F: FnOnce(&mut Cart) -> appliance_core::CoreResult<R>,
    {
        let mut cart = self.lock();
        let result = f(&mut cart)?;
        self.storage.set(KEY_CART, cart.items())?;
        Ok(result)
    }

    pub fn add(&self, appliance: Appliance) -> AppResult<()> {
        let id = appliance.id;
        self.mutate(|cart| cart.add(appliance))?;
        debug!(appliance_id = id, "Added to cart");
        Ok(())
    }

    pub fn add_item(&self, appliance: Appliance, quantity: i64) -> AppResult<()> {
        self.mutate(|cart| cart.add_item(appliance, quantity))
    }

    /// Sets a line's quantity; zero or less removes the line.
    pub fn update_quantity(&self, appliance_id: i64, quantity: i64) -> AppResult<()> {
        self.mutate(|cart| cart.update_quantity(appliance_id, quantity))
    }

    pub fn remove(&self, appliance_id: i64) -> AppResult<bool> {
        self.mutate(|cart| Ok(cart.remove(appliance_id)))
    }

    pub fn clear(&self) -> AppResult<()> {
        self.mutate(|cart| {
            cart.clear();
            Ok(())
        })
    }

    /// Clears the lines, logging instead of failing when storage is down.
    pub fn reset(&self) {
        if let Err(e) = self.clear() {
            warn!(error = %e, "Failed to persist cleared cart");
        }
    }

    pub fn toggle(&self) {
        self.lock().toggle();
    }

    pub fn open(&self) {
        self.lock().open();
    }

    pub fn close(&self) {
        self.lock().close();
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_open()
    }

    pub fn items(&self) -> Vec<CartItem> {
        self.lock().items().to_vec()
    }

    pub fn totals(&self) -> CartTotals {
        CartTotals::from(&*self.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use appliance_core::{Category, Money, PowerType};

    pub(crate) fn appliance(id: i64, price_cents: i64) -> Appliance {
        Appliance {
            id,
            name: format!("Appliance {}", id),
            category: Category::Big,
            model: format!("M-{}", id),
            manufacturer: None,
            manufacturer_id: Some(1),
            power_type: PowerType::Ac220,
            characteristic: None,
            description: None,
            power: Some(1000),
            price: Money::from_cents(price_cents),
        }
    }

    #[test]
    fn test_every_change_is_persisted() {
        let storage = LocalStorage::in_memory();
        let cart = CartState::restore(storage.clone());

        cart.add(appliance(1, 10_000)).unwrap();
        cart.add(appliance(1, 10_000)).unwrap();
        cart.add(appliance(2, 2_500)).unwrap();

        let stored: Vec<CartItem> = storage.get(KEY_CART).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].quantity, 2);

        cart.update_quantity(2, 0).unwrap();
        let stored: Vec<CartItem> = storage.get(KEY_CART).unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn test_restore_reads_persisted_lines() {
        let storage = LocalStorage::in_memory();
        let cart = CartState::restore(storage.clone());
        cart.add_item(appliance(1, 10_000), 3).unwrap();

        let restored = CartState::restore(storage);
        assert_eq!(restored.totals().item_count, 3);
        assert_eq!(restored.totals().total, Money::from_cents(30_000));
    }

    #[test]
    fn test_failed_mutation_keeps_storage() {
        let storage = LocalStorage::in_memory();
        let cart = CartState::restore(storage.clone());
        cart.add(appliance(1, 100)).unwrap();

        assert!(cart.add_item(appliance(2, 100), 0).is_err());
        let stored: Vec<CartItem> = storage.get(KEY_CART).unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn test_drawer_is_not_persisted() {
        let storage = LocalStorage::in_memory();
        let cart = CartState::restore(storage.clone());
        cart.toggle();
        assert!(cart.is_open());
        assert!(!storage.contains(KEY_CART));

        let restored = CartState::restore(storage);
        assert!(!restored.is_open());
    }
}
