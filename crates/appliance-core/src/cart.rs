//! # Cart
//!
//! The client-side shopping cart.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  User Action              Reducer                  Lines                │
//! │  ───────────              ───────                  ─────                │
//! │                                                                         │
//! │  "Add to cart" ─────────► add() ────────────────► qty += 1 or push     │
//! │                                                                         │
//! │  Change quantity ───────► update_quantity() ────► qty = n (n ≤ 0: drop)│
//! │                                                                         │
//! │  Click remove ──────────► remove() ─────────────► filter out line      │
//! │                                                                         │
//! │  Checkout / logout ─────► clear() ──────────────► no lines             │
//! │                                                                         │
//! │  Checkout ──────────────► to_order_request() ───► one OrderRequest     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The reducer is pure; persisting the lines after each change is the
//! console's cart store's job.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Appliance, OrderRequest, OrderRowRequest};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// A cart line: an appliance snapshot and how many of it.
///
/// ## Price Freezing
/// The appliance is captured when first added; the displayed total keeps
/// using that price until checkout, where the backend re-derives amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub appliance: Appliance,
    pub quantity: i64,
}

impl CartItem {
    /// Price × quantity.
    pub fn subtotal(&self) -> Money {
        self.appliance.price.multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by appliance id (adding again increments)
/// - Every line has quantity ≥ 1 (dropping to 0 removes it)
/// - At most [`MAX_CART_ITEMS`] lines, each at most [`MAX_ITEM_QUANTITY`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    items: Vec<CartItem>,

    /// Whether the cart drawer is shown. Never persisted.
    #[serde(skip)]
    is_open: bool,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a cart from persisted lines, dropping any line that breaks
    /// the invariants and merging duplicates.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Cart::new();
        for item in items.into_iter().filter(|i| i.quantity >= 1) {
            let quantity = item.quantity.min(MAX_ITEM_QUANTITY);
            // A corrupt document may break the limits; keep what fits.
            let _ = cart.add_item(item.appliance, quantity);
        }
        cart
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Adds one unit of an appliance.
    pub fn add(&mut self, appliance: Appliance) -> CoreResult<()> {
        self.add_item(appliance, 1)
    }

    /// Adds an appliance or increases its quantity if already present.
    ///
    /// ## Returns
    /// - `Err(InvalidQuantity)` when `quantity < 1`
    /// - `Err(QuantityTooLarge)` when the line would pass the maximum
    /// - `Err(CartTooLarge)` when a new line would pass the line limit
    pub fn add_item(&mut self, appliance: Appliance, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            return Err(CoreError::InvalidQuantity(quantity));
        }

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.appliance.id == appliance.id)
        {
            let new_qty = item.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            item.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge { max: MAX_CART_ITEMS });
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        self.items.push(CartItem {
            appliance,
            quantity,
        });
        Ok(())
    }

    /// Removes the line for an appliance. Returns whether a line was removed.
    pub fn remove(&mut self, appliance_id: i64) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.appliance.id != appliance_id);
        self.items.len() != before
    }

    /// Replaces a line's quantity; zero or less removes the line.
    ///
    /// Unknown appliances are ignored, like a stale click on a line that
    /// was already removed.
    pub fn update_quantity(&mut self, appliance_id: i64, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove(appliance_id);
            return Ok(());
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.appliance.id == appliance_id)
        {
            item.quantity = quantity;
        }
        Ok(())
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    // =========================================================================
    // Drawer
    // =========================================================================

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    // =========================================================================
    // Totals
    // =========================================================================

    /// Σ price × quantity.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Σ quantity (the badge number).
    pub fn count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn quantity_of(&self, appliance_id: i64) -> Option<i64> {
        self.items
            .iter()
            .find(|i| i.appliance.id == appliance_id)
            .map(|i| i.quantity)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Converts the cart into one order-creation request for a client.
    ///
    /// Rows carry no `amount`; the backend prices them.
    pub fn to_order_request(&self, client_id: i64) -> CoreResult<OrderRequest> {
        if self.is_empty() {
            return Err(CoreError::EmptyOrder);
        }

        Ok(OrderRequest {
            client_id,
            order_rows: self
                .items
                .iter()
                .map(|i| OrderRowRequest {
                    appliance_id: i.appliance.id,
                    quantity: i.quantity,
                    amount: None,
                })
                .collect(),
        })
    }
}

/// Cart totals summary for presenters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub line_count: usize,
    pub item_count: i64,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            item_count: cart.count(),
            total: cart.total(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::{Category, Manufacturer, PowerType};

    pub(crate) fn appliance(id: i64, price_cents: i64) -> Appliance {
        Appliance {
            id,
            name: format!("Appliance {}", id),
            category: Category::Small,
            model: format!("M-{}", id),
            manufacturer: Some(Manufacturer {
                id: 1,
                name: "Acme".into(),
                address: "1 Main Street".into(),
                country: "US".into(),
            }),
            manufacturer_id: None,
            power_type: PowerType::Ac220,
            characteristic: None,
            description: None,
            power: None,
            price: Money::from_cents(price_cents),
        }
    }

    #[test]
    fn test_add_same_appliance_increments() {
        let mut cart = Cart::new();
        cart.add_item(appliance(1, 10_000), 2).unwrap();
        cart.add(appliance(1, 10_000)).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.quantity_of(1), Some(3));
        assert_eq!(cart.total().cents(), 30_000);
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add(appliance(1, 500)).unwrap();
        cart.add(appliance(2, 700)).unwrap();

        cart.update_quantity(1, 0).unwrap();
        assert_eq!(cart.quantity_of(1), None);
        assert_eq!(cart.line_count(), 1);

        cart.update_quantity(2, -4).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_total_is_sum_of_lines() {
        let mut cart = Cart::new();
        cart.add_item(appliance(1, 1099), 2).unwrap();
        cart.add_item(appliance(2, 250), 4).unwrap();

        assert_eq!(cart.total().cents(), 2 * 1099 + 4 * 250);
        assert_eq!(cart.count(), 6);
        let totals = CartTotals::from(&cart);
        assert_eq!(totals.line_count, 2);
    }

    #[test]
    fn test_quantity_limits() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.add_item(appliance(1, 100), 0),
            Err(CoreError::InvalidQuantity(0))
        ));
        cart.add_item(appliance(1, 100), MAX_ITEM_QUANTITY).unwrap();
        assert!(matches!(
            cart.add(appliance(1, 100)),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        assert!(cart.update_quantity(1, MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_checkout_request() {
        let mut cart = Cart::new();
        cart.add_item(appliance(7, 10_000), 2).unwrap();
        cart.add(appliance(7, 10_000)).unwrap();

        let request = cart.to_order_request(42).unwrap();
        assert_eq!(request.client_id, 42);
        assert_eq!(request.order_rows.len(), 1);
        assert_eq!(request.order_rows[0].appliance_id, 7);
        assert_eq!(request.order_rows[0].quantity, 3);
        assert_eq!(request.order_rows[0].amount, None);

        assert!(matches!(
            Cart::new().to_order_request(42),
            Err(CoreError::EmptyOrder)
        ));
    }

    #[test]
    fn test_drawer_flag_is_not_persisted() {
        let mut cart = Cart::new();
        cart.add(appliance(1, 100)).unwrap();
        cart.open();

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert!(!restored.is_open());
        assert_eq!(restored.items(), cart.items());
    }

    #[test]
    fn test_from_items_repairs_lines() {
        let items = vec![
            CartItem { appliance: appliance(1, 100), quantity: 2 },
            CartItem { appliance: appliance(1, 100), quantity: 1 },
            CartItem { appliance: appliance(2, 100), quantity: 0 },
        ];
        let cart = Cart::from_items(items);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.quantity_of(1), Some(3));
    }
}
