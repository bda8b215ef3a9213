//! Cart drawer and checkout.
//!
//! Checkout turns the whole cart into one order for the signed-in client.
//! Rows carry no amount; the backend prices them. A failed checkout keeps
//! the cart as it was.

use appliance_core::cart::{CartItem, CartTotals};
use appliance_core::validation::validate_order;
use appliance_core::Order;
use serde::Serialize;
use tracing::info;

use crate::error::AppResult;
use crate::pages::Context;

/// What the drawer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
}

#[derive(Debug)]
pub struct CartDrawer {
    ctx: Context,
}

impl CartDrawer {
    pub fn new(ctx: Context) -> Self {
        CartDrawer { ctx }
    }

    pub fn summary(&self) -> CartSummary {
        let (items, totals) = self
            .ctx
            .cart
            .with_cart(|cart| (cart.items().to_vec(), CartTotals::from(cart)));
        CartSummary { items, totals }
    }

    /// Zero or less removes the line.
    pub fn set_quantity(&self, appliance_id: i64, quantity: i64) -> AppResult<()> {
        self.ctx
            .cart
            .update_quantity(appliance_id, quantity)
            .map_err(|e| self.ctx.report(e))
    }

    pub fn remove(&self, appliance_id: i64) -> AppResult<bool> {
        self.ctx
            .cart
            .remove(appliance_id)
            .map_err(|e| self.ctx.report(e))
    }

    /// Places the cart as one order, then empties and closes the drawer.
    pub async fn checkout(&self) -> AppResult<Order> {
        let session = self.ctx.session()?;
        self.ctx.ensure(!session.role.is_employee(), "place cart orders")?;

        let request = self
            .ctx
            .cart
            .with_cart(|cart| cart.to_order_request(session.user_id))
            .map_err(|e| self.ctx.report(e))?;
        validate_order(&request).map_err(|e| self.ctx.report(e))?;

        let order = self
            .ctx
            .api
            .create_order(&request)
            .await
            .map_err(|e| self.ctx.report(e))?;

        info!(
            order_id = order.id,
            rows = request.order_rows.len(),
            "Cart checked out"
        );
        self.ctx.cart.reset();
        self.ctx.cart.close();
        self.ctx.notify.success("Order placed successfully!");
        Ok(order)
    }
}
