//! # Dialogs
//!
//! Modal workflows that outlive a single page action.
//!
//! - [`order`] - Order creation wizard and order editing
//! - [`checkout`] - Cart drawer and checkout

pub mod checkout;
pub mod order;

pub use checkout::{CartDrawer, CartSummary};
pub use order::{CreateOrderDialog, EditOrderDialog};
