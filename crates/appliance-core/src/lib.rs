//! # appliance-core: Pure Domain Logic for the Appliance Console
//!
//! This crate holds every rule of the appliance storefront that can be
//! expressed without touching the network or the disk.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Appliance Console Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  apps/console (pages, stores)                   │   │
//! │  │   Login ──► Dashboard ──► Appliances ──► Cart ──► Orders        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              appliance-client (REST + query cache)              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ appliance-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌────────┐ ┌────────┐ ┌────────┐ ┌───────────┐ ┌───────────┐  │   │
//! │  │  │ types  │ │ money  │ │  cart  │ │order_draft│ │ listing   │  │   │
//! │  │  └────────┘ └────────┘ └────────┘ └───────────┘ └───────────┘  │   │
//! │  │  ┌────────────┐ ┌────────────┐                                 │   │
//! │  │  │ validation │ │   access   │                                 │   │
//! │  │  └────────────┘ └────────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO STORAGE • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities and request/response DTOs mirrored from the backend
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Shopping cart reducer
//! - [`order_draft`] - Order creation wizard and order edit draft
//! - [`listing`] - Client-side filtering, sorting and pagination
//! - [`validation`] - Form schemas
//! - [`access`] - Roles, routes and per-order permissions
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use appliance_core::money::Money;
//!
//! let price = Money::from_cents(10_000); // $100.00
//! let subtotal = price.multiply_quantity(3);
//! assert_eq!(subtotal.cents(), 30_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod cart;
pub mod error;
pub mod listing;
pub mod money;
pub mod order_draft;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a cart or an order draft.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Rows per page used by list pages until the user picks another size.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Page size used when a screen needs "everything" (pickers, dashboards).
pub const LOOKUP_PAGE_SIZE: u32 = 1000;
