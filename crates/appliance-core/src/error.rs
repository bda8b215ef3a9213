//! # Error Types
//!
//! Domain-specific error types for appliance-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  appliance-core errors (this file)                                     │
//! │  ├── CoreError        - Cart, draft and permission failures            │
//! │  └── ValidationError  - Form field failures                            │
//! │                                                                         │
//! │  appliance-client errors (separate crate)                              │
//! │  └── ClientError      - HTTP status taxonomy, transport, decode        │
//! │                                                                         │
//! │  console errors (in app)                                               │
//! │  └── AppError         - What the presenter sees (code + message)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → AppError → notification / form    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Domain errors raised by the cart, the order drafts and the access rules.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The appliance has no line in the cart or draft.
    #[error("Appliance {0} is not in the list")]
    LineNotFound(i64),

    /// The cart or draft reached its line limit.
    #[error("Cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds the maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Quantity must be at least one when adding a line.
    #[error("Quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    /// Checkout or submit attempted with no lines.
    #[error("Cannot place an order without items")]
    EmptyOrder,

    /// The employee wizard reached submit without a client.
    #[error("A client must be selected before adding items")]
    ClientNotSelected,

    /// Approved orders are read-only.
    ///
    /// ## User Workflow
    /// ```text
    /// Employee approves order #12
    ///      │
    ///      ▼
    /// Client opens order #12 ──► Edit button hidden
    ///      │
    ///      ▼
    /// Any attempt to build an edit draft ──► OrderApproved { order_id: 12 }
    /// ```
    #[error("Order {order_id} is approved and can no longer be changed")]
    OrderApproved { order_id: i64 },

    /// An action that needs a logged-in user ran without one.
    #[error("You must be logged in to perform this action")]
    NotAuthenticated,

    /// The current role may not perform the action.
    #[error("Action not permitted: {0}")]
    NotPermitted(String),

    /// A submitted form failed validation.
    #[error("Form has {} invalid field(s)", .0.len())]
    InvalidForm(FieldErrors),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Every variant carries the wire name of the field it concerns so the
/// presenter can show the message next to the right input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Monetary value is out of range.
    #[error("{field} must be between {min} and {max}")]
    AmountOutOfRange { field: String, min: Money, max: Money },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email, bad card number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Returns the field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::AmountOutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Per-field error messages for a whole form.
///
/// Only the first failure of each field is kept, matching how a form shows
/// a single helper text under each input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure unless the field already has one.
    pub fn push(&mut self, err: ValidationError) {
        self.errors
            .entry(err.field().to_string())
            .or_insert_with(|| err.to_string());
    }

    /// Records the error of a validation result, if any.
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(err) = result {
            self.push(err);
        }
    }

    /// Inserts a message for a field, replacing an existing one.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    /// Message for a field, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterates `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Converts into a result: `Ok(())` when nothing failed.
    pub fn into_result(self) -> CoreResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidForm(self))
        }
    }
}

impl FromIterator<(String, String)> for FieldErrors {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        FieldErrors {
            errors: iter.into_iter().collect(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
