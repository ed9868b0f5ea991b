//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - Stock, coupon and checkout rule violations     │
//! │  └── ValidationError  - Malformed input (ids, names, prices)           │
//! │                                                                         │
//! │  storefront-runtime errors (separate crate)                            │
//! │  └── RuntimeError     - Config, telemetry, wrapped CoreError           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → RuntimeError → view layer         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product id, counts)
//! 3. Errors are enum variants, never String
//! 4. The core produces no user-facing copy; the view maps variants to text

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart, coupon and checkout rule violations.
///
/// Every variant is recoverable: the session state is left exactly as it was
/// before the rejected operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The product has no stock at all.
    #[error("Product {product_id} is out of stock")]
    OutOfStock { product_id: String },

    /// Adding or setting the quantity would exceed available stock.
    ///
    /// ## User Workflow
    /// ```text
    /// stock{fonte-kmex: 3}, cart{fonte-kmex: 3}
    ///      │
    ///      ▼
    /// add_to_cart("fonte-kmex")
    ///      │
    ///      ▼
    /// LimitReached { product_id: "fonte-kmex", available: 3 }
    /// ```
    #[error("Stock limit reached for {product_id}: only {available} available")]
    LimitReached { product_id: String, available: u32 },

    /// The coupon code does not match the store's code.
    #[error("Invalid coupon code: {code}")]
    InvalidCoupon { code: String },

    /// A coupon was already applied this session.
    #[error("A coupon has already been applied")]
    AlreadyApplied,

    /// The coupon input was empty after trimming.
    #[error("Coupon code is required")]
    CouponRequired,

    /// A cart line no longer fits in the ledger at checkout time.
    #[error("Insufficient stock for {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: u32,
        requested: u32,
    },

    /// Quantity update for a product that has no cart line.
    #[error("Product {product_id} is not in the cart")]
    ProductNotInCart { product_id: String },

    /// Checkout attempted with nothing to buy.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Cart, coupon or reset attempted while an order is being processed.
    #[error("Order {order_number} is being processed")]
    CheckoutInProgress { order_number: String },

    /// Commit attempted without a preceding `begin_checkout`.
    #[error("No order is being processed")]
    NoPendingOrder,

    /// Input validation failure.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g. whitespace inside a product id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: "fonte-kmex".to_string(),
            available: 1,
            requested: 2,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for fonte-kmex: available 1, requested 2"
        );

        let err = CoreError::LimitReached {
            product_id: "air-cooler".to_string(),
            available: 15,
        };
        assert_eq!(
            err.to_string(),
            "Stock limit reached for air-cooler: only 15 available"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "product_id".to_string(),
        };
        assert_eq!(err.to_string(), "product_id is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
