//! # Validation Module
//!
//! Input checks for values that arrive from the view layer.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser widget                                               │
//! │  └── Product cards carry id / name / price as data attributes          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Product ids, names and prices are well formed                     │
//! │  └── Coupon input is normalised before comparison                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart / Ledger rules (CoreError)                              │
//! │  └── Stock limits, coupon state, checkout phase                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{normalize_coupon_code, validate_product_id};
//!
//! validate_product_id("air-cooler").unwrap();
//! assert_eq!(normalize_coupon_code("  maquina10 "), "MAQUINA10");
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest accepted product id.
const MAX_PRODUCT_ID_LEN: usize = 64;

/// Longest accepted product display name.
const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Highest accepted unit price: 1,000,000,000.00.
pub const MAX_UNIT_PRICE_CENTS: i64 = 100_000_000_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_product_id;
///
/// assert!(validate_product_id("water-cooler").is_ok());
/// assert!(validate_product_id("").is_err());
/// assert!(validate_product_id("water cooler").is_err());
/// ```
pub fn validate_product_id(id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product_id".to_string(),
        });
    }

    if id.len() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "product_id".to_string(),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    if !id.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_') {
        return Err(ValidationError::InvalidFormat {
            field: "product_id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product display name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Uppercases and trims coupon input for comparison.
pub fn normalize_coupon_code(code: &str) -> String {
    code.trim().to_uppercase()
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (free items are allowed)
/// - At most [`MAX_UNIT_PRICE_CENTS`]
///
/// ## Example
/// ```rust
/// use storefront_core::money::Money;
/// use storefront_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(18990)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-1)).is_err());
/// assert!(validate_price(Money::from_cents(i64::MAX)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.cents() > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a coupon discount in basis points (0% to 100%).
pub fn validate_discount_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
