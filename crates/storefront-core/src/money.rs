//! # Money Module
//!
//! Provides the `Money` type for every price, discount and total in the
//! storefront.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  With binary floats:                                                    │
//! │    189.90 * 3 = 569.6999999999999                                       │
//! │    569.70 - 10% = 512.7299999999999   ❌ drifts before display         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    18990 * 3 = 56970 cents                                              │
//! │    56970 - 5697 = 51273 cents          ✅ exact, renders as 512.73      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//!
//! let price = Money::from_cents(18990); // 189.90
//! let line = price.multiply_quantity(3);
//! assert_eq!(line.cents(), 56970);
//! assert_eq!(line.to_string(), "569.70");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos for BRL).
///
/// ## Design Decisions
/// - **i64 (signed)**: subtraction never panics on intermediate values
/// - **Saturating ops**: totals clamp at the `i64` bounds instead of
///   overflowing; cart prices are capped by `validate_price`
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Transparent serde**: the view layer receives plain integers
///
/// ## Where Money Flows
/// ```text
/// add_to_cart(price) ──► CartItem.unit_price ──► CartItem.line_total()
///                                                        │
///                                                        ▼
///           Totals.subtotal ──► discount ──► net ──► shipping ──► total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let fee = Money::from_cents(2590); // 25.90
    /// assert_eq!(fee.cents(), 2590);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a cart quantity, saturating at the `i64`
    /// bounds.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(8990);
    /// assert_eq!(unit_price.multiply_quantity(2).cents(), 17980);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Returns `bps` basis points of this amount, rounded half-up to the cent.
    ///
    /// 1000 bps = 10%. This is the coupon discount amount, not the
    /// discounted price.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let subtotal = Money::from_cents(60000); // 600.00
    /// assert_eq!(subtotal.percentage(1000).cents(), 6000); // 60.00
    ///
    /// // 10% of 0.05 = 0.005 → 0.01
    /// assert_eq!(Money::from_cents(5).percentage(1000).cents(), 1);
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        // i128 keeps large carts from overflowing the intermediate product
        let amount = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_cents(amount as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Two-decimal rendering, e.g. `540.00`.
///
/// ## Note
/// Currency symbol and decimal separator are the view layer's business.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
