//! # Pricing Engine
//!
//! Pure computation from (cart, coupon state) to an order breakdown.
//!
//! ## Totals Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  subtotal = Σ unit_price × quantity                                     │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  discount = coupon applied ? subtotal × 10% : 0                         │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  net      = subtotal − discount                                         │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  shipping = net > 500.00 ? 0 : 25.90     (on net, not subtotal)         │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  total    = net + shipping                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals are never stored; [`PricingPolicy::totals`] is called after every
//! cart or coupon change.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{normalize_coupon_code, validate_discount_bps, validate_price};
use crate::{DEFAULT_COUPON_CODE, DEFAULT_DISCOUNT_BPS, FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD};

// =============================================================================
// Pricing Policy
// =============================================================================

/// The store's single coupon and its shipping rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// The one valid coupon code, stored upper-case.
    coupon_code: String,
    /// Coupon discount in basis points (1000 = 10%).
    discount_bps: u32,
    /// Net amounts strictly above this ship free.
    free_shipping_threshold: Money,
    /// Shipping charged at or below the threshold.
    flat_shipping_fee: Money,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            coupon_code: DEFAULT_COUPON_CODE.to_string(),
            discount_bps: DEFAULT_DISCOUNT_BPS,
            free_shipping_threshold: FREE_SHIPPING_THRESHOLD,
            flat_shipping_fee: FLAT_SHIPPING_FEE,
        }
    }
}

impl PricingPolicy {
    /// Builds a policy. The coupon code is normalised so that comparison
    /// stays case-insensitive.
    ///
    /// ## Errors
    /// `Validation` when the discount exceeds 100% or either shipping amount
    /// is negative.
    pub fn new(
        coupon_code: &str,
        discount_bps: u32,
        free_shipping_threshold: Money,
        flat_shipping_fee: Money,
    ) -> CoreResult<Self> {
        validate_discount_bps(discount_bps)?;
        validate_price(free_shipping_threshold)?;
        validate_price(flat_shipping_fee)?;

        Ok(PricingPolicy {
            coupon_code: normalize_coupon_code(coupon_code),
            discount_bps,
            free_shipping_threshold,
            flat_shipping_fee,
        })
    }

    pub fn coupon_code(&self) -> &str {
        &self.coupon_code
    }

    pub fn discount_bps(&self) -> u32 {
        self.discount_bps
    }

    pub fn free_shipping_threshold(&self) -> Money {
        self.free_shipping_threshold
    }

    pub fn flat_shipping_fee(&self) -> Money {
        self.flat_shipping_fee
    }

    /// Whether trimmed, case-folded input matches the store's code.
    pub fn matches_code(&self, code: &str) -> bool {
        normalize_coupon_code(code) == self.coupon_code
    }

    /// Coupon discount on a subtotal; zero when no coupon is applied.
    pub fn discount(&self, subtotal: Money, coupon: &CouponState) -> Money {
        if coupon.is_applied() {
            subtotal.percentage(self.discount_bps)
        } else {
            Money::zero()
        }
    }

    /// Shipping on the post-discount amount.
    pub fn shipping(&self, net_subtotal: Money) -> Money {
        if net_subtotal > self.free_shipping_threshold {
            Money::zero()
        } else {
            self.flat_shipping_fee
        }
    }

    /// Full breakdown for a cart.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::cart::Cart;
    /// use storefront_core::inventory::InventoryLedger;
    /// use storefront_core::money::Money;
    /// use storefront_core::pricing::{CouponState, PricingPolicy};
    ///
    /// let ledger: InventoryLedger = [("P1", 10)].into_iter().collect();
    /// let mut cart = Cart::new();
    /// cart.add(&ledger, "P1", "Product", Money::from_cents(40000)).unwrap();
    ///
    /// let totals = PricingPolicy::default().totals(&cart, &CouponState::new());
    /// assert_eq!(totals.shipping.to_string(), "25.90");
    /// assert_eq!(totals.total.to_string(), "425.90");
    /// ```
    pub fn totals(&self, cart: &Cart, coupon: &CouponState) -> Totals {
        let subtotal = cart.subtotal();
        let discount = self.discount(subtotal, coupon);
        let net = subtotal - discount;
        let shipping = self.shipping(net);

        Totals {
            subtotal,
            discount,
            shipping,
            total: net + shipping,
        }
    }
}

// =============================================================================
// Coupon State
// =============================================================================

/// Whether the session's coupon has been applied.
///
/// `applied` only moves false → true; it returns to false solely through an
/// order commit or a session reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CouponState {
    applied: bool,
}

impl CouponState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Applies `code` against the policy.
    ///
    /// ## Errors (checked in this order)
    /// - `AlreadyApplied`: a coupon is already active, whatever `code` is
    /// - `CouponRequired`: `code` is blank
    /// - `InvalidCoupon`: `code` does not match the store's code
    pub fn apply(&mut self, policy: &PricingPolicy, code: &str) -> CoreResult<()> {
        if self.applied {
            return Err(CoreError::AlreadyApplied);
        }

        let normalized = normalize_coupon_code(code);
        if normalized.is_empty() {
            return Err(CoreError::CouponRequired);
        }

        if !policy.matches_code(&normalized) {
            return Err(CoreError::InvalidCoupon { code: normalized });
        }

        self.applied = true;
        Ok(())
    }

    /// Clears the flag. Only checkout commit and session reset call this.
    pub(crate) fn reset(&mut self) {
        self.applied = false;
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Derived order breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    pub subtotal: Money,
    pub discount: Money,
    pub shipping: Money,
    pub total: Money,
}

impl Totals {
    /// Subtotal after the coupon discount.
    pub fn net(&self) -> Money {
        self.subtotal - self.discount
    }

    /// Whether the free-shipping rule kicked in.
    pub fn has_free_shipping(&self) -> bool {
        self.shipping.is_zero()
    }

    /// Whether a discount line should be shown.
    pub fn has_discount(&self) -> bool {
        self.discount.is_positive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
