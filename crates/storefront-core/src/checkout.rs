//! # Checkout Commit
//!
//! The one transition that turns cart reservations into stock deduction.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────┐  begin()   ┌────────────┐  complete()   ┌───────────┐        │
//! │   │ Idle │──────────► │ Processing │─────────────► │ Committed │        │
//! │   └──────┘            └────────────┘               └───────────┘        │
//! │      ▲   stock check       │  no rollback path          │              │
//! │      │   fails: stay       │                            │              │
//! │      │                     ▼                            │              │
//! │      │          cart / coupon / reset                   │              │
//! │      │          rejected: CheckoutInProgress            │              │
//! │      │                                                  │              │
//! │      └──────────────── reset() / next begin() ◄─────────┘              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The processing delay itself lives outside this crate: callers invoke
//! [`Checkout::begin`], wait however they like, then [`Checkout::complete`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::{Cart, CartItem};
use crate::error::{CoreError, CoreResult};
use crate::inventory::InventoryLedger;
use crate::pricing::{CouponState, PricingPolicy, Totals};

/// Random characters after the order-number prefix.
const ORDER_NUMBER_SUFFIX_LEN: usize = 8;

// =============================================================================
// Phase
// =============================================================================

/// Where the current order is in the checkout flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum CheckoutPhase {
    /// Shopping; no order in flight.
    #[default]
    Idle,
    /// Stock verified, waiting for the commit.
    Processing { order_number: String },
    /// Stock deducted; cart and coupon cleared.
    Committed { order_number: String },
}

impl CheckoutPhase {
    pub fn is_processing(&self) -> bool {
        matches!(self, CheckoutPhase::Processing { .. })
    }
}

// =============================================================================
// Order Records
// =============================================================================

/// Returned by [`Checkout::begin`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PendingOrder {
    pub order_number: String,
    /// Totals at the moment stock was verified.
    pub totals: Totals,
}

/// Receipt for a committed order.
///
/// Items and totals are captured before the cart is cleared, so the
/// confirmation page renders from this record alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderConfirmation {
    pub order_number: String,
    pub items: Vec<CartItem>,
    pub totals: Totals,
    pub coupon_applied: bool,
    #[ts(as = "String")]
    pub placed_at: DateTime<Utc>,
}

impl OrderConfirmation {
    /// Units bought across all lines.
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Builds `<PREFIX>-XXXXXXXX` from a v4 UUID.
///
/// ## Example
/// ```rust
/// use storefront_core::checkout::generate_order_number;
///
/// let number = generate_order_number("GTECH");
/// assert!(number.starts_with("GTECH-"));
/// assert_eq!(number.len(), "GTECH-".len() + 8);
/// ```
pub fn generate_order_number(prefix: &str) -> String {
    let random = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{}-{}", prefix, &random[..ORDER_NUMBER_SUFFIX_LEN])
}

/// Checks every cart line against current stock.
///
/// ## Errors
/// `InsufficientStock` for the first line whose quantity exceeds stock.
pub fn verify_stock(ledger: &InventoryLedger, cart: &Cart) -> CoreResult<()> {
    for item in cart.items() {
        let available = ledger.available_stock(item.product_id.as_str());
        if item.quantity > available {
            return Err(CoreError::InsufficientStock {
                product_id: item.product_id.to_string(),
                available,
                requested: item.quantity,
            });
        }
    }
    Ok(())
}

// =============================================================================
// Checkout
// =============================================================================

/// Holds the checkout phase and performs its transitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    phase: CheckoutPhase,
}

impl Checkout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &CheckoutPhase {
        &self.phase
    }

    /// Fails with `CheckoutInProgress` while an order is processing.
    pub fn ensure_mutable(&self) -> CoreResult<()> {
        match &self.phase {
            CheckoutPhase::Processing { order_number } => Err(CoreError::CheckoutInProgress {
                order_number: order_number.clone(),
            }),
            CheckoutPhase::Idle | CheckoutPhase::Committed { .. } => Ok(()),
        }
    }

    /// Called after a cart or coupon change went through. A committed order
    /// is finished business, so the phase drops back to `Idle`.
    pub fn record_change(&mut self) {
        if let CheckoutPhase::Committed { .. } = self.phase {
            self.phase = CheckoutPhase::Idle;
        }
    }

    /// Idle (or Committed) → Processing.
    ///
    /// ## Errors
    /// - `CheckoutInProgress`: another order is processing
    /// - `EmptyCart`: nothing to buy
    /// - `InsufficientStock`: a line no longer fits; the cart is untouched
    pub fn begin(
        &mut self,
        ledger: &InventoryLedger,
        cart: &Cart,
        policy: &PricingPolicy,
        coupon: &CouponState,
        order_prefix: &str,
    ) -> CoreResult<PendingOrder> {
        if let CheckoutPhase::Processing { order_number } = &self.phase {
            return Err(CoreError::CheckoutInProgress {
                order_number: order_number.clone(),
            });
        }

        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        verify_stock(ledger, cart)?;

        let order_number = generate_order_number(order_prefix);
        self.phase = CheckoutPhase::Processing {
            order_number: order_number.clone(),
        };

        Ok(PendingOrder {
            order_number,
            totals: policy.totals(cart, coupon),
        })
    }

    /// Processing → Committed.
    ///
    /// Deducts the cart from the ledger, clears the cart and resets the
    /// coupon, in that order.
    ///
    /// ## Errors
    /// `NoPendingOrder` unless [`Checkout::begin`] succeeded first.
    pub fn complete(
        &mut self,
        ledger: &mut InventoryLedger,
        cart: &mut Cart,
        coupon: &mut CouponState,
        policy: &PricingPolicy,
        placed_at: DateTime<Utc>,
    ) -> CoreResult<OrderConfirmation> {
        let order_number = match &self.phase {
            CheckoutPhase::Processing { order_number } => order_number.clone(),
            _ => return Err(CoreError::NoPendingOrder),
        };

        let confirmation = OrderConfirmation {
            order_number: order_number.clone(),
            items: cart.items().to_vec(),
            totals: policy.totals(cart, coupon),
            coupon_applied: coupon.is_applied(),
            placed_at,
        };

        ledger.commit_deduction(cart);
        cart.clear();
        coupon.reset();

        self.phase = CheckoutPhase::Committed { order_number };
        Ok(confirmation)
    }

    /// Back to Idle. Refused while processing.
    pub fn reset(&mut self) -> CoreResult<()> {
        if let CheckoutPhase::Processing { order_number } = &self.phase {
            return Err(CoreError::CheckoutInProgress {
                order_number: order_number.clone(),
            });
        }
        self.phase = CheckoutPhase::Idle;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    struct Fixture {
        ledger: InventoryLedger,
        cart: Cart,
        coupon: CouponState,
        policy: PricingPolicy,
        checkout: Checkout,
    }

    fn fixture(stock: u32, in_cart: u32) -> Fixture {
        let ledger: InventoryLedger = [("P1", stock)].into_iter().collect();
        let mut cart = Cart::new();
        for _ in 0..in_cart {
            cart.add(&ledger, "P1", "Product 1", Money::from_cents(10000))
                .unwrap();
        }
        Fixture {
            ledger,
            cart,
            coupon: CouponState::new(),
            policy: PricingPolicy::default(),
            checkout: Checkout::new(),
        }
    }

    impl Fixture {
        fn begin(&mut self) -> CoreResult<PendingOrder> {
            self.checkout
                .begin(&self.ledger, &self.cart, &self.policy, &self.coupon, "GTECH")
        }

        fn complete(&mut self) -> CoreResult<OrderConfirmation> {
            self.checkout.complete(
                &mut self.ledger,
                &mut self.cart,
                &mut self.coupon,
                &self.policy,
                Utc::now(),
            )
        }
    }

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number("GTECH");
        let suffix = number.strip_prefix("GTECH-").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
        assert_ne!(number, generate_order_number("GTECH"));
    }

    #[test]
    fn test_full_commit() {
        let mut f = fixture(5, 2);
        f.coupon.apply(&f.policy, "MAQUINA10").unwrap();

        let pending = f.begin().unwrap();
        assert!(f.checkout.phase().is_processing());
        assert_eq!(pending.totals.discount, Money::from_cents(2000));

        let confirmation = f.complete().unwrap();

        assert_eq!(confirmation.order_number, pending.order_number);
        assert_eq!(confirmation.item_count(), 2);
        assert_eq!(confirmation.totals, pending.totals);
        assert!(confirmation.coupon_applied);

        assert_eq!(f.ledger.available_stock("P1"), 3);
        assert!(f.cart.is_empty());
        assert!(!f.coupon.is_applied());
        assert_eq!(
            f.checkout.phase(),
            &CheckoutPhase::Committed {
                order_number: pending.order_number
            }
        );
    }

    #[test]
    fn test_begin_rejects_empty_cart() {
        let mut f = fixture(5, 0);
        assert_eq!(f.begin(), Err(CoreError::EmptyCart));
        assert_eq!(f.checkout.phase(), &CheckoutPhase::Idle);
    }

    #[test]
    fn test_begin_rejects_insufficient_stock() {
        let mut f = fixture(5, 4);
        f.ledger.set_stock("P1", 3);

        let err = f.begin().unwrap_err();

        assert_eq!(
            err,
            CoreError::InsufficientStock {
                product_id: "P1".to_string(),
                available: 3,
                requested: 4
            }
        );
        assert_eq!(f.cart.quantity_of("P1"), 4);
        assert_eq!(f.ledger.available_stock("P1"), 3);
        assert_eq!(f.checkout.phase(), &CheckoutPhase::Idle);
    }

    #[test]
    fn test_complete_without_begin() {
        let mut f = fixture(5, 1);
        assert_eq!(f.complete(), Err(CoreError::NoPendingOrder));
        assert_eq!(f.ledger.available_stock("P1"), 5);
        assert_eq!(f.cart.quantity_of("P1"), 1);
    }

    #[test]
    fn test_commit_happens_once() {
        let mut f = fixture(5, 2);
        f.begin().unwrap();
        f.complete().unwrap();

        assert_eq!(f.complete(), Err(CoreError::NoPendingOrder));
        assert_eq!(f.ledger.available_stock("P1"), 3);
    }

    #[test]
    fn test_processing_blocks_mutation_and_reset() {
        let mut f = fixture(5, 1);
        f.begin().unwrap();

        assert!(matches!(
            f.checkout.ensure_mutable(),
            Err(CoreError::CheckoutInProgress { .. })
        ));
        assert!(matches!(
            f.checkout.reset(),
            Err(CoreError::CheckoutInProgress { .. })
        ));
        assert!(matches!(f.begin(), Err(CoreError::CheckoutInProgress { .. })));
    }

    #[test]
    fn test_committed_returns_to_idle_after_change() {
        let mut f = fixture(5, 1);
        f.begin().unwrap();
        f.complete().unwrap();

        f.checkout.ensure_mutable().unwrap();
        assert!(matches!(f.checkout.phase(), CheckoutPhase::Committed { .. }));

        f.checkout.record_change();
        assert_eq!(f.checkout.phase(), &CheckoutPhase::Idle);
    }

    #[test]
    fn test_phase_serializes_tagged() {
        let phase = CheckoutPhase::Processing {
            order_number: "GTECH-ABC12345".to_string(),
        };
        let json = serde_json::to_string(&phase).unwrap();
        assert_eq!(json, r#"{"phase":"processing","order_number":"GTECH-ABC12345"}"#);
    }
}
