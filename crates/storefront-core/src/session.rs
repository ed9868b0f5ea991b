//! # Shop Session
//!
//! One shopper's complete state, owned by a single controller and passed by
//! reference to every operation.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           ShopSession                                   │
//! │                                                                         │
//! │   ┌──────────────────┐  ┌──────────┐  ┌─────────────┐  ┌────────────┐  │
//! │   │ InventoryLedger  │  │   Cart   │  │ CouponState │  │  Checkout  │  │
//! │   │ stock per id     │  │  lines   │  │  applied?   │  │   phase    │  │
//! │   └──────────────────┘  └──────────┘  └─────────────┘  └────────────┘  │
//! │                                                                         │
//! │   PricingPolicy (code, %, threshold, fee)      order number prefix      │
//! │                                                                         │
//! │   Every mutator returns Result; every read is recomputed on demand.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::{Cart, CartItem};
use crate::checkout::{Checkout, CheckoutPhase, OrderConfirmation, PendingOrder};
use crate::error::CoreResult;
use crate::inventory::InventoryLedger;
use crate::money::Money;
use crate::pricing::{CouponState, PricingPolicy, Totals};
use crate::types::{PurchaseAvailability, StockStatus, StockView};
use crate::DEFAULT_ORDER_PREFIX;

// =============================================================================
// Snapshot
// =============================================================================

/// Everything the view layer renders, computed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StoreSnapshot {
    pub items: Vec<CartItem>,
    pub totals: Totals,
    pub item_count: u32,
    pub coupon_applied: bool,
    pub phase: CheckoutPhase,
    pub stock: Vec<StockView>,
}

// =============================================================================
// Session
// =============================================================================

/// Session-state object for one shopper.
#[derive(Debug, Clone)]
pub struct ShopSession {
    ledger: InventoryLedger,
    cart: Cart,
    coupon: CouponState,
    policy: PricingPolicy,
    checkout: Checkout,
    order_prefix: String,
}

impl Default for ShopSession {
    fn default() -> Self {
        ShopSession::new(InventoryLedger::with_default_stock(), PricingPolicy::default())
    }
}

impl ShopSession {
    /// Starts a session with an empty cart and no coupon.
    pub fn new(ledger: InventoryLedger, policy: PricingPolicy) -> Self {
        ShopSession {
            ledger,
            cart: Cart::new(),
            coupon: CouponState::new(),
            policy,
            checkout: Checkout::new(),
            order_prefix: DEFAULT_ORDER_PREFIX.to_string(),
        }
    }

    /// Overrides the order-number prefix.
    pub fn with_order_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.order_prefix = prefix.into();
        self
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    pub fn phase(&self) -> &CheckoutPhase {
        self.checkout.phase()
    }

    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    pub fn coupon_applied(&self) -> bool {
        self.coupon.is_applied()
    }

    pub fn totals(&self) -> Totals {
        self.policy.totals(&self.cart, &self.coupon)
    }

    pub fn subtotal(&self) -> Money {
        self.totals().subtotal
    }

    pub fn discount(&self) -> Money {
        self.totals().discount
    }

    pub fn shipping(&self) -> Money {
        self.totals().shipping
    }

    pub fn total(&self) -> Money {
        self.totals().total
    }

    pub fn total_item_count(&self) -> u32 {
        self.cart.total_item_count()
    }

    pub fn available_stock(&self, product_id: &str) -> u32 {
        self.ledger.available_stock(product_id)
    }

    pub fn remaining_visible(&self, product_id: &str) -> u32 {
        self.ledger.remaining_visible(&self.cart, product_id)
    }

    pub fn stock_status(&self, product_id: &str) -> StockStatus {
        self.ledger.stock_status(&self.cart, product_id)
    }

    pub fn purchase_availability(&self, product_id: &str) -> PurchaseAvailability {
        self.ledger.purchase_availability(&self.cart, product_id)
    }

    /// View model for a full re-render.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            items: self.cart.items().to_vec(),
            totals: self.totals(),
            item_count: self.cart.total_item_count(),
            coupon_applied: self.coupon.is_applied(),
            phase: self.checkout.phase().clone(),
            stock: self.ledger.stock_views(&self.cart),
        }
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Overwrites a product's stock. Initialisation and restocking only: the
    /// cart is not re-checked here, which is why checkout verifies stock again.
    pub fn set_stock(&mut self, product_id: &str, count: u32) {
        self.ledger.set_stock(product_id, count);
    }

    /// Adds one unit. Returns the product's new quantity.
    pub fn add_to_cart(&mut self, product_id: &str, name: &str, unit_price: Money) -> CoreResult<u32> {
        self.checkout.ensure_mutable()?;
        let quantity = self.cart.add(&self.ledger, product_id, name, unit_price)?;
        self.checkout.record_change();
        Ok(quantity)
    }

    /// Sets a line's quantity; below 1 removes it.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> CoreResult<()> {
        self.checkout.ensure_mutable()?;
        self.cart.set_quantity(&self.ledger, product_id, quantity)?;
        self.checkout.record_change();
        Ok(())
    }

    /// Removes a line. Returns whether one was present.
    pub fn remove_from_cart(&mut self, product_id: &str) -> CoreResult<bool> {
        self.checkout.ensure_mutable()?;
        let removed = self.cart.remove(product_id);
        self.checkout.record_change();
        Ok(removed)
    }

    /// Applies the store coupon.
    pub fn apply_coupon(&mut self, code: &str) -> CoreResult<()> {
        self.checkout.ensure_mutable()?;
        self.coupon.apply(&self.policy, code)?;
        self.checkout.record_change();
        Ok(())
    }

    /// Verifies stock and enters Processing.
    pub fn begin_checkout(&mut self) -> CoreResult<PendingOrder> {
        self.checkout
            .begin(&self.ledger, &self.cart, &self.policy, &self.coupon, &self.order_prefix)
    }

    /// Deducts stock, clears cart and coupon, enters Committed.
    pub fn complete_checkout(&mut self, placed_at: DateTime<Utc>) -> CoreResult<OrderConfirmation> {
        self.checkout.complete(
            &mut self.ledger,
            &mut self.cart,
            &mut self.coupon,
            &self.policy,
            placed_at,
        )
    }

    /// Clears cart and coupon and returns to Idle.
    ///
    /// Stock already deducted by earlier orders stays deducted.
    pub fn reset(&mut self) -> CoreResult<()> {
        self.checkout.reset()?;
        self.cart.clear();
        self.coupon.reset();
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
