//! # storefront-core: Cart, Stock and Pricing Engine
//!
//! The pure state machine behind the storefront widget. It tracks stock
//! reserved in the cart, enforces quantity limits against inventory,
//! computes coupon-adjusted totals and commits stock deduction exactly once
//! per order.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Storefront Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Browser widget (view layer)                    │   │
//! │  │   Catalog ──► Cart page ──► Checkout form ──► Confirmation      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ snapshots / operations                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            storefront-runtime (StoreController)                 │   │
//! │  │      config, tracing, snapshot broadcast, processing delay      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │  ┌───────────┐ ┌────────┐ ┌──────────┐ ┌──────────┐ ┌────────┐ │   │
//! │  │  │ inventory │ │  cart  │ │ pricing  │ │ checkout │ │session │ │   │
//! │  │  │  Ledger   │ │  Cart  │ │ Coupon   │ │  Phase   │ │ Shop-  │ │   │
//! │  │  │           │ │CartItem│ │ Totals   │ │  Commit  │ │Session │ │   │
//! │  │  └───────────┘ └────────┘ └──────────┘ └──────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO TIMERS • DETERMINISTIC ARITHMETIC      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer-cents Money type
//! - [`types`] - Product ids and stock badge states
//! - [`error`] - Domain error types
//! - [`validation`] - Input checks
//! - [`inventory`] - Inventory Ledger
//! - [`cart`] - Cart and line items
//! - [`pricing`] - Coupon state, pricing policy, totals
//! - [`checkout`] - Checkout state machine and order records
//! - [`session`] - `ShopSession`, the single owner of all of the above
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use storefront_core::{Money, ShopSession};
//!
//! let mut session = ShopSession::default();
//! session.add_to_cart("air-cooler", "Air Cooler", Money::from_cents(8990)).unwrap();
//! session.add_to_cart("air-cooler", "Air Cooler", Money::from_cents(8990)).unwrap();
//!
//! assert_eq!(session.remaining_visible("air-cooler"), 13);
//! assert_eq!(session.total().to_string(), "205.70"); // 179.80 + 25.90
//!
//! session.begin_checkout().unwrap();
//! session.complete_checkout(Utc::now()).unwrap();
//! assert_eq!(session.available_stock("air-cooler"), 13);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod inventory;
pub mod money;
pub mod pricing;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem};
pub use checkout::{CheckoutPhase, OrderConfirmation, PendingOrder};
pub use error::{CoreError, CoreResult, ValidationError};
pub use inventory::InventoryLedger;
pub use money::Money;
pub use pricing::{CouponState, PricingPolicy, Totals};
pub use session::{ShopSession, StoreSnapshot};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The store's coupon code.
pub const DEFAULT_COUPON_CODE: &str = "MAQUINA10";

/// Coupon discount in basis points (10%).
pub const DEFAULT_DISCOUNT_BPS: u32 = 1000;

/// Net amounts strictly above 500.00 ship free.
pub const FREE_SHIPPING_THRESHOLD: Money = Money::from_cents(50000);

/// Shipping charged at or below the threshold (25.90).
pub const FLAT_SHIPPING_FEE: Money = Money::from_cents(2590);

/// Prefix of generated order numbers.
pub const DEFAULT_ORDER_PREFIX: &str = "GTECH";

/// Remaining stock at or below this shows the low-stock badge.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

/// Remaining stock at or below this shows the "last units" button.
pub const LAST_UNITS_THRESHOLD: u32 = 3;

/// Launch catalog stock.
pub const DEFAULT_STOCK: &[(&str, u32)] = &[
    ("air-cooler", 15),
    ("fonte-notebook", 8),
    ("fonte-kmex", 3),
    ("water-cooler", 22),
];
