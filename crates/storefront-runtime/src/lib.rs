//! # storefront-runtime: Session Host for the Storefront
//!
//! Wraps the pure `storefront-core` session with the parts that need the
//! outside world: a config file, the clock, a processing delay and a
//! channel the view layer listens on.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Runtime                               │
//! │                                                                         │
//! │  storefront.toml + STOREFRONT_* env                                     │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  ┌──────────────────┐   build_session()   ┌──────────────────────────┐ │
//! │  │   StoreConfig    │ ──────────────────► │     StoreController      │ │
//! │  │                  │                     │                          │ │
//! │  │ pricing, stock,  │                     │ owns ShopSession         │ │
//! │  │ delay, logging   │                     │ Utc::now() on commit     │ │
//! │  └────────┬─────────┘                     │ tokio sleep while        │ │
//! │           │                               │ Processing               │ │
//! │           ▼                               └────────────┬─────────────┘ │
//! │  ┌──────────────────┐                                  │               │
//! │  │   init_tracing   │                                  ▼               │
//! │  │ RUST_LOG/filter  │                     broadcast<StoreSnapshot>     │
//! │  └──────────────────┘                     to every subscribed view     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - TOML + environment configuration
//! - [`controller`] - `StoreController`, the session owner
//! - [`error`] - Runtime error types
//! - [`telemetry`] - Tracing subscriber setup
//!
//! ## Usage
//!
//! ```rust,ignore
//! use storefront_runtime::{init_tracing, StoreConfig, StoreController};
//!
//! let config = StoreConfig::load_or_default(None);
//! init_tracing(&config.logging)?;
//!
//! let mut controller = StoreController::from_config(&config)?;
//! let mut updates = controller.subscribe();
//!
//! controller.add_to_cart("air-cooler", "Air Cooler", Money::from_cents(15990))?;
//! let confirmation = controller.submit_order().await?;
//! println!("Order {} placed", confirmation.order_number);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod controller;
pub mod error;
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{CheckoutSection, LoggingConfig, PricingSection, StoreConfig, StoreSection};
pub use controller::StoreController;
pub use error::{RuntimeError, RuntimeResult};
pub use telemetry::init_tracing;
