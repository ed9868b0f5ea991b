//! # Storefront Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_COUPON_CODE=MAQUINA10                                   │
//! │     STOREFRONT_PROCESSING_DELAY_MS=1000                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     path passed to `load`, else $STOREFRONT_CONFIG                     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     MAQUINA10 / 10% / free above 500.00 / 25.90 / 1s delay             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [store]
//! name = "GTECH"
//! order_prefix = "GTECH"
//!
//! [pricing]
//! coupon_code = "MAQUINA10"
//! discount_percent = 10
//! free_shipping_threshold_cents = 50000
//! shipping_fee_cents = 2590
//!
//! [checkout]
//! processing_delay_ms = 1000
//!
//! [inventory]
//! air-cooler = 15
//! fonte-notebook = 8
//! fonte-kmex = 3
//! water-cooler = 22
//!
//! [logging]
//! filter = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use storefront_core::validation::{
    normalize_coupon_code, validate_discount_bps, validate_product_id,
};
use storefront_core::{
    InventoryLedger, Money, PricingPolicy, ShopSession, DEFAULT_COUPON_CODE, DEFAULT_DISCOUNT_BPS,
    DEFAULT_ORDER_PREFIX, DEFAULT_STOCK, FLAT_SHIPPING_FEE, FREE_SHIPPING_THRESHOLD,
};

use crate::error::{RuntimeError, RuntimeResult};

/// Points `load` at a config file when no explicit path is given.
pub const CONFIG_PATH_ENV: &str = "STOREFRONT_CONFIG";

// =============================================================================
// Store Section
// =============================================================================

/// Store identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSection {
    /// Display name.
    #[serde(default = "default_store_name")]
    pub name: String,

    /// Order numbers look like `<order_prefix>-XXXXXXXX`.
    #[serde(default = "default_order_prefix")]
    pub order_prefix: String,
}

fn default_store_name() -> String {
    "GTECH".to_string()
}

fn default_order_prefix() -> String {
    DEFAULT_ORDER_PREFIX.to_string()
}

impl Default for StoreSection {
    fn default() -> Self {
        StoreSection {
            name: default_store_name(),
            order_prefix: default_order_prefix(),
        }
    }
}

// =============================================================================
// Pricing Section
// =============================================================================

/// Coupon and shipping rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingSection {
    /// The single valid coupon code (compared case-insensitively).
    #[serde(default = "default_coupon_code")]
    pub coupon_code: String,

    /// Coupon discount, whole percent (0-100).
    #[serde(default = "default_discount_percent")]
    pub discount_percent: u32,

    /// Net amounts strictly above this ship free.
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold_cents: i64,

    /// Flat shipping fee otherwise.
    #[serde(default = "default_shipping_fee")]
    pub shipping_fee_cents: i64,
}

fn default_coupon_code() -> String {
    DEFAULT_COUPON_CODE.to_string()
}

fn default_discount_percent() -> u32 {
    DEFAULT_DISCOUNT_BPS / 100
}

fn default_free_shipping_threshold() -> i64 {
    FREE_SHIPPING_THRESHOLD.cents()
}

fn default_shipping_fee() -> i64 {
    FLAT_SHIPPING_FEE.cents()
}

impl Default for PricingSection {
    fn default() -> Self {
        PricingSection {
            coupon_code: default_coupon_code(),
            discount_percent: default_discount_percent(),
            free_shipping_threshold_cents: default_free_shipping_threshold(),
            shipping_fee_cents: default_shipping_fee(),
        }
    }
}

// =============================================================================
// Checkout Section
// =============================================================================

/// Order-processing behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSection {
    /// Time spent in Processing before stock is committed.
    #[serde(default = "default_processing_delay")]
    pub processing_delay_ms: u64,
}

fn default_processing_delay() -> u64 {
    1000
}

impl Default for CheckoutSection {
    fn default() -> Self {
        CheckoutSection {
            processing_delay_ms: default_processing_delay(),
        }
    }
}

// =============================================================================
// Logging Section
// =============================================================================

/// Tracing output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: default_log_filter(),
        }
    }
}

fn default_inventory() -> BTreeMap<String, u32> {
    DEFAULT_STOCK
        .iter()
        .map(|&(id, count)| (id.to_string(), count))
        .collect()
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub pricing: PricingSection,

    #[serde(default)]
    pub checkout: CheckoutSection,

    /// Initial stock per product id.
    #[serde(default = "default_inventory")]
    pub inventory: BTreeMap<String, u32>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            store: StoreSection::default(),
            pricing: PricingSection::default(),
            checkout: CheckoutSection::default(),
            inventory: default_inventory(),
            logging: LoggingConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `$STOREFRONT_CONFIG`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> RuntimeResult<Self> {
        let mut config = Self::default();

        let path = config_path.or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));
        if let Some(path) = path {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Writes the configuration as TOML.
    pub fn save(&self, config_path: Option<PathBuf>) -> RuntimeResult<()> {
        let path = config_path
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from))
            .ok_or_else(|| RuntimeError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Storefront config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> RuntimeResult<()> {
        if normalize_coupon_code(&self.pricing.coupon_code).is_empty() {
            return Err(RuntimeError::InvalidConfig("coupon_code must not be empty".into()));
        }

        validate_discount_bps(self.pricing.discount_percent.saturating_mul(100)).map_err(|_| {
            RuntimeError::InvalidConfig(format!(
                "discount_percent must be between 0 and 100, got {}",
                self.pricing.discount_percent
            ))
        })?;

        if self.pricing.free_shipping_threshold_cents < 0 || self.pricing.shipping_fee_cents < 0 {
            return Err(RuntimeError::InvalidConfig(
                "shipping amounts must not be negative".into(),
            ));
        }

        let prefix = &self.store.order_prefix;
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RuntimeError::InvalidConfig(format!(
                "order_prefix must be non-empty ASCII letters and digits, got '{}'",
                prefix
            )));
        }

        for id in self.inventory.keys() {
            validate_product_id(id).map_err(|e| {
                RuntimeError::InvalidConfig(format!("inventory entry '{}': {}", id, e))
            })?;
        }

        Ok(())
    }

    /// Applies `STOREFRONT_*` environment overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup. Unparseable numbers are
    /// logged and ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(code) = lookup("STOREFRONT_COUPON_CODE") {
            debug!("Overriding coupon code from environment");
            self.pricing.coupon_code = code;
        }

        if let Some(pct) = lookup("STOREFRONT_DISCOUNT_PERCENT") {
            match pct.parse::<u32>() {
                Ok(p) => self.pricing.discount_percent = p,
                Err(_) => warn!(value = %pct, "Ignoring invalid STOREFRONT_DISCOUNT_PERCENT"),
            }
        }

        if let Some(delay) = lookup("STOREFRONT_PROCESSING_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => {
                    debug!(delay_ms = ms, "Overriding processing delay from environment");
                    self.checkout.processing_delay_ms = ms;
                }
                Err(_) => warn!(value = %delay, "Ignoring invalid STOREFRONT_PROCESSING_DELAY_MS"),
            }
        }

        if let Some(prefix) = lookup("STOREFRONT_ORDER_PREFIX") {
            self.store.order_prefix = prefix;
        }

        if let Some(filter) = lookup("STOREFRONT_LOG") {
            self.logging.filter = filter;
        }
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Pricing policy built from the `[pricing]` section.
    pub fn pricing_policy(&self) -> RuntimeResult<PricingPolicy> {
        let policy = PricingPolicy::new(
            &self.pricing.coupon_code,
            self.pricing.discount_percent.saturating_mul(100),
            Money::from_cents(self.pricing.free_shipping_threshold_cents),
            Money::from_cents(self.pricing.shipping_fee_cents),
        )?;
        Ok(policy)
    }

    /// Initial ledger from the `[inventory]` section.
    pub fn inventory_ledger(&self) -> InventoryLedger {
        self.inventory
            .iter()
            .map(|(id, &count)| (id.clone(), count))
            .collect()
    }

    /// Time spent in Processing before the commit.
    pub fn processing_delay(&self) -> Duration {
        Duration::from_millis(self.checkout.processing_delay_ms)
    }

    /// A fresh session for this configuration, validated first.
    pub fn build_session(&self) -> RuntimeResult<ShopSession> {
        self.validate()?;
        let session = ShopSession::new(self.inventory_ledger(), self.pricing_policy()?)
            .with_order_prefix(self.store.order_prefix.clone());
        Ok(session)
    }
}
