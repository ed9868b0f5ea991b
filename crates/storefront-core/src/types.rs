//! # Domain Types
//!
//! Small shared types used by the ledger, the cart and the view snapshot.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌──────────────────────┐ │
//! │  │   ProductId     │   │   StockStatus    │   │ PurchaseAvailability │ │
//! │  │  ─────────────  │   │  ──────────────  │   │  ──────────────────  │ │
//! │  │  "air-cooler"   │   │  Available       │   │  Available           │ │
//! │  │  opaque key     │   │  Low (≤ 5)       │   │  LastUnits(n) (≤ 3)  │ │
//! │  └─────────────────┘   │  SoldOut (0)     │   │  SoldOut (0)         │ │
//! │                        └──────────────────┘   └──────────────────────┘ │
//! │                                                                         │
//! │  StockView = { available, remaining, status, availability }            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use ts_rs::TS;

use crate::{LAST_UNITS_THRESHOLD, LOW_STOCK_THRESHOLD};

// =============================================================================
// Product Identifier
// =============================================================================

/// Opaque product key shared by the inventory ledger and the cart.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct ProductId(String);

impl ProductId {
    /// Wraps a product key. Use [`crate::validation::validate_product_id`]
    /// before trusting input from the view layer.
    pub fn new(id: impl Into<String>) -> Self {
        ProductId(id.into())
    }

    /// Returns the key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId(id)
    }
}

/// Lets ledger maps be queried with a plain `&str`.
impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Stock Badges
// =============================================================================

/// Badge state for the stock counter on a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// More than [`LOW_STOCK_THRESHOLD`] units left to reserve.
    Available,
    /// Between 1 and [`LOW_STOCK_THRESHOLD`] units left.
    Low,
    /// Nothing left to reserve.
    SoldOut,
}

impl StockStatus {
    /// Classifies a remaining-visible count.
    pub fn from_remaining(remaining: u32) -> Self {
        if remaining == 0 {
            StockStatus::SoldOut
        } else if remaining <= LOW_STOCK_THRESHOLD {
            StockStatus::Low
        } else {
            StockStatus::Available
        }
    }
}

/// State of the add-to-cart button on a product card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "state", content = "remaining")]
pub enum PurchaseAvailability {
    /// Button enabled, no warning.
    Available,
    /// Button enabled with a "last N units" warning.
    LastUnits(u32),
    /// Button disabled.
    SoldOut,
}

impl PurchaseAvailability {
    /// Classifies a remaining-visible count.
    pub fn from_remaining(remaining: u32) -> Self {
        if remaining == 0 {
            PurchaseAvailability::SoldOut
        } else if remaining <= LAST_UNITS_THRESHOLD {
            PurchaseAvailability::LastUnits(remaining)
        } else {
            PurchaseAvailability::Available
        }
    }

    /// Whether the add-to-cart action should be offered at all.
    pub fn can_add(&self) -> bool {
        !matches!(self, PurchaseAvailability::SoldOut)
    }
}

/// Everything the view needs to render one product's stock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockView {
    pub product_id: ProductId,
    /// Ledger stock, reserved units included.
    pub available: u32,
    /// Stock not yet placed in the cart.
    pub remaining: u32,
    pub status: StockStatus,
    pub availability: PurchaseAvailability,
}

impl StockView {
    /// Builds the view from ledger stock and the quantity already reserved.
    pub fn new(product_id: ProductId, available: u32, reserved: u32) -> Self {
        let remaining = available.saturating_sub(reserved);
        StockView {
            product_id,
            available,
            remaining,
            status: StockStatus::from_remaining(remaining),
            availability: PurchaseAvailability::from_remaining(remaining),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_borrow_and_display() {
        let id = ProductId::from("air-cooler");
        let as_str: &str = id.borrow();
        assert_eq!(as_str, "air-cooler");
        assert_eq!(id.to_string(), "air-cooler");
    }

    #[test]
    fn test_stock_status_thresholds() {
        assert_eq!(StockStatus::from_remaining(0), StockStatus::SoldOut);
        assert_eq!(StockStatus::from_remaining(1), StockStatus::Low);
        assert_eq!(StockStatus::from_remaining(5), StockStatus::Low);
        assert_eq!(StockStatus::from_remaining(6), StockStatus::Available);
    }

    #[test]
    fn test_purchase_availability_thresholds() {
        assert_eq!(
            PurchaseAvailability::from_remaining(0),
            PurchaseAvailability::SoldOut
        );
        assert_eq!(
            PurchaseAvailability::from_remaining(3),
            PurchaseAvailability::LastUnits(3)
        );
        assert_eq!(
            PurchaseAvailability::from_remaining(4),
            PurchaseAvailability::Available
        );
        assert!(!PurchaseAvailability::SoldOut.can_add());
        assert!(PurchaseAvailability::LastUnits(1).can_add());
    }

    #[test]
    fn test_stock_view_saturates() {
        let view = StockView::new(ProductId::from("fonte-kmex"), 3, 5);
        assert_eq!(view.remaining, 0);
        assert_eq!(view.status, StockStatus::SoldOut);
    }

    #[test]
    fn test_availability_serializes_tagged() {
        let json = serde_json::to_string(&PurchaseAvailability::LastUnits(2)).unwrap();
        assert_eq!(json, r#"{"state":"last_units","remaining":2}"#);
    }
}
