//! # Inventory Ledger
//!
//! Available stock per product. The ledger is only ever decremented by an
//! order commit; adding to the cart *reserves* units without touching it.
//!
//! ## Reservation Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ledger{fonte-kmex: 3}     cart{fonte-kmex: 2}                          │
//! │                                                                         │
//! │  available_stock   = 3     (ledger value)                               │
//! │  reserved_quantity = 2     (cart snapshot)                              │
//! │  remaining_visible = 1     (what the product card shows)                │
//! │                                                                         │
//! │  commit_deduction(cart) ──► ledger{fonte-kmex: 1}                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cart::Cart;
use crate::types::{ProductId, PurchaseAvailability, StockStatus, StockView};
use crate::DEFAULT_STOCK;

/// Product id → available stock.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryLedger {
    stock: BTreeMap<ProductId, u32>,
}

impl InventoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger seeded with the storefront's launch catalog.
    pub fn with_default_stock() -> Self {
        DEFAULT_STOCK.iter().copied().collect()
    }

    /// Sets a product's stock. Setup only; checkout uses
    /// [`InventoryLedger::commit_deduction`].
    pub fn set_stock(&mut self, product_id: impl Into<ProductId>, count: u32) {
        self.stock.insert(product_id.into(), count);
    }

    /// Current stock. Unknown products have none.
    pub fn available_stock(&self, product_id: &str) -> u32 {
        self.stock.get(product_id).copied().unwrap_or(0)
    }

    /// Units of a product placed in `cart`.
    pub fn reserved_quantity(&self, cart: &Cart, product_id: &str) -> u32 {
        cart.quantity_of(product_id)
    }

    /// Stock not yet placed in the cart. Never negative.
    pub fn remaining_visible(&self, cart: &Cart, product_id: &str) -> u32 {
        self.available_stock(product_id)
            .saturating_sub(self.reserved_quantity(cart, product_id))
    }

    /// Badge state for the product card stock counter.
    pub fn stock_status(&self, cart: &Cart, product_id: &str) -> StockStatus {
        StockStatus::from_remaining(self.remaining_visible(cart, product_id))
    }

    /// Add-to-cart button state.
    pub fn purchase_availability(&self, cart: &Cart, product_id: &str) -> PurchaseAvailability {
        PurchaseAvailability::from_remaining(self.remaining_visible(cart, product_id))
    }

    /// Stock views for every product the ledger knows, ordered by id.
    pub fn stock_views(&self, cart: &Cart) -> Vec<StockView> {
        self.stock
            .iter()
            .map(|(id, &available)| {
                StockView::new(id.clone(), available, cart.quantity_of(id.as_str()))
            })
            .collect()
    }

    /// Permanently deducts every cart line from stock, clamping at zero.
    ///
    /// Products the ledger does not know are skipped rather than inserted.
    pub fn commit_deduction(&mut self, cart: &Cart) {
        for item in cart.items() {
            if let Some(stock) = self.stock.get_mut(item.product_id.as_str()) {
                *stock = stock.saturating_sub(item.quantity);
            }
        }
    }

    /// Number of products tracked.
    pub fn len(&self) -> usize {
        self.stock.len()
    }

    /// Whether the ledger tracks no products.
    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }
}

impl<K: Into<ProductId>> FromIterator<(K, u32)> for InventoryLedger {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        InventoryLedger {
            stock: iter.into_iter().map(|(id, n)| (id.into(), n)).collect(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
