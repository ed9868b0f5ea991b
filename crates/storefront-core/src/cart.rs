//! # Cart
//!
//! The shopper's line items, bounded by the inventory ledger.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  View Action              Cart Method          Ledger Check             │
//! │  ───────────              ───────────          ────────────             │
//! │                                                                         │
//! │  Click "Comprar" ───────► add() ─────────────► stock > 0,              │
//! │                                                reserved < stock         │
//! │                                                                         │
//! │  +/- on cart row ───────► set_quantity() ────► qty <= stock            │
//! │                                                (qty < 1 removes)        │
//! │                                                                         │
//! │  Click "Remover" ───────► remove() ──────────► none (absent = no-op)   │
//! │                                                                         │
//! │  Order committed ───────► clear() ───────────► none                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per product id (repeated adds increment)
//! - Every quantity is >= 1
//! - Every quantity is <= the ledger's stock for that product

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::inventory::InventoryLedger;
use crate::money::Money;
use crate::types::ProductId;
use crate::validation::{validate_price, validate_product_id, validate_product_name};

// =============================================================================
// Cart Item
// =============================================================================

/// One product's entry in the cart.
///
/// Name and unit price are frozen when the line is created; later adds of
/// the same product only bump the quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl CartItem {
    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Cart
// =============================================================================

/// Insertion-ordered line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Quantity reserved for a product (0 if absent).
    pub fn quantity_of(&self, product_id: &str) -> u32 {
        self.items
            .iter()
            .filter(|i| i.product_id.as_str() == product_id)
            .map(|i| i.quantity)
            .sum()
    }

    /// Adds one unit of a product.
    ///
    /// ## Behavior
    /// - Stock is zero: `OutOfStock`
    /// - Cart already holds every unit in stock: `LimitReached`
    /// - Product already in cart: quantity + 1
    /// - Otherwise: new line with quantity 1
    ///
    /// ## Returns
    /// The product's quantity after the add.
    pub fn add(
        &mut self,
        ledger: &InventoryLedger,
        product_id: &str,
        name: &str,
        unit_price: Money,
    ) -> CoreResult<u32> {
        validate_product_id(product_id)?;
        validate_product_name(name)?;
        validate_price(unit_price)?;

        let stock = ledger.available_stock(product_id);
        if stock == 0 {
            return Err(CoreError::OutOfStock {
                product_id: product_id.to_string(),
            });
        }

        if self.quantity_of(product_id) >= stock {
            return Err(CoreError::LimitReached {
                product_id: product_id.to_string(),
                available: stock,
            });
        }

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|i| i.product_id.as_str() == product_id)
        {
            item.quantity += 1;
            return Ok(item.quantity);
        }

        self.items.push(CartItem {
            product_id: ProductId::new(product_id),
            name: name.trim().to_string(),
            unit_price,
            quantity: 1,
        });
        Ok(1)
    }

    /// Sets a line's quantity exactly.
    ///
    /// ## Behavior
    /// - `quantity < 1`: same as [`Cart::remove`]
    /// - Product has no line: `ProductNotInCart`
    /// - `quantity` above raw ledger stock: `LimitReached` (there is only one
    ///   line per product, so no other lines compete for the same stock)
    pub fn set_quantity(
        &mut self,
        ledger: &InventoryLedger,
        product_id: &str,
        quantity: u32,
    ) -> CoreResult<()> {
        if quantity < 1 {
            self.remove(product_id);
            return Ok(());
        }

        let stock = ledger.available_stock(product_id);
        let item = self
            .items
            .iter_mut()
            .find(|i| i.product_id.as_str() == product_id)
            .ok_or_else(|| CoreError::ProductNotInCart {
                product_id: product_id.to_string(),
            })?;

        if quantity > stock {
            return Err(CoreError::LimitReached {
                product_id: product_id.to_string(),
                available: stock,
            });
        }

        item.quantity = quantity;
        Ok(())
    }

    /// Removes a product's line. Returns whether a line was removed; an
    /// absent product is not an error.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.product_id.as_str() != product_id);
        self.items.len() != initial_len
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns the number of distinct products in the cart.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities (the header badge).
    pub fn total_item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Σ unit price × quantity.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(entries: &[(&str, u32)]) -> InventoryLedger {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_cart_add_item() {
        let ledger = ledger(&[("air-cooler", 15)]);
        let mut cart = Cart::new();

        let qty = cart
            .add(&ledger, "air-cooler", "Air Cooler", Money::from_cents(8990))
            .unwrap();

        assert_eq!(qty, 1);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_item_count(), 1);
        assert_eq!(cart.subtotal(), Money::from_cents(8990));
    }

    #[test]
    fn test_cart_add_same_product_increases_quantity() {
        let ledger = ledger(&[("air-cooler", 15)]);
        let mut cart = Cart::new();

        cart.add(&ledger, "air-cooler", "Air Cooler", Money::from_cents(8990))
            .unwrap();
        let qty = cart
            .add(&ledger, "air-cooler", "Air Cooler", Money::from_cents(8990))
            .unwrap();

        assert_eq!(qty, 2);
        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.subtotal(), Money::from_cents(17980));
    }

    #[test]
    fn test_cart_keeps_first_price() {
        let ledger = ledger(&[("air-cooler", 15)]);
        let mut cart = Cart::new();

        cart.add(&ledger, "air-cooler", "Air Cooler", Money::from_cents(8990))
            .unwrap();
        cart.add(&ledger, "air-cooler", "Air Cooler", Money::from_cents(100))
            .unwrap();

        assert_eq!(cart.subtotal(), Money::from_cents(17980));
    }

    #[test]
    fn test_cart_insertion_order() {
        let ledger = ledger(&[("a", 5), ("b", 5)]);
        let mut cart = Cart::new();

        cart.add(&ledger, "b", "B", Money::from_cents(100)).unwrap();
        cart.add(&ledger, "a", "A", Money::from_cents(100)).unwrap();
        cart.add(&ledger, "b", "B", Money::from_cents(100)).unwrap();

        let ids: Vec<&str> = cart.items().iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_cart_add_out_of_stock() {
        let ledger = ledger(&[("P1", 0)]);
        let mut cart = Cart::new();

        let err = cart
            .add(&ledger, "P1", "Product 1", Money::from_cents(1000))
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::OutOfStock {
                product_id: "P1".to_string()
            }
        );
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_add_unknown_product_is_out_of_stock() {
        let ledger = InventoryLedger::new();
        let mut cart = Cart::new();

        let err = cart
            .add(&ledger, "ghost", "Ghost", Money::from_cents(1000))
            .unwrap_err();
        assert!(matches!(err, CoreError::OutOfStock { .. }));
    }

    #[test]
    fn test_cart_add_limit_reached() {
        let ledger = ledger(&[("P1", 3)]);
        let mut cart = Cart::new();

        for _ in 0..3 {
            cart.add(&ledger, "P1", "Product 1", Money::from_cents(1000))
                .unwrap();
        }
        let err = cart
            .add(&ledger, "P1", "Product 1", Money::from_cents(1000))
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::LimitReached {
                product_id: "P1".to_string(),
                available: 3
            }
        );
        assert_eq!(cart.quantity_of("P1"), 3);
    }

    #[test]
    fn test_cart_add_rejects_bad_input() {
        let ledger = ledger(&[("P1", 3)]);
        let mut cart = Cart::new();

        assert!(matches!(
            cart.add(&ledger, "", "Product", Money::from_cents(1)),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            cart.add(&ledger, "P1", "  ", Money::from_cents(1)),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            cart.add(&ledger, "P1", "Product", Money::from_cents(-1)),
            Err(CoreError::Validation(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity() {
        let ledger = ledger(&[("P1", 5)]);
        let mut cart = Cart::new();
        cart.add(&ledger, "P1", "Product 1", Money::from_cents(1000))
            .unwrap();

        cart.set_quantity(&ledger, "P1", 5).unwrap();
        assert_eq!(cart.quantity_of("P1"), 5);

        let err = cart.set_quantity(&ledger, "P1", 6).unwrap_err();
        assert!(matches!(err, CoreError::LimitReached { available: 5, .. }));
        assert_eq!(cart.quantity_of("P1"), 5);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let ledger = ledger(&[("P1", 5)]);
        let mut cart = Cart::new();
        cart.add(&ledger, "P1", "Product 1", Money::from_cents(1000))
            .unwrap();

        cart.set_quantity(&ledger, "P1", 0).unwrap();
        assert!(cart.is_empty());

        // Absent product with zero quantity is still a no-op
        cart.set_quantity(&ledger, "P1", 0).unwrap();
    }

    #[test]
    fn test_set_quantity_not_in_cart() {
        let ledger = ledger(&[("P1", 5)]);
        let mut cart = Cart::new();

        let err = cart.set_quantity(&ledger, "P1", 2).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotInCart { .. }));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let ledger = ledger(&[("P1", 5)]);
        let mut cart = Cart::new();
        cart.add(&ledger, "P1", "Product 1", Money::from_cents(1000))
            .unwrap();

        assert!(cart.remove("P1"));
        assert!(!cart.remove("P1"));
        assert!(!cart.remove("P1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_cart_clear() {
        let ledger = ledger(&[("P1", 5), ("P2", 5)]);
        let mut cart = Cart::new();
        cart.add(&ledger, "P1", "Product 1", Money::from_cents(1000))
            .unwrap();
        cart.add(&ledger, "P2", "Product 2", Money::from_cents(1000))
            .unwrap();
        assert_eq!(cart.total_item_count(), 2);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total_item_count(), 0);
    }
}
