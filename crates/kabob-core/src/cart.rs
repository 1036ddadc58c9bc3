//! # Cart State Store
//!
//! Holds the working order for the current browsing session.
//!
//! ## Cart Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  User Action              Cart Method             Line Change           │
//! │  ───────────              ───────────             ───────────           │
//! │                                                                         │
//! │  Click "Add" ────────────► add_item() ──────────► qty += 1 / new line   │
//! │                                                                         │
//! │  Change Quantity ────────► update_quantity() ───► qty = n (n ≤ 0 drops) │
//! │                                                                         │
//! │  Click Remove ───────────► remove_item() ───────► line dropped          │
//! │                                                                         │
//! │  Order placed / Clear ───► clear() ─────────────► all lines dropped     │
//! │                                                                         │
//! │  View Cart ──────────────► lines(), total() ────► (read only)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - At most one line per `item_id`
//! - Every stored quantity is in `1..=MAX_CART_QUANTITY`
//! - `total()` is recomputed from the lines on every call
//!
//! The cart is purely in-memory. It is never persisted and never validated
//! against the remote catalog after an item was added.

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::MenuItem;
use crate::validation::validate_cart_quantity;

/// One catalog item with a quantity in the in-progress order.
///
/// Name and price are captured when the item is first added, so the cart
/// shows consistent data even if the catalog is refetched afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub item_id: String,
    pub name: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl CartLine {
    fn from_item(item: &MenuItem) -> Self {
        CartLine {
            item_id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity: 1,
        }
    }

    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in insertion order, for stable display.
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of a catalog item.
    ///
    /// ## Behavior
    /// - Item already in cart: quantity increases by exactly 1
    /// - Item not in cart: new line with quantity 1
    /// - Line already at [`MAX_CART_QUANTITY`](crate::MAX_CART_QUANTITY): error, cart unchanged
    ///
    /// Returns the line's new quantity.
    pub fn add_item(&mut self, item: &MenuItem) -> CoreResult<i64> {
        if let Some(line) = self.find_mut(&item.id) {
            validate_cart_quantity(line.quantity + 1)?;
            line.quantity += 1;
            return Ok(line.quantity);
        }

        self.lines.push(CartLine::from_item(item));
        Ok(1)
    }

    /// Removes the line for `item_id`.
    ///
    /// Returns `true` if a line was removed; a missing id is a no-op.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.item_id != item_id);
        self.lines.len() != before
    }

    /// Sets the quantity of an existing line.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: same as [`Cart::remove_item`]
    /// - `quantity > MAX_CART_QUANTITY`: error, cart unchanged
    /// - Item not in cart: no-op (never creates a line)
    ///
    /// Returns `true` if the cart changed.
    pub fn update_quantity(&mut self, item_id: &str, quantity: i64) -> CoreResult<bool> {
        if quantity <= 0 {
            return Ok(self.remove_item(item_id));
        }
        validate_cart_quantity(quantity)?;

        Ok(match self.find_mut(item_id) {
            Some(line) if line.quantity != quantity => {
                line.quantity = quantity;
                true
            }
            _ => false,
        })
    }

    /// Σ(unit price × quantity) over the current lines.
    pub fn total(&self) -> Money {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Removes every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, item_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.item_id == item_id)
    }

    /// Number of distinct items.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total number of units, shown as the cart badge.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn find_mut(&mut self, item_id: &str) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.item_id == item_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::MAX_CART_QUANTITY;
    use std::collections::HashSet;

    fn menu_item(id: &str, price_cents: i64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: format!("Item {}", id),
            description: String::new(),
            price: Money::from_cents(price_cents),
            category: "Kabobs".to_string(),
            image_url: None,
            available: true,
        }
    }

    fn assert_invariants(cart: &Cart) {
        let mut seen = HashSet::new();
        for line in cart.lines() {
            assert!(line.quantity > 0, "non-positive quantity in {:?}", line);
            assert!(seen.insert(line.item_id.clone()), "duplicate {}", line.item_id);
        }
        let expected: i64 = cart
            .lines()
            .iter()
            .map(|l| l.unit_price.cents() * l.quantity)
            .sum();
        assert_eq!(cart.total().cents(), expected);
    }

    #[test]
    fn test_add_new_item_starts_at_one() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item("a", 1299)).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.line("a").unwrap().quantity, 1);
        assert_eq!(cart.total().cents(), 1299);
    }

    #[test]
    fn test_add_existing_item_increments_by_one() {
        let mut cart = Cart::new();
        let item = menu_item("a", 1299);

        cart.add_item(&item).unwrap();
        cart.add_item(&item).unwrap();
        cart.add_item(&item).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.line("a").unwrap().quantity, 3);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item("a", 100)).unwrap();

        assert!(!cart.remove_item("zzz"));
        assert_eq!(cart.line_count(), 1);
        assert!(cart.remove_item("a"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item("a", 100)).unwrap();
        cart.add_item(&menu_item("b", 200)).unwrap();

        assert!(cart.update_quantity("a", 0).unwrap());
        assert!(cart.line("a").is_none());

        assert!(cart.update_quantity("b", -4).unwrap());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_missing_item_creates_nothing() {
        let mut cart = Cart::new();
        assert!(!cart.update_quantity("ghost", 5).unwrap());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item("a", 250)).unwrap();

        assert!(cart.update_quantity("a", 4).unwrap());
        assert_eq!(cart.total().cents(), 1000);
        // Same value again is not a change
        assert!(!cart.update_quantity("a", 4).unwrap());
    }

    #[test]
    fn test_total_independent_of_insertion_order() {
        let items = [menu_item("a", 1299), menu_item("b", 499), menu_item("c", 699)];

        let mut forward = Cart::new();
        for item in &items {
            forward.add_item(item).unwrap();
        }
        forward.update_quantity("b", 3).unwrap();

        let mut backward = Cart::new();
        for item in items.iter().rev() {
            backward.add_item(item).unwrap();
        }
        backward.update_quantity("b", 3).unwrap();

        assert_eq!(forward.total(), backward.total());
        assert_eq!(forward.total().cents(), 1299 + 3 * 499 + 699);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item("a", 100)).unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.total().is_zero());
    }

    /// Drives a long deterministic mix of operations and checks the
    /// invariants after every step.
    #[test]
    fn test_invariants_hold_for_operation_sequences() {
        let items: Vec<MenuItem> = (0..6).map(|i| menu_item(&i.to_string(), 100 + i)).collect();
        let mut cart = Cart::new();
        let mut seed: u64 = 0x2545_F491_4F6C_DD1D;

        for _ in 0..2_000 {
            // xorshift64
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;

            let item = &items[(seed % items.len() as u64) as usize];
            match (seed >> 8) % 4 {
                0 | 1 => {
                    let _ = cart.add_item(item);
                }
                2 => {
                    cart.remove_item(&item.id);
                }
                _ => {
                    let qty = match (seed >> 16) % 8 {
                        7 => i64::MAX,
                        6 => MAX_CART_QUANTITY,
                        n => n as i64 - 2, // -2..=3
                    };
                    let _ = cart.update_quantity(&item.id, qty);
                }
            }
            assert_invariants(&cart);
        }
    }

    #[test]
    fn test_update_quantity_above_ceiling_is_rejected() {
        let mut cart = Cart::new();
        cart.add_item(&menu_item("a", 1299)).unwrap();

        let err = cart.update_quantity("a", i64::MAX).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(cart.line("a").unwrap().quantity, 1);

        assert!(cart.update_quantity("a", MAX_CART_QUANTITY).unwrap());
        assert_eq!(cart.total().cents(), 1299 * MAX_CART_QUANTITY);
    }

    #[test]
    fn test_add_item_stops_at_ceiling() {
        let mut cart = Cart::new();
        let item = menu_item("a", 250);
        cart.add_item(&item).unwrap();
        cart.update_quantity("a", MAX_CART_QUANTITY).unwrap();

        assert!(cart.add_item(&item).is_err());
        assert_eq!(cart.line("a").unwrap().quantity, MAX_CART_QUANTITY);
        assert_eq!(cart.item_count(), MAX_CART_QUANTITY);
        assert_invariants(&cart);
    }
}
