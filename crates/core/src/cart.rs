//! In-page shopping cart.
//!
//! Lives only for the lifetime of a page; nothing is persisted or sent to
//! the server.

use serde::Serialize;

use crate::{Catalog, Price};

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub name: String,
    pub price: Price,
    pub quantity: u32,
}

/// A list of cart lines, one per product.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Add `quantity` of a catalog product, merging with an existing line.
    ///
    /// Returns `false` (and leaves the cart untouched) for unknown products.
    pub fn add(&mut self, catalog: &Catalog, name: &str, quantity: u32) -> bool {
        let Some(product) = catalog.get(name) else {
            return false;
        };

        if let Some(line) = self.lines.iter_mut().find(|line| line.name == name) {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                name: product.name.to_string(),
                price: product.price,
                quantity,
            });
        }
        true
    }

    /// Total number of items across all lines.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |acc, line| acc.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Navigation label, `"Cart (3)"` or just `"Cart"` when empty.
    #[must_use]
    pub fn nav_label(&self) -> String {
        match self.count() {
            0 => "Cart".to_string(),
            n => format!("Cart ({n})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_merges_same_product() {
        let catalog = Catalog::default();
        let mut cart = Cart::default();
        assert!(cart.add(&catalog, "Elytra", 1));
        assert!(cart.add(&catalog, "Mystery Box", 2));
        assert!(cart.add(&catalog, "Elytra", 3));

        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[0].quantity, 4);
        assert_eq!(cart.count(), 6);
    }

    #[test]
    fn test_add_unknown_product() {
        let mut cart = Cart::default();
        assert!(!cart.add(&Catalog::default(), "Beacon", 1));
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn test_nav_label() {
        let mut cart = Cart::default();
        assert_eq!(cart.nav_label(), "Cart");
        cart.add(&Catalog::default(), "Elytra", 2);
        assert_eq!(cart.nav_label(), "Cart (2)");
    }
}
