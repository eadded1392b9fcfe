//! The hardcoded product table shown on the storefront.
//!
//! Prices here are display-only. Nothing on the server checks a submitted
//! total against this table.

use serde::Serialize;

use crate::Price;

/// A product listed on the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    /// Display name, also the lookup key.
    pub name: &'static str,
    /// Price per unit.
    pub price: Price,
    /// Unit suffix shown after the price (e.g. `"/M"` for per million coins).
    pub unit: &'static str,
}

impl Product {
    /// Price label as shown in the purchase modal, e.g. `"$0.18/M"`.
    ///
    /// Uses plain number formatting, so trailing zeros are dropped.
    #[must_use]
    pub fn price_label(&self) -> String {
        format!("${}{}", self.price.amount().normalize(), self.unit)
    }
}

/// The product table.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Look up a product by its display name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// All products in display order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            products: vec![
                Product {
                    name: "DonutSMP Coins",
                    price: Price::from_cents(18),
                    unit: "/M",
                },
                Product {
                    name: "Elytra",
                    price: Price::from_cents(3099),
                    unit: "",
                },
                Product {
                    name: "Netherite Armor",
                    price: Price::from_cents(1999),
                    unit: "",
                },
                Product {
                    name: "Skeleton Spawner",
                    price: Price::from_cents(23),
                    unit: "",
                },
                Product {
                    name: "Mystery Box",
                    price: Price::from_cents(599),
                    unit: "",
                },
            ],
        }
    }
}
