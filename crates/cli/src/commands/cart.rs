//! Cart preview.
//!
//! ```bash
//! dm-cli cart --add Elytra --add "DonutSMP Coins=100" --add Elytra=2
//! ```

use donut_market_core::{Cart, Catalog, Product, QuoteError, parse_quantity};

/// Fill a cart from `NAME` or `NAME=QUANTITY` entries.
///
/// Quantities are read like the checkout form reads them.
fn build(catalog: &Catalog, entries: &[String]) -> Result<Cart, QuoteError> {
    let mut cart = Cart::default();
    for entry in entries {
        let (name, quantity) = match entry.rsplit_once('=') {
            Some((name, quantity)) => (name.trim(), parse_quantity(quantity)),
            None => (entry.trim(), 1),
        };
        if !cart.add(catalog, name, quantity) {
            return Err(QuoteError::UnknownProduct(name.to_string()));
        }
    }
    Ok(cart)
}

fn render(catalog: &Catalog, cart: &Cart) -> String {
    let mut out = cart.nav_label();
    for line in cart.lines() {
        let label = catalog
            .get(&line.name)
            .map(Product::price_label)
            .unwrap_or_default();
        out.push_str(&format!("\n  {} x{}  {label}", line.name, line.quantity));
    }
    out
}

/// Print the cart built from `entries`.
///
/// # Errors
///
/// Returns [`QuoteError::UnknownProduct`] for names not in the shop.
#[allow(clippy::print_stdout)]
pub fn print(entries: &[String]) -> Result<(), QuoteError> {
    let catalog = Catalog::default();
    let cart = build(&catalog, entries)?;
    println!("{}", render(&catalog, &cart));
    Ok(())
}
