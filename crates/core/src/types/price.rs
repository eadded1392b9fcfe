//! Decimal prices for the storefront catalog and checkout quotes.

use core::fmt;
use core::ops::{Mul, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price in US dollars.
///
/// Arithmetic is exact; rounding happens only when formatting for display.
///
/// ```
/// use donut_market_core::Price;
///
/// let price = Price::from_cents(18);
/// assert_eq!((price * 100u32).to_string(), "$18.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount in dollars.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The exact, unrounded amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Scale this price by a decimal ratio (e.g. `0.1` for 10%).
    #[must_use]
    pub fn scale(self, ratio: Decimal) -> Self {
        Self(self.0 * ratio)
    }

    /// The amount rounded half away from zero to two decimal places.
    #[must_use]
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Two-decimal display string without the currency symbol, e.g. `"16.20"`.
    #[must_use]
    pub fn display_amount(&self) -> String {
        format!("{:.2}", self.rounded())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.display_amount())
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, rhs: u32) -> Self::Output {
        Self(self.0 * Decimal::from(rhs))
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(1899).amount(), Decimal::new(1899, 2));
        assert_eq!(Price::from_cents(-5).amount(), Decimal::new(-5, 2));
    }

    #[test]
    fn test_display_pads_two_decimals() {
        assert_eq!(Price::from_cents(1800).to_string(), "$18.00");
        assert_eq!(Price::new(Decimal::new(5, 1)).to_string(), "$0.50");
    }

    #[test]
    fn test_display_rounds_half_away_from_zero() {
        assert_eq!(Price::new(Decimal::new(1_005, 3)).display_amount(), "1.01");
        assert_eq!(Price::new(Decimal::new(1_004, 3)).display_amount(), "1.00");
    }

    #[test]
    fn test_multiplication_is_exact() {
        let price = Price::from_cents(23) * 3;
        assert_eq!(price.amount(), Decimal::new(69, 2));
    }

    #[test]
    fn test_scale_and_subtract() {
        let subtotal = Price::from_cents(1800);
        let discount = subtotal.scale(Decimal::new(1, 1));
        assert_eq!(discount.display_amount(), "1.80");
        assert_eq!((subtotal - discount).display_amount(), "16.20");
    }
}
