//! Checkout quote computation for the purchase modal.
//!
//! `total = price * quantity * (1 - 0.1 * has_referral_code)`, computed with
//! exact decimals and rounded to cents only for display.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::Price;

/// Flat referral discount, in percent.
pub const REFERRAL_DISCOUNT_PERCENT: u32 = 10;

/// Quote lookup errors.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
}

/// Subtotal, discount and total for one product line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    /// Price per unit.
    pub unit_price: Price,
    /// Effective quantity (never zero).
    pub quantity: u32,
    /// `unit_price * quantity`.
    pub subtotal: Price,
    /// Referral discount, zero without a referral code.
    pub discount: Price,
    /// `subtotal - discount`.
    pub total: Price,
}

impl Quote {
    /// Compute a quote. Any non-blank referral code earns the flat discount.
    #[must_use]
    pub fn new(unit_price: Price, quantity: u32, referral_code: &str) -> Self {
        let quantity = quantity.max(1);
        let subtotal = unit_price * quantity;
        let discount = if referral_code.trim().is_empty() {
            Price::ZERO
        } else {
            subtotal.scale(Decimal::new(i64::from(REFERRAL_DISCOUNT_PERCENT), 2))
        };

        Self {
            unit_price,
            quantity,
            subtotal,
            discount,
            total: subtotal - discount,
        }
    }

    /// Compute a quote from raw form input.
    ///
    /// See [`parse_quantity`] for how the quantity field is read.
    #[must_use]
    pub fn from_input(unit_price: Price, quantity_input: &str, referral_code: &str) -> Self {
        Self::new(unit_price, parse_quantity(quantity_input), referral_code)
    }
}

/// Read the leading integer of a quantity field.
///
/// Leading whitespace and an optional sign are accepted and parsing stops at
/// the first non-digit (`"12abc"` is 12). Empty, unparsable, zero and negative
/// input all fall back to 1. Values past `u32::MAX` saturate.
#[must_use]
pub fn parse_quantity(input: &str) -> u32 {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, trimmed.get(1..).unwrap_or_default()),
        Some(b'+') => (false, trimmed.get(1..).unwrap_or_default()),
        _ => (false, trimmed),
    };

    let mut seen_digit = false;
    let mut value: u32 = 0;
    for digit in digits.chars().map_while(|c| c.to_digit(10)) {
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(digit);
    }

    if !seen_digit || negative || value == 0 {
        1
    } else {
        value
    }
}
