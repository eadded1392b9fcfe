//! Core types for DonutMarket.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;

pub use id::{TransactionId, TransactionIdError};
pub use price::Price;
