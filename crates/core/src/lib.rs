//! DonutMarket Core - Shared storefront types.
//!
//! This crate provides the types shared by the storefront server and the
//! operator CLI:
//! - `storefront` - Public storefront, Discord login and ticket relay
//! - `cli` - Ticket queue tooling, quotes and cart previews
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no filesystem access.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for prices and transaction ids
//! - [`catalog`] - The hardcoded product table
//! - [`quote`] - Subtotal, referral discount and total
//! - [`modal`] - Purchase modal state machine and notifications
//! - [`cart`] - In-page cart
//! - [`ticket`] - Purchase ticket payload and its presence rule

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod modal;
pub mod quote;
pub mod ticket;
pub mod types;

pub use cart::{Cart, CartLine};
pub use catalog::{Catalog, Product};
pub use modal::{
    ModalForm, ModalState, Notification, NotificationKind, PendingPurchase, PurchaseModal,
    SubmitError,
};
pub use quote::{Quote, QuoteError, REFERRAL_DISCOUNT_PERCENT, parse_quantity};
pub use ticket::{Ticket, TicketError, TicketSubmission, value_text};
pub use types::*;
