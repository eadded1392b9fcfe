//! DonutMarket Storefront library.
//!
//! This crate provides the storefront server as a library, allowing it to be
//! tested end to end and reused by the operator CLI (ticket relay and queue).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod discord;
pub mod error;
pub mod middleware;
pub mod models;
pub mod relay;
pub mod routes;
pub mod state;
pub mod stores;

pub use routes::app;
pub use state::AppState;
