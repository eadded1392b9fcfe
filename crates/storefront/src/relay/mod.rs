//! Purchase ticket handoff to the companion Discord bot.
//!
//! Two delivery policies, picked once at startup from the deployment
//! environment:
//!
//! - [`FileDropQueue`] writes `ticket_<transactionId>.json` into a directory
//!   the bot polls (production).
//! - [`WebhookRelay`] checks the bot's health endpoint and then POSTs the
//!   ticket to its webhook (development).
//!
//! Delivery is best-effort. Callers log failures and carry on.

mod file_drop;
mod webhook;

pub use file_drop::FileDropQueue;
pub use webhook::{DELIVERY_TIMEOUT, HEALTH_TIMEOUT, WebhookRelay};

use std::path::PathBuf;

use donut_market_core::{Ticket, TransactionIdError};
use serde_json::Value;
use thiserror::Error;

use crate::config::{RelayConfig, RelayMode};

/// Errors that can occur while handing a ticket to the bot.
#[derive(Debug, Error)]
pub enum RelayError {
    /// HTTP request failed (connection refused, timeout, bad body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The companion health check did not answer with a success status.
    #[error("Discord bot is offline: {0}")]
    Offline(String),

    /// The webhook answered with a non-success status.
    #[error("Webhook error: {status} - {message}")]
    Webhook { status: u16, message: String },

    /// Reading or writing the ticket directory failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The transaction id cannot name a ticket file.
    #[error("Transaction id is not usable as a file name: {0}")]
    UnusableId(#[from] TransactionIdError),

    /// A ticket file could not be encoded or decoded.
    #[error("Invalid ticket file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The configured delivery policy.
#[derive(Debug, Clone)]
pub enum TicketRelay {
    FileDrop(FileDropQueue),
    Webhook(WebhookRelay),
}

impl TicketRelay {
    /// Build the relay selected by the configuration.
    #[must_use]
    pub fn from_config(config: &RelayConfig) -> Self {
        match config.mode {
            RelayMode::FileDrop => Self::FileDrop(FileDropQueue::new(&config.tickets_dir)),
            RelayMode::Webhook => Self::Webhook(WebhookRelay::from_config(config)),
        }
    }

    /// Hand the ticket over and return the receipt.
    ///
    /// The receipt is `{success: true, ticket_id}` for file-drop and the
    /// companion's response body for webhook delivery.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written (including a
    /// transaction id that cannot name one), or if the companion is offline
    /// or rejects the ticket.
    pub async fn deliver(&self, ticket: &Ticket) -> Result<Value, RelayError> {
        match self {
            Self::FileDrop(queue) => queue.enqueue(ticket).await,
            Self::Webhook(webhook) => webhook.deliver(ticket).await,
        }
    }
}
