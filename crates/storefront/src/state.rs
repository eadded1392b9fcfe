//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::discord::DiscordClient;
use crate::relay::{TicketRelay, WebhookRelay};
use crate::stores::StoreDirectory;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Everything in it is read-only
/// after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    discord: DiscordClient,
    relay: TicketRelay,
    webhook: WebhookRelay,
    stores: StoreDirectory,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let discord = DiscordClient::new(&config.discord);
        let relay = TicketRelay::from_config(&config.relay);
        let webhook = WebhookRelay::from_config(&config.relay);
        let stores = StoreDirectory::new(&config.stores_dir);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                discord,
                relay,
                webhook,
                stores,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Discord OAuth client.
    #[must_use]
    pub fn discord(&self) -> &DiscordClient {
        &self.inner.discord
    }

    /// The ticket delivery policy for `/api/create-ticket`.
    #[must_use]
    pub fn relay(&self) -> &TicketRelay {
        &self.inner.relay
    }

    /// Direct webhook access for `/api/test-ticket`, whatever the policy.
    #[must_use]
    pub fn webhook(&self) -> &WebhookRelay {
        &self.inner.webhook
    }

    #[must_use]
    pub fn stores(&self) -> &StoreDirectory {
        &self.inner.stores
    }
}
