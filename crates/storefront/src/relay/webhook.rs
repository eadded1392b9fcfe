//! HTTP delivery to the companion bot's webhook.

use std::time::Duration;

use donut_market_core::Ticket;
use serde_json::Value;

use super::RelayError;
use crate::config::RelayConfig;

/// Timeout for the health check before each delivery.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

/// Timeout for the ticket POST.
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the companion bot's `/health` and `/webhook/purchase`.
#[derive(Debug, Clone)]
pub struct WebhookRelay {
    client: reqwest::Client,
    webhook_url: String,
    health_url: String,
}

impl WebhookRelay {
    #[must_use]
    pub fn new(webhook_url: impl Into<String>, health_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            webhook_url: webhook_url.into(),
            health_url: health_url.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &RelayConfig) -> Self {
        Self::new(config.webhook_url.clone(), config.health_url.clone())
    }

    #[must_use]
    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    /// Check that the companion is up.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Offline`] if the health check fails, times out or gets
    /// a non-success status.
    pub async fn check_health(&self) -> Result<(), RelayError> {
        let response = self
            .client
            .get(&self.health_url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| RelayError::Offline(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RelayError::Offline(format!(
                "health check returned {}",
                response.status()
            )));
        }
        Ok(())
    }

    /// POST a ticket to the webhook without probing first.
    ///
    /// Returns the response body as JSON, or as a JSON string when the body
    /// is not JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, times out or the webhook
    /// answers with a non-success status.
    pub async fn post(&self, ticket: &Ticket) -> Result<Value, RelayError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .timeout(DELIVERY_TIMEOUT)
            .json(ticket)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(RelayError::Webhook {
                status: status.as_u16(),
                message: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    /// Health check, then POST.
    ///
    /// # Errors
    ///
    /// See [`Self::check_health`] and [`Self::post`].
    pub async fn deliver(&self, ticket: &Ticket) -> Result<Value, RelayError> {
        self.check_health().await?;
        tracing::debug!(
            transaction_id = %ticket.transaction_label(),
            url = %self.webhook_url,
            "Companion bot is up, posting ticket"
        );
        self.post(ticket).await
    }
}
