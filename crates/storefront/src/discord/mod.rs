//! Discord OAuth client.
//!
//! # OAuth Flow
//!
//! 1. Redirect the browser to `authorization_url()`
//! 2. Discord redirects back to the registered redirect URI with a `code`
//! 3. Exchange the code for an access token with `exchange_code()`
//! 4. Fetch the profile with `current_user()`
//!
//! # Example
//!
//! ```rust,ignore
//! use donut_market_storefront::discord::DiscordClient;
//!
//! let client = DiscordClient::new(&config.discord);
//! let token = client.exchange_code(&code).await?;
//! let user = client.current_user(&token).await?;
//! ```

mod types;

pub use types::*;

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use crate::config::DiscordConfig;

/// Scopes requested at login.
pub const OAUTH_SCOPES: &str = "identify email guilds.join";

/// Errors that can occur when talking to Discord.
#[derive(Debug, Error)]
pub enum DiscordError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Discord answered with a non-success status.
    #[error("OAuth error: {0}")]
    OAuth(String),
}

/// Client for the Discord OAuth and user endpoints.
#[derive(Clone)]
pub struct DiscordClient {
    inner: Arc<DiscordClientInner>,
}

struct DiscordClientInner {
    client: reqwest::Client,
    api_base: String,
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
}

impl DiscordClient {
    /// Create a new Discord client.
    #[must_use]
    pub fn new(config: &DiscordConfig) -> Self {
        Self {
            inner: Arc::new(DiscordClientInner {
                client: reqwest::Client::new(),
                api_base: config.api_base.clone(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
                redirect_uri: config.redirect_uri.clone(),
            }),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // OAuth Flow
    // ─────────────────────────────────────────────────────────────────────────

    /// Generate the authorization URL for login.
    #[must_use]
    pub fn authorization_url(&self) -> String {
        format!(
            "{}/oauth2/authorize?\
            client_id={}&\
            redirect_uri={}&\
            response_type=code&\
            scope={}",
            self.inner.api_base,
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(&self.inner.redirect_uri),
            urlencoding::encode(OAUTH_SCOPES)
        )
    }

    /// Exchange an authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or Discord rejects the code.
    pub async fn exchange_code(&self, code: &str) -> Result<DiscordAccessToken, DiscordError> {
        let url = format!("{}/oauth2/token", self.inner.api_base);

        let params = [
            ("client_id", self.inner.client_id.as_str()),
            ("client_secret", self.inner.client_secret.expose_secret()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.inner.redirect_uri.as_str()),
            ("scope", OAUTH_SCOPES),
        ];

        let response = self.inner.client.post(&url).form(&params).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DiscordError::OAuth(format!(
                "Token exchange failed ({status}): {text}"
            )));
        }

        Ok(response.json().await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // User Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch the user the token belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    pub async fn current_user(
        &self,
        token: &DiscordAccessToken,
    ) -> Result<DiscordUser, DiscordError> {
        let url = format!("{}/users/@me", self.inner.api_base);

        let response = self
            .inner
            .client
            .get(&url)
            .header("Authorization", token.authorization_header())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DiscordError::OAuth(format!(
                "User lookup failed ({status}): {text}"
            )));
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url() {
        let client = DiscordClient::new(&DiscordConfig {
            client_id: "1234567890".to_string(),
            client_secret: SecretString::from("unused"),
            redirect_uri: "http://localhost:3000/auth/callback".to_string(),
            api_base: "https://discord.com/api".to_string(),
        });

        assert_eq!(
            client.authorization_url(),
            "https://discord.com/api/oauth2/authorize?client_id=1234567890&\
             redirect_uri=http%3A%2F%2Flocalhost%3A3000%2Fauth%2Fcallback&\
             response_type=code&scope=identify%20email%20guilds.join"
        );
    }
}
