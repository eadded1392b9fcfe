//! Types for Discord OAuth and the `/users/@me` response.

use serde::{Deserialize, Serialize};

/// CDN root for user avatars.
const AVATAR_CDN: &str = "https://cdn.discordapp.com/avatars";

/// Avatar shown for users without a custom one.
pub const DEFAULT_AVATAR_URL: &str = "https://cdn.discordapp.com/embed/avatars/0.png";

// ─────────────────────────────────────────────────────────────────────────────
// OAuth Types
// ─────────────────────────────────────────────────────────────────────────────

/// Access token obtained via the authorization code grant.
#[derive(Clone, Serialize, Deserialize)]
pub struct DiscordAccessToken {
    /// The access token for API requests.
    pub access_token: String,
    /// Token type, normally `Bearer`.
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: Option<i64>,
    /// Granted scopes, space separated.
    pub scope: Option<String>,
}

impl DiscordAccessToken {
    /// Value for the `Authorization` header.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl std::fmt::Debug for DiscordAccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordAccessToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User Types
// ─────────────────────────────────────────────────────────────────────────────

/// The authenticated Discord user.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    /// Snowflake ID.
    pub id: String,
    pub username: String,
    /// Legacy four-digit tag; `"0"` for accounts on the new username system.
    #[serde(default)]
    pub discriminator: Option<String>,
    /// Avatar hash.
    #[serde(default)]
    pub avatar: Option<String>,
    /// Present with the `email` scope.
    #[serde(default)]
    pub email: Option<String>,
}

impl DiscordUser {
    /// Display handle, `name#discriminator`.
    ///
    /// New-system accounts report discriminator `"0"` and get `name#0`. Only a
    /// missing or empty discriminator gives the bare name.
    #[must_use]
    pub fn tag(&self) -> String {
        match self.discriminator.as_deref() {
            Some(d) if !d.is_empty() => format!("{}#{d}", self.username),
            _ => self.username.clone(),
        }
    }

    /// CDN URL of the custom avatar, if any.
    #[must_use]
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar
            .as_ref()
            .map(|hash| format!("{AVATAR_CDN}/{}/{hash}.png", self.id))
    }
}
