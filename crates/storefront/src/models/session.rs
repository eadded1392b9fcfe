//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use crate::discord::{DEFAULT_AVATAR_URL, DiscordAccessToken, DiscordUser};

/// Session-stored Discord identity.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone, Serialize, Deserialize)]
pub struct SessionUser {
    /// Discord snowflake ID.
    pub id: String,
    /// `name#1234` or bare `name`.
    pub username: String,
    /// Custom avatar URL, `None` when the user has none.
    pub avatar: Option<String>,
    pub email: Option<String>,
    /// Discord access token. Never leaves the server.
    pub access_token: String,
}

impl SessionUser {
    /// Build the session record from a fresh login.
    #[must_use]
    pub fn from_login(user: &DiscordUser, token: &DiscordAccessToken) -> Self {
        Self {
            id: user.id.clone(),
            username: user.tag(),
            avatar: user.avatar_url(),
            email: user.email.clone(),
            access_token: token.access_token.clone(),
        }
    }

    /// Fields returned by `/api/user`.
    #[must_use]
    pub fn account(&self) -> AccountView {
        AccountView {
            id: self.id.clone(),
            username: self.username.clone(),
            avatar: self.avatar.clone(),
            email: self.email.clone(),
        }
    }

    /// Fields passed to the login confirmation page. The avatar falls back
    /// to Discord's default.
    #[must_use]
    pub fn public_profile(&self) -> PublicProfile {
        PublicProfile {
            id: self.id.clone(),
            username: self.username.clone(),
            avatar: self
                .avatar
                .clone()
                .unwrap_or_else(|| DEFAULT_AVATAR_URL.to_string()),
        }
    }
}

impl std::fmt::Debug for SessionUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("avatar", &self.avatar)
            .field("email", &self.email)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// The logged-in user as returned by `/api/user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountView {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
    pub email: Option<String>,
}

/// `{id, username, avatar}` carried in the `/auth/success?user=` query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: String,
    pub username: String,
    pub avatar: String,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "user";
}
