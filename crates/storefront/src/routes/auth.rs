//! Discord OAuth route handlers.
//!
//! Handles the login flow:
//! - Login: Redirects to Discord's authorization page
//! - Callback: Exchanges the code, fetches the profile and starts a session
//! - Success: Confirmation page that syncs the browser with `/api/user`

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::set_sentry_user;
use crate::middleware::set_current_user;
use crate::models::{PublicProfile, SessionUser};
use crate::state::AppState;

/// Query parameters from the Discord OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for a token.
    pub code: Option<String>,
}

/// Query parameters for the confirmation page.
#[derive(Debug, Deserialize)]
pub struct SuccessQuery {
    /// URL-decoded JSON `{id, username, avatar}`.
    pub user: Option<String>,
}

/// Login confirmation page.
#[derive(Template, WebTemplate)]
#[template(path = "auth/success.html")]
pub struct LoginSuccessTemplate {
    pub profile: Option<PublicProfile>,
}

/// `302 Found` to `location`.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(LOCATION, location.to_string())]).into_response()
}

/// Initiate Discord OAuth login.
///
/// # Route
///
/// `GET /login`
pub async fn login(State(state): State<AppState>) -> Response {
    found(&state.discord().authorization_url())
}

/// Handle the Discord OAuth callback.
///
/// Any failure sends the browser back to the login page with an `error`
/// code: `no_code` when Discord sent no code, `oauth_failed` otherwise.
///
/// # Route
///
/// `GET /auth/callback`
#[instrument(skip_all)]
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(code) = query.code.filter(|code| !code.is_empty()) else {
        tracing::warn!("Discord OAuth callback missing code");
        return found("/login.html?error=no_code");
    };

    let token = match state.discord().exchange_code(&code).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!(error = %e, "Discord token exchange failed");
            return found("/login.html?error=oauth_failed");
        }
    };

    let discord_user = match state.discord().current_user(&token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "Discord profile lookup failed");
            return found("/login.html?error=oauth_failed");
        }
    };

    let user = SessionUser::from_login(&discord_user, &token);
    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!(error = %e, "Failed to store user in session");
        return found("/login.html?error=oauth_failed");
    }

    set_sentry_user(&user.id, &user.username);
    tracing::info!(user_id = %user.id, username = %user.username, "Discord login");

    match serde_json::to_string(&user.public_profile()) {
        Ok(json) => found(&format!(
            "/auth/success?user={}",
            urlencoding::encode(&json)
        )),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode public profile");
            found("/auth/success")
        }
    }
}

/// Display the login confirmation page.
///
/// The `user` query only personalizes the greeting. The page script asks
/// `/api/user` before caching anything in the browser.
///
/// # Route
///
/// `GET /auth/success`
pub async fn success(Query(query): Query<SuccessQuery>) -> LoginSuccessTemplate {
    let profile = query
        .user
        .as_deref()
        .and_then(|json| serde_json::from_str::<PublicProfile>(json).ok());

    LoginSuccessTemplate { profile }
}
