//! Authentication extractor and session helpers.
//!
//! The server session is the only authority on who is logged in. Pages ask
//! `/api/user`, which goes through [`RequireUser`].

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::SessionUser;
use crate::models::session::keys;

/// Extractor that requires a logged-in Discord user.
///
/// Rejects with a 401 JSON body when the session has no user.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> String {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireUser(pub SessionUser);

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AppError::Unauthorized)?;

        let user = session
            .get::<SessionUser>(keys::CURRENT_USER)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(Self(user))
    }
}

/// Log the user in: rotate the session id, then store the user.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &SessionUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(keys::CURRENT_USER, user).await
}

/// Log out: drop the whole session and expire its cookie.
///
/// # Errors
///
/// Returns an error if the session store cannot delete the record.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
