//! Account API handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::error::{Result, clear_sentry_user};
use crate::middleware::{RequireUser, clear_current_user};

/// Return the logged-in user's profile.
///
/// The access token stays in the session.
///
/// # Route
///
/// `GET /api/user`
///
/// # Errors
///
/// Returns 401 if nobody is logged in.
pub async fn current_user(RequireUser(user): RequireUser) -> Result<Json<serde_json::Value>> {
    Ok(Json(json!({
        "success": true,
        "user": user.account(),
    })))
}

/// Destroy the session.
///
/// # Route
///
/// `POST /api/logout`
pub async fn logout(session: Session) -> Response {
    match clear_current_user(&session).await {
        Ok(()) => {
            clear_sentry_user();
            Json(json!({
                "success": true,
                "message": "Logged out successfully",
            }))
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to destroy session");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": "Failed to logout",
                })),
            )
                .into_response()
        }
    }
}
