//! Static storefront pages.
//!
//! The HTML pages are plain files under the public directory. Named routes
//! map friendly paths onto them; anything else is looked up as a file and
//! falls through to a JSON 404.

use std::path::Path;

use axum::{Router, handler::HandlerWithoutStateExt};
use tower_http::services::{ServeDir, ServeFile};

use crate::error::AppError;
use crate::state::AppState;

/// Friendly path → file under the public directory.
pub const PAGES: &[(&str, &str)] = &[
    ("/", "replica.html"),
    ("/replica.html", "replica.html"),
    ("/stores", "stores.html"),
    ("/login.html", "login.html"),
    ("/checkout.html", "checkout.html"),
    ("/success.html", "success.html"),
    ("/policy", "policy.html"),
    ("/policy.html", "policy.html"),
];

async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Routes for the named pages.
pub fn routes(public_dir: &Path) -> Router<AppState> {
    PAGES.iter().fold(Router::new(), |router, (path, file)| {
        router.route_service(path, ServeFile::new(public_dir.join(file)))
    })
}

/// Serve any other file under the public directory, else a JSON 404.
pub fn with_static_files(router: Router<AppState>, public_dir: &Path) -> Router<AppState> {
    router.fallback_service(
        ServeDir::new(public_dir)
            .append_index_html_on_directories(false)
            .call_fallback_on_method_not_allowed(true)
            .not_found_service(not_found.into_service()),
    )
}
