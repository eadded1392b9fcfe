//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! # Pages (static files)
//! GET  /, /replica.html         - Storefront
//! GET  /stores                  - Store directory
//! GET  /login.html, /checkout.html, /success.html, /policy(.html)
//!
//! # Discord OAuth
//! GET  /login                   - Redirect to Discord
//! GET  /auth/callback           - Handle OAuth callback
//! GET  /auth/success            - Login confirmation page
//!
//! # API
//! GET  /api/user                - Logged-in user (401 if none)
//! POST /api/logout              - Destroy session
//! POST /api/create-ticket       - Relay a purchase ticket to the bot
//! POST /api/test-ticket         - Send the sample ticket to the bot webhook
//! GET  /api/order/{id}          - Order status
//! GET  /api/store-config        - Default store configuration
//! GET  /api/all-stores          - All store configurations
//!
//! # Bot / infrastructure
//! POST /webhook/purchase        - Notification from the bot
//! GET  /health                  - Liveness check
//!
//! *    anything else            - File under public/, else JSON 404
//! ```

pub mod account;
pub mod auth;
pub mod pages;
pub mod stores;
pub mod tickets;

use axum::{
    Json, Router,
    http::{Request, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tower_http::{
    catch_panic::CatchPanicLayer,
    trace::{DefaultOnResponse, OnResponse, TraceLayer},
};
use tower_sessions::SessionStore;
use tracing::Span;

use crate::middleware::{
    cors_layer, create_session_layer, handle_panic, request_id_middleware,
    security_headers_middleware,
};
use crate::state::AppState;

/// Liveness check.
///
/// # Route
///
/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy", "timestamp": tickets::iso_timestamp() }))
}

/// Create the API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/user", get(account::current_user))
        .route("/logout", post(account::logout))
        .route("/create-ticket", post(tickets::create_ticket))
        .route("/test-ticket", post(tickets::test_ticket))
        .route("/order/{transaction_id}", get(tickets::order_status))
        .route("/store-config", get(stores::store_config))
        .route("/all-stores", get(stores::all_stores))
}

/// Create all routes for the storefront, without middleware.
pub fn routes(state: &AppState) -> Router<AppState> {
    let public_dir = &state.config().public_dir;

    let router = Router::new()
        .route("/health", get(health))
        .route("/login", get(auth::login))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/success", get(auth::success))
        .route("/webhook/purchase", post(tickets::purchase_webhook))
        .nest("/api", api_routes())
        .merge(pages::routes(public_dir));

    pages::with_static_files(router, public_dir)
}

/// Build the full application: routes, session handling and the middleware
/// stack, with sessions kept in `store`.
pub fn app<S>(state: AppState, store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = create_session_layer(store, state.config());
    let cors = cors_layer(&state.config().allowed_origins);

    routes(&state)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(cors)
        .layer(session_layer)
        .with_state(state)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: std::time::Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
        .layer(sentry_tower::NewSentryLayer::new_from_top())
}
