//! Integration tests for DonutMarket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p donut-market-integration-tests
//! ```
//!
//! Each test boots the real storefront router on an ephemeral port, next to
//! mock Discord and companion bot servers, and drives it over HTTP with a
//! cookie-keeping `reqwest` client that does not follow redirects.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Form, Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    routing::{get, post},
};
use donut_market_storefront::config::{
    DeploymentEnvironment, DiscordConfig, RelayConfig, RelayMode, StorefrontConfig,
};
use donut_market_storefront::{AppState, app};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::sync::Mutex;
use tower_sessions::MemoryStore;

/// Authorization code the mock Discord accepts.
pub const GOOD_CODE: &str = "good-code";

/// Access token the mock Discord hands out.
const MOCK_TOKEN: &str = "mock-access-token";

/// Serve a router on `127.0.0.1:0` and return its address.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });
    addr
}

// =============================================================================
// Mock Discord
// =============================================================================

async fn token(Form(params): Form<Vec<(String, String)>>) -> (StatusCode, Json<Value>) {
    let code = params
        .iter()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.as_str());

    if code == Some(GOOD_CODE) {
        (
            StatusCode::OK,
            Json(json!({
                "access_token": MOCK_TOKEN,
                "token_type": "Bearer",
                "expires_in": 604_800,
                "scope": "identify email guilds.join",
            })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant" })),
        )
    }
}

async fn users_me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {MOCK_TOKEN}"));

    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "401: Unauthorized" })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "id": "80351110224678912",
            "username": "Nelly",
            "discriminator": "0",
            "avatar": "8342729096ea3675442027381ff50dfe",
            "email": "nelly@example.com",
        })),
    )
}

/// Start a fake Discord API answering the token exchange and `/users/@me`.
pub async fn spawn_mock_discord() -> SocketAddr {
    serve(
        Router::new()
            .route("/oauth2/token", post(token))
            .route("/users/@me", get(users_me)),
    )
    .await
}

// =============================================================================
// Mock Companion Bot
// =============================================================================

/// A fake Discord bot that records every ticket it receives.
#[derive(Clone, Default)]
pub struct MockCompanion {
    received: Arc<Mutex<Vec<Value>>>,
}

impl MockCompanion {
    /// Start the bot and return it with its base URL.
    pub async fn spawn() -> (Self, String) {
        let companion = Self::default();
        let router = Router::new()
            .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
            .route("/webhook/purchase", post(receive_ticket))
            .with_state(companion.clone());
        let addr = serve(router).await;
        (companion, format!("http://{addr}"))
    }

    /// Tickets received so far.
    pub async fn received(&self) -> Vec<Value> {
        self.received.lock().await.clone()
    }
}

async fn receive_ticket(
    State(companion): State<MockCompanion>,
    Json(ticket): Json<Value>,
) -> Json<Value> {
    let ticket_id = ticket["transactionId"].clone();
    companion.received.lock().await.push(ticket);
    Json(json!({ "success": true, "ticketId": ticket_id, "channel": "ticket-0001" }))
}

// =============================================================================
// Storefront
// =============================================================================

/// How the storefront under test reaches the bot.
pub enum Relay {
    /// Write tickets into a temporary directory.
    FileDrop,
    /// File-drop mode whose queue path is a regular file, so every write
    /// fails.
    UnwritableFileDrop,
    /// Health-check and POST to a bot at this base URL.
    Webhook(String),
}

/// A running storefront with its temporary directories.
pub struct TestApp {
    /// `http://127.0.0.1:<port>`
    pub base_url: String,
    /// Keeps cookies, never follows redirects.
    pub client: reqwest::Client,
    pub tickets: tempfile::TempDir,
    pub stores: tempfile::TempDir,
}

impl TestApp {
    /// Boot the storefront.
    ///
    /// # Panics
    ///
    /// Panics if a temporary directory or the HTTP client cannot be created.
    pub async fn spawn(relay: Relay, discord_api: &str) -> Self {
        let tickets = tempfile::tempdir().expect("tickets dir");
        let stores = tempfile::tempdir().expect("stores dir");

        let mut tickets_dir = tickets.path().to_path_buf();
        let (mode, bot) = match relay {
            Relay::FileDrop => (RelayMode::FileDrop, "http://127.0.0.1:9".to_string()),
            Relay::UnwritableFileDrop => {
                tickets_dir = tickets.path().join("blocked");
                std::fs::write(&tickets_dir, "not a directory").expect("blocking file");
                (RelayMode::FileDrop, "http://127.0.0.1:9".to_string())
            }
            Relay::Webhook(url) => (RelayMode::Webhook, url),
        };

        let config = StorefrontConfig {
            host: "127.0.0.1".parse().expect("loopback"),
            port: 0,
            base_url: "http://127.0.0.1".to_string(),
            session_secret: SecretString::from("Zq8vN3xK7pL2mR9tW5yB4cH6jF1dG0sA"),
            environment: DeploymentEnvironment::Development,
            discord: DiscordConfig {
                client_id: "1234567890".to_string(),
                client_secret: SecretString::from("mock-client-secret"),
                redirect_uri: "http://127.0.0.1/auth/callback".to_string(),
                api_base: discord_api.to_string(),
            },
            relay: RelayConfig {
                mode,
                webhook_url: format!("{bot}/webhook/purchase"),
                health_url: format!("{bot}/health"),
                tickets_dir,
            },
            public_dir: public_dir(),
            stores_dir: stores.path().to_path_buf(),
            allowed_origins: vec!["http://127.0.0.1".to_string()],
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = serve(app(AppState::new(config), MemoryStore::default())).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("http client");

        Self {
            base_url: format!("http://{addr}"),
            client,
            tickets,
            stores,
        }
    }

    /// Absolute URL for a path on the storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Write a file into the stores directory.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_store(&self, file_name: &str, contents: &str) {
        std::fs::write(self.stores.path().join(file_name), contents).expect("write store");
    }
}

/// The storefront's shipped `public/` directory.
#[must_use]
pub fn public_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/public")
}

/// A valid ticket body for `POST /api/create-ticket`.
#[must_use]
pub fn ticket_body(transaction_id: &str) -> Value {
    json!({
        "buyer": "Steve",
        "discord": "steve#0001",
        "transactionId": transaction_id,
        "totalAmount": 16.2,
        "items": [{ "name": "DonutSMP Coins", "amount": "100M" }],
    })
}
