//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SESSION_SECRET` - Session cookie signing secret (min 32 chars, high entropy)
//! - `DISCORD_CLIENT_ID` - Discord OAuth application client ID
//! - `DISCORD_CLIENT_SECRET` - Discord OAuth application client secret
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` / `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: `http://localhost:{port}`)
//! - `DISCORD_REDIRECT_URI` - OAuth callback (default: `http://localhost:3000/auth/callback`)
//! - `DISCORD_API_BASE` - Discord API root (default: `https://discord.com/api`)
//! - `RAILWAY_ENVIRONMENT` - `production` switches ticket relay to file-drop
//! - `RAILWAY_PUBLIC_DOMAIN` - Public domain in production (default: donutmarket.up.railway.app)
//! - `DISCORD_BOT_WEBHOOK_URL` - Companion bot webhook (default depends on environment)
//! - `DISCORD_BOT_HEALTH_URL` - Companion bot health check (default: `http://localhost:8080/health`)
//! - `TICKETS_DIR` - File-drop ticket directory (default: tickets)
//! - `STORES_DIR` - Store configuration directory (default: crates/storefront/stores)
//! - `PUBLIC_DIR` - Static pages directory (default: crates/storefront/public)
//! - `CORS_ALLOWED_ORIGINS` - Comma-separated origins (default depends on environment)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

const DEFAULT_PUBLIC_DOMAIN: &str = "donutmarket.up.railway.app";
const DEFAULT_DEV_WEBHOOK_URL: &str = "http://localhost:8080/webhook/purchase";
const DEFAULT_HEALTH_URL: &str = "http://localhost:8080/health";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Where the storefront is deployed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentEnvironment {
    #[default]
    Development,
    /// Railway production (`RAILWAY_ENVIRONMENT=production`).
    Production,
}

impl DeploymentEnvironment {
    fn from_flag(value: Option<&str>) -> Self {
        match value {
            Some("production") => Self::Production,
            _ => Self::Development,
        }
    }

    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// How purchase tickets reach the Discord bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMode {
    /// Write `ticket_<id>.json` into a directory the bot polls.
    FileDrop,
    /// Check the bot's health endpoint, then POST to its webhook.
    Webhook,
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Deployment environment
    pub environment: DeploymentEnvironment,
    /// Discord OAuth configuration
    pub discord: DiscordConfig,
    /// Ticket relay configuration
    pub relay: RelayConfig,
    /// Directory holding the static storefront pages
    pub public_dir: PathBuf,
    /// Directory holding per-store JSON configuration
    pub stores_dir: PathBuf,
    /// Origins allowed to make credentialed cross-origin requests
    pub allowed_origins: Vec<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Discord OAuth application configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct DiscordConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: SecretString,
    /// Registered OAuth redirect URI
    pub redirect_uri: String,
    /// Discord API root, without trailing slash
    pub api_base: String,
}

impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Ticket relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Delivery policy
    pub mode: RelayMode,
    /// Companion bot webhook endpoint
    pub webhook_url: String,
    /// Companion bot liveness endpoint
    pub health_url: String,
    /// File-drop directory
    pub tickets_dir: PathBuf,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_optional_env("PORT")
            .or_else(|| get_optional_env("STOREFRONT_PORT"))
            .unwrap_or_else(|| "3000".to_string())
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let base_url = validate_url(
            "STOREFRONT_BASE_URL",
            get_optional_env("STOREFRONT_BASE_URL")
                .unwrap_or_else(|| format!("http://localhost:{port}")),
        )?;

        let session_secret = get_validated_secret("SESSION_SECRET")?;
        validate_session_secret(&session_secret, "SESSION_SECRET")?;

        let environment =
            DeploymentEnvironment::from_flag(get_optional_env("RAILWAY_ENVIRONMENT").as_deref());
        let public_domain = get_optional_env("RAILWAY_PUBLIC_DOMAIN");

        let discord = DiscordConfig::from_env()?;
        let relay = RelayConfig::from_env(environment, public_domain.as_deref())?;

        let allowed_origins = get_optional_env("CORS_ALLOWED_ORIGINS").map_or_else(
            || default_allowed_origins(environment, public_domain.as_deref()),
            |list| parse_origin_list(&list),
        );

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            environment,
            discord,
            relay,
            public_dir: get_env_or_default("PUBLIC_DIR", "crates/storefront/public").into(),
            stores_dir: get_env_or_default("STORES_DIR", "crates/storefront/stores").into(),
            allowed_origins,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn uses_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl DiscordConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: get_required_env("DISCORD_CLIENT_ID")?,
            client_secret: get_validated_secret("DISCORD_CLIENT_SECRET")?,
            redirect_uri: validate_url(
                "DISCORD_REDIRECT_URI",
                get_env_or_default("DISCORD_REDIRECT_URI", "http://localhost:3000/auth/callback"),
            )?,
            api_base: validate_url(
                "DISCORD_API_BASE",
                get_env_or_default("DISCORD_API_BASE", "https://discord.com/api"),
            )?
            .trim_end_matches('/')
            .to_string(),
        })
    }
}

impl RelayConfig {
    fn from_env(
        environment: DeploymentEnvironment,
        public_domain: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mode = if environment.is_production() {
            RelayMode::FileDrop
        } else {
            RelayMode::Webhook
        };

        Ok(Self {
            mode,
            webhook_url: validate_url(
                "DISCORD_BOT_WEBHOOK_URL",
                get_optional_env("DISCORD_BOT_WEBHOOK_URL")
                    .unwrap_or_else(|| default_webhook_url(environment, public_domain)),
            )?,
            health_url: validate_url(
                "DISCORD_BOT_HEALTH_URL",
                get_env_or_default("DISCORD_BOT_HEALTH_URL", DEFAULT_HEALTH_URL),
            )?,
            tickets_dir: get_env_or_default("TICKETS_DIR", "tickets").into(),
        })
    }
}

/// Reject values that are not absolute `http(s)` URLs.
fn validate_url(var_name: &str, value: String) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(&value)
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme {}", parsed.scheme()),
        ));
    }

    Ok(value)
}

/// Companion webhook used when `DISCORD_BOT_WEBHOOK_URL` is unset.
fn default_webhook_url(environment: DeploymentEnvironment, public_domain: Option<&str>) -> String {
    match environment {
        DeploymentEnvironment::Production => format!(
            "https://{}/webhook/purchase",
            public_domain.unwrap_or(DEFAULT_PUBLIC_DOMAIN)
        ),
        DeploymentEnvironment::Development => DEFAULT_DEV_WEBHOOK_URL.to_string(),
    }
}

/// CORS origins used when `CORS_ALLOWED_ORIGINS` is unset.
fn default_allowed_origins(
    environment: DeploymentEnvironment,
    public_domain: Option<&str>,
) -> Vec<String> {
    match environment {
        DeploymentEnvironment::Production => {
            vec![format!(
                "https://{}",
                public_domain.unwrap_or(DEFAULT_PUBLIC_DOMAIN)
            )]
        }
        DeploymentEnvironment::Development => vec![
            "http://localhost:3000".to_string(),
            "http://127.0.0.1:3000".to_string(),
            "http://localhost:5500".to_string(),
        ],
    }
}

fn parse_origin_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
