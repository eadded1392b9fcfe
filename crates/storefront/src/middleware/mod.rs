//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. Catch-panic (JSON 500 instead of a dropped connection)
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)
//! 5. Session layer (tower-sessions, signed cookie)
//! 6. CORS (configured storefront origins, with credentials)
//! 7. Security headers (CSP, framing, sniffing)

pub mod auth;
pub mod cors;
pub mod panic;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{RequireUser, clear_current_user, set_current_user};
pub use cors::cors_layer;
pub use panic::handle_panic;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
