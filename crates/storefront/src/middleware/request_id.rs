//! Request correlation IDs.
//!
//! Every request carries an `x-request-id`: the one set by the Railway edge
//! proxy when present, otherwise a fresh UUID v4. The id is recorded on the
//! tracing span, tagged on the Sentry scope, forwarded to handlers in the
//! request headers and echoed in the response.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Ids longer than this from upstream are replaced.
const MAX_UPSTREAM_ID_LENGTH: usize = 128;

fn upstream_id(request: &Request) -> Option<HeaderValue> {
    request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .filter(|value| !value.is_empty() && value.len() <= MAX_UPSTREAM_ID_LENGTH)
        .filter(|value| value.to_str().is_ok())
        .cloned()
}

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let header = upstream_id(&request).unwrap_or_else(|| {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
    });
    let request_id = header.to_str().unwrap_or_default().to_owned();

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, header.clone());

    let mut response = next.run(request).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, header);
    response
}
