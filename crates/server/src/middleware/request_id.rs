//! Request ID middleware for request tracing and correlation.
//!
//! Each request carries an ID into its tracing span, the Sentry scope and the
//! `x-request-id` response header. An ID supplied by the caller is reused
//! when it is short and made of token characters; anything else is replaced
//! with a fresh UUID v4 so client input never reaches logs unchecked.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied ID that is kept.
pub const MAX_REQUEST_ID_LEN: usize = 128;

/// Whether a caller-supplied ID may be propagated as-is.
///
/// Accepts 1 to [`MAX_REQUEST_ID_LEN`] ASCII alphanumerics plus `-`, `_`,
/// `.` and `:`.
#[must_use]
pub fn is_valid_request_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b':'))
}

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .filter(|id| is_valid_request_id(id))
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_token_ids() {
        assert!(is_valid_request_id("req-123"));
        assert!(is_valid_request_id("trace.id:abc_DEF"));
        assert!(is_valid_request_id(&Uuid::new_v4().to_string()));
        assert!(is_valid_request_id(&"a".repeat(MAX_REQUEST_ID_LEN)));
    }

    #[test]
    fn test_rejects_untrusted_ids() {
        assert!(!is_valid_request_id(""));
        assert!(!is_valid_request_id(&"a".repeat(MAX_REQUEST_ID_LEN + 1)));
        assert!(!is_valid_request_id("has space"));
        assert!(!is_valid_request_id("line\nbreak"));
        assert!(!is_valid_request_id("quote\"d"));
        assert!(!is_valid_request_id("caf\u{e9}"));
    }
}
