//! CORS middleware — the browser client is served from another origin.
//!
//! Answers `OPTIONS` preflight directly and stamps `Access-Control-Allow-*`
//! headers on every response whose origin is allowed.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Allowed origins for cross-origin requests. `*` allows any origin.
pub struct CorsConfig {
    origins: Vec<String>,
}

impl CorsConfig {
    pub fn new(origins: Vec<String>) -> Self {
        Self { origins }
    }

    /// The `Access-Control-Allow-Origin` value for a request origin,
    /// or None when the origin is not allowed.
    fn allowed(&self, origin: Option<&HeaderValue>) -> Option<HeaderValue> {
        if self.origins.iter().any(|o| o == "*") {
            return Some(HeaderValue::from_static("*"));
        }
        let origin = origin?;
        let value = origin.to_str().ok()?;
        if self.origins.iter().any(|o| o == value) {
            Some(origin.clone())
        } else {
            None
        }
    }
}

/// Middleware that handles preflight and response headers.
pub async fn cors_middleware(
    State(cfg): State<Arc<CorsConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(header::ORIGIN).cloned();
    let allowed = cfg.allowed(origin.as_ref());

    // Preflight requests are answered here, never routed.
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_headers(response.headers_mut(), allowed);
        return response;
    }

    let mut response = next.run(request).await;
    apply_headers(response.headers_mut(), allowed);
    response
}

fn apply_headers(headers: &mut HeaderMap, allowed: Option<HeaderValue>) {
    if let Some(value) = allowed {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("content-type"),
        );
    }
}
