//! Request handling helpers.
//!
//! # Responsibilities
//! - Generate unique request IDs (UUID v4)
//! - Snapshot request headers before any layer adds to them
//! - Capture request headers as a canonical-name multimap for storage
//! - Record per-request metrics
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - A client-supplied `x-request-id` is kept, not replaced
//! - Stored headers come from the snapshot, so a generated ID is never logged
//! - Header names are stored in canonical MIME form so logs written by
//!   other implementations of the service read the same

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::observability::metrics;
use crate::store::HeaderMultimap;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates a fresh UUID v4 for requests that arrive without an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Request ID of an in-flight request, `"unknown"` if the layer did not run.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Request headers exactly as the client sent them.
#[derive(Debug, Clone, Default)]
pub struct ReceivedHeaders(pub HeaderMap);

/// Outermost middleware: record the headers before the request-ID layer runs.
pub async fn snapshot_headers(mut request: Request<Body>, next: Next) -> Response {
    let received = ReceivedHeaders(request.headers().clone());
    request.extensions_mut().insert(received);
    next.run(request).await
}

/// Canonical MIME form: first letter and every letter after `-` upper-cased.
pub fn canonical_header_name(name: &str) -> String {
    let mut canonical = String::with_capacity(name.len());
    let mut upper = true;
    for c in name.chars() {
        if upper {
            canonical.push(c.to_ascii_uppercase());
        } else {
            canonical.push(c.to_ascii_lowercase());
        }
        upper = c == '-';
    }
    canonical
}

/// Collect every header value, grouped by canonical name, in arrival order.
pub fn capture_headers(headers: &HeaderMap) -> HeaderMultimap {
    let mut captured = HeaderMultimap::new();
    for (name, value) in headers {
        captured
            .entry(canonical_header_name(name.as_str()))
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    captured
}

/// Middleware recording request count and latency.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}
