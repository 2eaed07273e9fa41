//! Generic body and cookie parsers.
//!
//! Installed only over routes registered after the raw-body stage of the
//! [`Pipeline`](crate::pipeline::Pipeline); see that module for the ordering rule.

use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use serde_json::Value;

use crate::error::AppError;

/// Default JSON body limit (100 KiB).
pub const DEFAULT_JSON_LIMIT: usize = 100 * 1024;

/// Parsed JSON body, stored as a request extension.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonBody(pub Value);

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case("application/json"))
}

/// Parse `application/json` bodies into a [`JsonBody`] extension.
///
/// The buffered bytes are re-attached unchanged so `axum::Json` and friends
/// still work downstream. An empty body parses as `{}`.
pub async fn parse_json_body(
    State(limit): State<usize>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !is_json(request.headers()) {
        return Ok(next.run(request).await);
    }

    let (mut parts, body) = request.into_parts();
    let bytes = to_bytes(body, limit)
        .await
        .map_err(|_| AppError::PayloadTooLarge)?;

    let value = if bytes.is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!(error = %e, "rejecting malformed JSON body");
            AppError::MalformedJson
        })?
    };
    parts.extensions.insert(JsonBody(value));

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

/// Parse the `Cookie` header into a [`CookieJar`] extension.
pub async fn parse_cookies(mut request: Request, next: Next) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    request.extensions_mut().insert(jar);
    next.run(request).await
}
