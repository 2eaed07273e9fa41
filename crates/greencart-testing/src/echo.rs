//! Echo router standing in for a resource router.
//!
//! Responds to any method and path with what it received, so tests can assert
//! how the composition root delivered the request.

use axum::body::to_bytes;
use axum::extract::{OriginalUri, Request};
use axum::http::Uri;
use axum::{Json, Router};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Map, Value, json};

use greencart_core::body::JsonBody;

/// A router that reports `resource` plus the request it saw.
///
/// Response fields: `resource`, `method`, `original_uri`, `uri` (path and
/// query after prefix stripping), `body` (lossy UTF-8), `json` (parsed body
/// if the JSON parser ran), `cookies`.
pub fn echo_router(resource: &'static str) -> Router {
    Router::new().fallback(move |request: Request| echo(resource, request))
}

fn path_and_query(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| uri.path().to_owned())
}

async fn echo(resource: &'static str, request: Request) -> Json<Value> {
    let (parts, body) = request.into_parts();

    let original_uri = parts
        .extensions
        .get::<OriginalUri>()
        .map(|original| path_and_query(&original.0))
        .unwrap_or_else(|| path_and_query(&parts.uri));
    let json = parts
        .extensions
        .get::<JsonBody>()
        .map(|JsonBody(value)| value.clone());
    let cookies: Map<String, Value> = parts
        .extensions
        .get::<CookieJar>()
        .map(|jar| {
            jar.iter()
                .map(|c| (c.name().to_owned(), Value::String(c.value().to_owned())))
                .collect()
        })
        .unwrap_or_default();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();

    Json(json!({
        "resource": resource,
        "method": parts.method.as_str(),
        "original_uri": original_uri,
        "uri": path_and_query(&parts.uri),
        "body": String::from_utf8_lossy(&bytes),
        "json": json,
        "cookies": cookies,
    }))
}
