//! Ordered HTTP pipeline construction.
//!
//! Routes that verify signatures over the request bytes must never see a body
//! that a parser has already consumed. The builder encodes this in its type:
//! raw-body routes can only be added in the [`RawBody`] stage, and the body
//! parsers are layered only over routes added after [`Pipeline::body_parsers`].
//!
//! ```compile_fail
//! use axum::routing::post;
//! use greencart_core::cors::CorsPolicy;
//! use greencart_core::pipeline::Pipeline;
//!
//! let cors = CorsPolicy::new(["http://localhost:5173"]).unwrap();
//! Pipeline::new(cors)
//!     .body_parsers(1024)
//!     // no raw-body routes once parsers are installed
//!     .raw_body_route("/stripe", post(|| async {}));
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use axum::Router;
use axum::extract::Request;
use axum::http::Uri;
use axum::http::uri::PathAndQuery;
use axum::middleware;
use axum::routing::MethodRouter;
use tower::ServiceExt;
use tower_http::trace::TraceLayer;

use crate::body::{parse_cookies, parse_json_body};
use crate::cors::{CorsPolicy, withhold_from_unlisted_origins};
use crate::error::not_found;
use crate::middleware::{propagate_request_id_layer, request_id_layer};

/// Stage in which routes receive the unparsed request body.
pub struct RawBody;

/// Stage in which routes run behind the JSON and cookie parsers.
pub struct Parsed;

pub struct Pipeline<Stage> {
    cors: CorsPolicy,
    json_limit: usize,
    raw: Router,
    parsed: Router,
    _stage: PhantomData<Stage>,
}

impl Pipeline<RawBody> {
    /// Start a pipeline. The CORS policy wraps everything built from it.
    pub fn new(cors: CorsPolicy) -> Self {
        Self {
            cors,
            json_limit: 0,
            raw: Router::new(),
            parsed: Router::new(),
            _stage: PhantomData,
        }
    }

    /// Register a route whose handler receives the request bytes untouched.
    pub fn raw_body_route(mut self, path: &str, route: MethodRouter) -> Self {
        self.raw = self.raw.route(path, route);
        self
    }

    /// Install the JSON and cookie parsers for every route registered from here on.
    pub fn body_parsers(self, json_limit: usize) -> Pipeline<Parsed> {
        Pipeline {
            cors: self.cors,
            json_limit,
            raw: self.raw,
            parsed: self.parsed,
            _stage: PhantomData,
        }
    }
}

impl Pipeline<Parsed> {
    pub fn route(mut self, path: &str, route: MethodRouter) -> Self {
        self.parsed = self.parsed.route(path, route);
        self
    }

    /// Mount a router under `prefix`. The prefix is stripped before the nested
    /// router matches; `OriginalUri` still carries the full path.
    ///
    /// `{prefix}/` reaches the router as `/`, the same as `{prefix}` does.
    pub fn nest(mut self, prefix: &str, router: Router) -> Self {
        let prefix = prefix.trim_end_matches('/');
        self.parsed = self
            .parsed
            .route_service(
                &format!("{prefix}/"),
                router.clone().map_request(rewrite_to_root),
            )
            .nest(prefix, router);
        self
    }

    pub fn build(self) -> Router {
        // Layers wrap outward: the JSON parser runs before the cookie parser.
        let parsed = self
            .parsed
            .layer(middleware::from_fn(parse_cookies))
            .layer(middleware::from_fn_with_state(
                self.json_limit,
                parse_json_body,
            ));

        let cors_layer = self.cors.layer();
        self.raw
            .merge(parsed)
            .fallback(not_found)
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(request_id_layer())
            .layer(cors_layer)
            .layer(middleware::from_fn_with_state(
                Arc::new(self.cors),
                withhold_from_unlisted_origins,
            ))
    }
}

/// Replace the request path with `/`, keeping the query.
fn rewrite_to_root(mut request: Request) -> Request {
    let mut parts = request.uri().clone().into_parts();
    let root = match parts.path_and_query.as_ref().and_then(PathAndQuery::query) {
        Some(query) => format!("/?{query}"),
        None => "/".to_owned(),
    };
    parts.path_and_query = root.parse().ok();
    if let Ok(uri) = Uri::from_parts(parts) {
        *request.uri_mut() = uri;
    }
    request
}
