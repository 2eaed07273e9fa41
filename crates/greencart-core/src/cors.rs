//! Cross-origin policy: a fixed origin allow-list with credentials.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

/// Methods a listed origin may use.
pub const ALLOWED_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid CORS origin {0:?}")]
pub struct InvalidOrigin(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    origins: Vec<HeaderValue>,
}

impl CorsPolicy {
    pub fn new<I, S>(origins: I) -> Result<Self, InvalidOrigin>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let origins = origins
            .into_iter()
            .map(|origin| {
                let origin = origin.as_ref().trim_end_matches('/');
                HeaderValue::from_str(origin).map_err(|_| InvalidOrigin(origin.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { origins })
    }

    pub fn origins(&self) -> &[HeaderValue] {
        &self.origins
    }

    pub fn allows(&self, origin: &HeaderValue) -> bool {
        self.origins.iter().any(|allowed| allowed == origin)
    }

    /// The tower-http layer answering preflights and decorating responses.
    ///
    /// Must wrap every route, including the fallback, so that `OPTIONS` is
    /// answered for any path.
    pub fn layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.origins.clone()))
            .allow_methods(ALLOWED_METHODS)
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
    }
}

/// Strip grant headers from responses to origins outside the allow-list.
///
/// `CorsLayer` withholds `access-control-allow-origin` for unlisted origins but
/// still emits the credentials and methods grants; this removes them so a
/// foreign origin sees no grant at all. Install outside `CorsPolicy::layer`.
pub async fn withhold_from_unlisted_origins(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let listed = request
        .headers()
        .get(header::ORIGIN)
        .is_some_and(|origin| policy.allows(origin));

    let mut response = next.run(request).await;
    if !listed {
        let headers = response.headers_mut();
        headers.remove(header::ACCESS_CONTROL_ALLOW_ORIGIN);
        headers.remove(header::ACCESS_CONTROL_ALLOW_CREDENTIALS);
        headers.remove(header::ACCESS_CONTROL_ALLOW_METHODS);
        headers.remove(header::ACCESS_CONTROL_ALLOW_HEADERS);
    }
    response
}
