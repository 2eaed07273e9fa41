/// Body returned by the liveness route.
pub const LIVENESS_MESSAGE: &str = "API is Working";

/// Liveness probe for `GET /`. Touches no backend.
pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}
