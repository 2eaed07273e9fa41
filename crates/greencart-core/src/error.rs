use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Pipeline-level error variants shared by every route.
///
/// Renders as `{"kind": ..., "message": ...}` so that clients see one error
/// shape regardless of which layer rejected the request.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("malformed JSON body")]
    MalformedJson,
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("not found")]
    NotFound,
    #[error("{0} routes are not mounted")]
    NotMounted(&'static str),
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedJson => "MALFORMED_JSON",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::NotFound => "NOT_FOUND",
            Self::NotMounted(_) => "NOT_MOUNTED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedJson => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::NotMounted(_) => StatusCode::NOT_IMPLEMENTED,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Request-level outcomes are in the trace spans.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), &self.to_string())
    }
}

/// Build the uniform JSON error body. Service-specific error enums render
/// through this as well.
pub fn error_response(status: StatusCode, kind: &str, message: &str) -> Response {
    let body = serde_json::json!({
        "kind": kind,
        "message": message,
    });
    (status, axum::Json(body)).into_response()
}

/// Fallback handler for paths outside the routing table.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
