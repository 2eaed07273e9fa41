use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use greencart_core::error::error_response;

/// Payment webhook error variants.
#[derive(Debug, thiserror::Error)]
pub enum ApiServiceError {
    #[error("missing signature header")]
    MissingSignature,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid event payload")]
    InvalidPayload,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingSignature => "MISSING_SIGNATURE",
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::InvalidPayload => "INVALID_PAYLOAD",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingSignature | Self::InvalidSignature | Self::InvalidPayload => {
                StatusCode::BAD_REQUEST
            }
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        error_response(status, self.kind(), &self.to_string())
    }
}
