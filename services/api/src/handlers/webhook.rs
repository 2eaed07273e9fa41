use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use bytes::Bytes;
use chrono::Utc;

use crate::domain::port::PaymentEventSink;
use crate::domain::types::WebhookAck;
use crate::error::ApiServiceError;
use crate::state::WebhookState;

pub const STRIPE_SIGNATURE: &str = "stripe-signature";

// ── POST /stripe ─────────────────────────────────────────────────────────────

/// Takes the body as `Bytes`: the signature covers the exact bytes sent.
pub async fn receive_webhook<S>(
    State(state): State<WebhookState<S>>,
    headers: HeaderMap,
    payload: Bytes,
) -> Result<Json<WebhookAck>, ApiServiceError>
where
    S: PaymentEventSink + Clone + 'static,
{
    // A non-ASCII header cannot carry a valid signature.
    let signature = match headers.get(STRIPE_SIGNATURE) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| ApiServiceError::InvalidSignature)?,
        ),
        None => None,
    };

    state
        .webhook_usecase()
        .execute(signature, &payload, Utc::now().timestamp())
        .await?;

    Ok(Json(WebhookAck { received: true }))
}
