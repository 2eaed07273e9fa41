use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{info, warn};

use crate::domain::port::PaymentEventSink;
use crate::domain::types::{SignatureHeader, WebhookEvent};
use crate::error::ApiServiceError;

type HmacSha256 = Hmac<Sha256>;

// ── SignatureVerifier ────────────────────────────────────────────────────────

/// Verifies `Stripe-Signature` headers against the exact request bytes.
#[derive(Clone)]
pub struct SignatureVerifier {
    secret: String,
    tolerance_secs: i64,
}

impl SignatureVerifier {
    pub fn new(secret: impl Into<String>, tolerance_secs: u64) -> Self {
        Self {
            secret: secret.into(),
            tolerance_secs: i64::try_from(tolerance_secs).unwrap_or(i64::MAX),
        }
    }

    /// Accept when any `v1` signature is the HMAC-SHA256 of `"{t}." ++ payload`
    /// and `t` is no older than the tolerance.
    pub fn verify(&self, header: &str, payload: &[u8], now: i64) -> Result<(), ApiServiceError> {
        let header = SignatureHeader::parse(header).ok_or(ApiServiceError::InvalidSignature)?;

        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| anyhow::anyhow!("webhook secret rejected by HMAC: {e}"))?;
        mac.update(header.signed_timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);

        // verify_slice compares in constant time.
        let matched = header
            .signatures
            .iter()
            .any(|sig| mac.clone().verify_slice(sig).is_ok());
        if !matched {
            return Err(ApiServiceError::InvalidSignature);
        }

        if header.timestamp < now.saturating_sub(self.tolerance_secs) {
            warn!(
                timestamp = header.timestamp,
                now, "webhook signature outside tolerance"
            );
            return Err(ApiServiceError::InvalidSignature);
        }
        Ok(())
    }
}

// ── HandleWebhook ────────────────────────────────────────────────────────────

pub struct HandleWebhookUseCase<S: PaymentEventSink> {
    pub verifier: SignatureVerifier,
    pub sink: S,
}

impl<S: PaymentEventSink> HandleWebhookUseCase<S> {
    /// Verify, decode and dispatch one delivery. Nothing reaches the sink
    /// unless the signature checks out.
    pub async fn execute(
        &self,
        signature: Option<&str>,
        payload: &[u8],
        now: i64,
    ) -> Result<WebhookEvent, ApiServiceError> {
        let signature = signature.ok_or(ApiServiceError::MissingSignature)?;
        self.verifier.verify(signature, payload, now)?;

        let event: WebhookEvent =
            serde_json::from_slice(payload).map_err(|_| ApiServiceError::InvalidPayload)?;
        info!(event_id = %event.id, kind = %event.kind, "payment event verified");

        self.sink.dispatch(event.clone()).await?;
        Ok(event)
    }
}
