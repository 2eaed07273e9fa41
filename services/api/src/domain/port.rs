use std::future::Future;

use crate::domain::types::WebhookEvent;
use crate::error::ApiServiceError;

/// Receiver of verified payment events (the order/payment controller).
///
/// Returns `impl Future + Send` rather than `async fn` so handlers generic
/// over the sink still produce `Send` futures.
pub trait PaymentEventSink: Send + Sync {
    fn dispatch(
        &self,
        event: WebhookEvent,
    ) -> impl Future<Output = Result<(), ApiServiceError>> + Send;
}
