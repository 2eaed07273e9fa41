use std::future::Future;

use tracing::info;

use crate::domain::port::PaymentEventSink;
use crate::domain::types::WebhookEvent;
use crate::error::ApiServiceError;

/// Sink used when no payment controller is linked in: records each verified
/// event in the structured log and acknowledges it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl PaymentEventSink for TracingEventSink {
    fn dispatch(
        &self,
        event: WebhookEvent,
    ) -> impl Future<Output = Result<(), ApiServiceError>> + Send {
        async move {
            info!(
                event_id = %event.id,
                kind = %event.kind,
                created = event.created,
                "payment event received"
            );
            Ok(())
        }
    }
}
