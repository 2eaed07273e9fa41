use crate::domain::port::PaymentEventSink;
use crate::usecase::webhook::{HandleWebhookUseCase, SignatureVerifier};

/// State for the payment webhook route, passed via axum `State`.
#[derive(Clone)]
pub struct WebhookState<S> {
    pub verifier: SignatureVerifier,
    pub sink: S,
}

impl<S: PaymentEventSink + Clone> WebhookState<S> {
    pub fn webhook_usecase(&self) -> HandleWebhookUseCase<S> {
        HandleWebhookUseCase {
            verifier: self.verifier.clone(),
            sink: self.sink.clone(),
        }
    }
}
