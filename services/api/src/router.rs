use axum::{
    Router,
    routing::{get, post},
};

use greencart_core::error::AppError;
use greencart_core::health::liveness;
use greencart_core::pipeline::Pipeline;

use crate::config::ApiConfig;
use crate::domain::port::PaymentEventSink;
use crate::handlers::webhook::receive_webhook;
use crate::state::WebhookState;
use crate::usecase::webhook::SignatureVerifier;

/// Path of the payment webhook. Registered ahead of the body parsers.
pub const WEBHOOK_PATH: &str = "/stripe";

/// Resources whose routers are mounted under `/api/<name>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    User,
    Seller,
    Product,
    Cart,
    Address,
    Order,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::User,
        Resource::Seller,
        Resource::Product,
        Resource::Cart,
        Resource::Address,
        Resource::Order,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Seller => "seller",
            Self::Product => "product",
            Self::Cart => "cart",
            Self::Address => "address",
            Self::Order => "order",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Self::User => "/api/user",
            Self::Seller => "/api/seller",
            Self::Product => "/api/product",
            Self::Cart => "/api/cart",
            Self::Address => "/api/address",
            Self::Order => "/api/order",
        }
    }
}

/// One router per [`Resource`]. Each is owned by its resource module and only
/// mounted here.
pub struct ResourceRouters {
    routers: [Router; 6],
}

impl ResourceRouters {
    /// Every resource answers 501 `NOT_MOUNTED` until a router is supplied.
    pub fn unmounted() -> Self {
        Self {
            routers: Resource::ALL.map(unmounted_router),
        }
    }

    pub fn with(mut self, resource: Resource, router: Router) -> Self {
        self.routers[resource as usize] = router;
        self
    }

    fn into_mounts(self) -> impl Iterator<Item = (Resource, Router)> {
        Resource::ALL.into_iter().zip(self.routers)
    }
}

impl Default for ResourceRouters {
    fn default() -> Self {
        Self::unmounted()
    }
}

fn unmounted_router(resource: Resource) -> Router {
    Router::new().fallback(move || async move { AppError::NotMounted(resource.name()) })
}

/// Assemble the HTTP surface in its fixed order: CORS, raw-body webhook,
/// body parsers, liveness, resource routers.
pub fn build_router<S>(config: &ApiConfig, sink: S, routers: ResourceRouters) -> Router
where
    S: PaymentEventSink + Clone + 'static,
{
    let webhook = WebhookState {
        verifier: SignatureVerifier::new(
            config.webhook.secret.clone(),
            config.webhook.tolerance_secs,
        ),
        sink,
    };

    let pipeline = Pipeline::new(config.cors.clone())
        .raw_body_route(WEBHOOK_PATH, post(receive_webhook::<S>).with_state(webhook))
        .body_parsers(config.json_body_limit)
        .route("/", get(liveness));

    routers
        .into_mounts()
        .fold(pipeline, |pipeline, (resource, router)| {
            pipeline.nest(resource.prefix(), router)
        })
        .build()
}
