use tracing::info;

use greencart_api::config::ApiConfig;
use greencart_api::infra::events::TracingEventSink;
use greencart_api::router::ResourceRouters;
use greencart_api::server::{Server, shutdown_signal};
use greencart_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    // A missing .env is fine; variables may come from the environment.
    let _ = dotenvy::dotenv();
    init_tracing();

    let config = ApiConfig::from_env().expect("failed to load configuration");
    info!(
        port = config.port,
        origins = ?config.cors.origins(),
        "starting greencart api"
    );

    let server = Server::bootstrap(config, TracingEventSink, ResourceRouters::unmounted())
        .await
        .expect("startup failed");

    server
        .serve(shutdown_signal())
        .await
        .expect("server error");
}
