use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use sea_orm::{DatabaseConnection, DbErr};
use tokio::net::TcpListener;
use tracing::{info, warn};

use greencart_core::config::ConfigError;

use crate::config::ApiConfig;
use crate::domain::port::PaymentEventSink;
use crate::infra::{db, media::MediaError, media::MediaStorage};
use crate::router::{ResourceRouters, build_router};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("storage connection failed: {0}")]
    Storage(#[from] DbErr),
    #[error("media storage connection failed: {0}")]
    Media(#[from] MediaError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
}

/// External connections established before any traffic is accepted.
/// Held for the lifetime of the server.
pub struct Backends {
    pub db: DatabaseConnection,
    pub media: MediaStorage,
}

impl Backends {
    /// Storage first, then media storage. Either failure aborts startup.
    pub async fn connect(config: &ApiConfig) -> Result<Self, StartupError> {
        let db = db::connect(&config.database_url).await?;
        let media = MediaStorage::connect(config.media.clone()).await?;
        Ok(Self { db, media })
    }

    pub async fn close(self) {
        if let Err(e) = self.db.close().await {
            warn!(error = %e, "failed to close storage connection");
        }
    }
}

/// A bound listener with its router and backends, ready to serve.
pub struct Server {
    listener: TcpListener,
    router: Router,
    backends: Backends,
}

impl Server {
    /// Connect backends, build the router, then bind. The listener does not
    /// exist unless every earlier step succeeded.
    pub async fn bootstrap<S>(
        config: ApiConfig,
        sink: S,
        routers: ResourceRouters,
    ) -> Result<Self, StartupError>
    where
        S: PaymentEventSink + Clone + 'static,
    {
        let backends = Backends::connect(&config).await?;
        let router = build_router(&config, sink, routers);

        let addr = SocketAddr::new(config.host, config.port);
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| StartupError::Bind { addr, source })?;

        Ok(Self {
            listener,
            router,
            backends,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn backends(&self) -> &Backends {
        &self.backends
    }

    /// Serve until `shutdown` resolves, drain in-flight requests, then close
    /// the backends.
    pub async fn serve<F>(self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = self.listener.local_addr() {
            info!("Server running at http://{addr}");
        }
        let result = axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await;
        self.backends.close().await;
        info!("server stopped");
        result
    }
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
