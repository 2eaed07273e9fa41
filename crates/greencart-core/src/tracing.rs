use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter applied when `RUST_LOG` is unset or unparseable.
const DEFAULT_FILTER: &str = "info,tower_http=info,sqlx=warn";

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the process-wide subscriber: one JSON object per event on stdout.
/// A second call leaves the first subscriber in place.
pub fn init_tracing() {
    let installed = tracing_subscriber::registry()
        .with(filter())
        .with(fmt::layer().json().with_current_span(true))
        .try_init();
    if installed.is_ok() {
        tracing::debug!("tracing initialised");
    }
}
