//! Subscriber setup.

use tracing_subscriber::EnvFilter;

/// Log to stderr. `RUST_LOG` overrides the configured level.
pub(crate) fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
