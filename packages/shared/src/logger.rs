//! Logger setup shared by all binaries.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive for a binary, e.g. `hiroba_server=debug`.
///
/// Cargo binary names use hyphens while tracing targets use the crate's
/// underscored module path.
pub fn default_directive(bin_name: &str, level: &str) -> String {
    format!("{}={}", bin_name.replace('-', "_"), level)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the default directive built from
/// `bin_name` and `level`.
pub fn setup_logger(bin_name: &str, level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(bin_name, level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
