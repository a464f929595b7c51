use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_FILTER;

/// Installs the global subscriber, writing to stderr so log lines never mix
/// with rendered screens on stdout. An invalid filter falls back to the
/// default level. Calling this twice is a no-op.
pub fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
