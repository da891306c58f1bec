//! Log setup shared by the binaries.

use tracing::Level;
use tracing_subscriber::filter::EnvFilter;

/// Install a stderr subscriber. `RUST_LOG` still applies on top of the
/// default level (`info`, or `debug` when `verbose`).
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    // Ignore the error if a subscriber is already installed (tests, embedding)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .try_init();
}
