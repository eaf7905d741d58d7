//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Install a stderr fmt subscriber.
///
/// `RUST_LOG` wins over `fallback`; `verbose` forces `debug`.
pub fn init(verbose: bool, fallback: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // Ignore the error if a subscriber is already installed
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
