//! Tracing setup.
//!
//! Events go to stderr: stdout is reserved for table and CSV output.

use tracing_subscriber::EnvFilter;

/// Initializes the global subscriber. `RUST_LOG` overrides `level`.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(level: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| err.to_string())
}
