//! Logger setup shared by the Roomcast binaries.

use tracing_subscriber::{EnvFilter, fmt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `default_level` is applied to the
/// whole process. The binary name is recorded once so log lines from
/// different processes can be told apart.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init: tests may install a subscriber more than once
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_ansi(true)
        .try_init();

    tracing::debug!(bin = bin_name, "logger initialized");
}
