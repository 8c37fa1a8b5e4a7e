//! # Diagnostics
//!
//! Installs the `tracing` subscriber. Logs go to stderr so stdout only ever
//! carries the confirmation line.

use tracing_subscriber::EnvFilter;

/// Initializes logging from `RUST_LOG`, or at `debug` when `verbose` is set.
///
/// Defaults to `warn`. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
