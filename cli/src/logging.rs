#![deny(missing_docs)]

//! # Logging
//!
//! Installs the `tracing` subscriber. `RUST_LOG` wins when set; otherwise the
//! level is `info`, or `debug` with `--verbose`.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset.
pub fn default_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Initializes logging to stderr. Calling it twice is a no-op.
pub fn init_logging(verbose: bool) {
    let level = default_level(verbose);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
