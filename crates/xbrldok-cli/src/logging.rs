//! Diagnostic logging setup
//!
//! Library crates log through `tracing`; the CLI installs a single fmt
//! subscriber writing to stderr so that stdout carries only the progress
//! trail and JSON output.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "warn,xbrldok=info";

/// Filter selected by `--verbose`
pub const VERBOSE_FILTER: &str = "warn,xbrldok=debug";

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects debug output for
/// the xbrldok crates. Calling this twice is harmless.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_FILTER
        } else {
            DEFAULT_FILTER
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
