//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "SEQSYNTH_LOG";

static INIT: Once = Once::new();

/// Returns the filter used when `SEQSYNTH_LOG` is unset or invalid.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "seqsynth=debug"
    } else {
        "seqsynth=info"
    }
}

/// Initialize logging to stderr.
///
/// Reads `SEQSYNTH_LOG` for the filter, e.g. `SEQSYNTH_LOG=seqsynth=trace`.
/// Calling it more than once has no further effect.
pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .with(filter)
            .init();
    });
}
