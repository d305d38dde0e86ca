//! Tracing setup for the `orca` binary

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "ORCA_LOG";

/// Level used when `ORCA_LOG` is unset
pub fn default_directive(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "orca=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    }
}

/// Initialize tracing on stderr so stdout stays pipeable
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(true, false), "orca=debug");
        assert_eq!(default_directive(true, true), "orca=debug");
        assert_eq!(default_directive(false, true), "error");
        assert_eq!(default_directive(false, false), "warn");
    }
}
