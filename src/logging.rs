//! Logging setup.
//!
//! Diagnostics go to stderr so that stdout carries only command output.
//! `PAG_OFF_LOG` takes an `EnvFilter` directive and overrides `--debug`;
//! `PAG_OFF_LOG_FORMAT=json` switches to one JSON object per event.

use std::env;
use std::io;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, fmt};

pub const LOG_ENV: &str = "PAG_OFF_LOG";
pub const LOG_FORMAT_ENV: &str = "PAG_OFF_LOG_FORMAT";

/// Default filter directive for the given verbosity.
#[must_use]
pub const fn default_directive(debug: bool) -> &'static str {
    if debug {
        "pag_off=debug,pag_off_lib=debug,info"
    } else {
        "pag_off=info,pag_off_lib=info,warn"
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(debug: bool) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));
    let registry = tracing_subscriber::registry().with(filter);

    match env::var(LOG_FORMAT_ENV).as_deref() {
        Ok("json") => registry
            .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
            .try_init(),
        _ => registry
            .with(fmt::layer().compact().without_time().with_writer(io::stderr))
            .try_init(),
    }
}

/// Route logs through the test harness; repeated calls are no-ops.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new(default_directive(true)))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_parses() {
        init_test_logging();
        for debug in [false, true] {
            assert!(EnvFilter::try_new(default_directive(debug)).is_ok());
        }
        assert!(default_directive(true).contains("pag_off=debug"));
    }
}
