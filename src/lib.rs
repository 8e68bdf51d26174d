//! `pag_off` - work with a pagure project's tickets offline.
//!
//! This crate provides the `pag-off` command on top of `pag-off-lib`.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Layered YAML configuration
//! - [`format`] - Plain text rendering of tickets
//! - [`logging`] - tracing subscriber setup
//! - [`prompt`] - Console confirmation

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod format;
pub mod logging;
pub mod prompt;

use pag_off_lib::PagOffError;

use crate::config::ConfigError;

/// Exit status for a configuration problem.
pub const EXIT_INVALID_CONFIG: i32 = 3;
/// Exit status for a failed operation.
pub const EXIT_ERROR: i32 = 2;
/// Exit status when the operator interrupted the command.
pub const EXIT_INTERRUPTED: i32 = 1;

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or command execution
/// fails; see [`exit_code`].
pub fn run() -> anyhow::Result<()> {
    cli::run()
}

/// Map an error returned by [`run`] to the process exit status.
#[must_use]
pub fn exit_code(error: &anyhow::Error) -> i32 {
    if error.downcast_ref::<ConfigError>().is_some() {
        EXIT_INVALID_CONFIG
    } else if matches!(
        error.downcast_ref::<PagOffError>(),
        Some(PagOffError::Interrupted)
    ) {
        EXIT_INTERRUPTED
    } else {
        EXIT_ERROR
    }
}
