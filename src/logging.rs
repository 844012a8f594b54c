//! Logging configuration for Crank applications.
//!
//! The library only emits `tracing` events; binaries pick a subscriber here,
//! usually once global options have been parsed and the verbosity is known.

use std::fs::{self, File};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use crate::cli::Verbosity;

/// Environment variable that overrides the verbosity-derived filter.
pub const LOG_ENV: &str = "CRANK_LOG";

/// Builds the filter: `CRANK_LOG`, then `RUST_LOG`, then the verbosity level.
pub fn env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(verbosity.as_filter()))
}

/// Initializes logging to stderr.
///
/// Returns false if a global subscriber was already installed.
pub fn init_stderr_logging(verbosity: Verbosity) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

/// Initializes logging to a file, truncated on each run.
///
/// Falls back to stderr logging if the file cannot be created.
pub fn init_file_logging(path: &Path, verbosity: Verbosity) -> bool {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            return init_stderr_logging(verbosity);
        }
    }

    let log_file = match File::create(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            return init_stderr_logging(verbosity);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbosity))
        .with_writer(log_file)
        .with_ansi(false) // No ANSI colors in file output
        .try_init()
        .is_ok()
}
