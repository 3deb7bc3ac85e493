//! Error types for testdeck.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error for startup and the event loop
//!   - [`DiscoveryError`] - The collect-only invocation could not run or failed
//!   - `std::io::Error` - Terminal/TUI failures
//! - [`LaunchError`] - A test run could not be started
//!
//! # Recovery Strategy
//!
//! Discovery failure is the only fatal condition: it is reported before the
//! terminal enters raw mode and the process exits non-zero. Launch errors are
//! recovered locally and rendered into the output pane. A failing test run is
//! an ordinary outcome, not an error, and has no variant here. Parse rejects
//! are silent.

use std::process::ExitStatus;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Test discovery failed at startup.
    #[error("Error discovering tests: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Terminal or TUI rendering error.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// The discovery subprocess could not run or returned an error.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The framework program could not be started.
    #[error("error running {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The framework exited unsuccessfully.
    ///
    /// `stderr` holds whatever the framework printed, trimmed, so the user
    /// sees the framework's own diagnosis.
    #[error("error running {program}: {status}{}", format_stderr(.stderr))]
    Exited {
        /// Program that was run.
        program: String,
        /// Its exit status.
        status: ExitStatus,
        /// Captured standard error, trimmed.
        stderr: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!("\n{stderr}")
    }
}

/// A test run could not be launched. No output was streamed.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Process creation failed (missing program, permissions, pipe creation).
    #[error("Error starting {program}: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The process started but an output pipe was not available.
    #[error("Error creating {stream} pipe")]
    MissingPipe {
        /// The stream with no pipe.
        stream: crate::model::StreamKind,
    },
}
