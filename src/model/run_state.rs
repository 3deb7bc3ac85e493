//! State of a single test run and the messages that mutate it.
//!
//! Background tasks never touch dashboard state directly. They send
//! [`RunUpdate`] messages, which the UI loop applies to the live [`RunState`].

use std::fmt;

/// Monotonic run counter. Each run command gets a fresh epoch, so updates
/// from a superseded run can be told apart from the live one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunEpoch(u64);

impl RunEpoch {
    /// Epoch with the given counter value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The epoch that follows this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle of a run.
///
/// `Launching` is the only state before the process exists; once it has been
/// spawned the run is `Streaming` until a terminal state is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Run requested, process not spawned yet.
    Launching,
    /// Process running, output arriving.
    Streaming,
    /// Process exited with status zero.
    Passed,
    /// Process exited non-zero or was killed by a signal.
    Failed,
    /// Process could not be started. Holds the user-facing message.
    LaunchError(String),
}

impl RunStatus {
    /// Passed, failed or never launched. No further updates apply.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Passed | RunStatus::Failed | RunStatus::LaunchError(_)
        )
    }

    /// Launching or streaming.
    pub fn is_running(&self) -> bool {
        !self.is_terminal()
    }
}

/// Which output stream of the subprocess a reader drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Stdout => f.write_str("stdout"),
            StreamKind::Stderr => f.write_str("stderr"),
        }
    }
}

/// Immutable update message sent from background tasks to the UI loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunUpdate {
    /// Process spawned; the run is now streaming.
    Launched {
        /// Run this update belongs to.
        epoch: RunEpoch,
        /// OS process id of the framework.
        pid: u32,
    },
    /// A non-empty chunk read from either stream.
    Output {
        /// Run this update belongs to.
        epoch: RunEpoch,
        /// Raw bytes, undecoded.
        bytes: Vec<u8>,
    },
    /// A reader reached end-of-stream or a read error.
    StreamClosed {
        /// Run this update belongs to.
        epoch: RunEpoch,
        /// The stream that closed.
        stream: StreamKind,
    },
    /// Process exited and both readers have terminated. Always the last
    /// message of a launched run.
    Finished {
        /// Run this update belongs to.
        epoch: RunEpoch,
        /// Exit status was success.
        passed: bool,
    },
    /// Pipe creation or process start failed. No streaming occurs.
    LaunchFailed {
        /// Run this update belongs to.
        epoch: RunEpoch,
        /// Error text shown in the output pane.
        message: String,
    },
}

impl RunUpdate {
    /// Run the update belongs to.
    pub fn epoch(&self) -> RunEpoch {
        match self {
            RunUpdate::Launched { epoch, .. }
            | RunUpdate::Output { epoch, .. }
            | RunUpdate::StreamClosed { epoch, .. }
            | RunUpdate::Finished { epoch, .. }
            | RunUpdate::LaunchFailed { epoch, .. } => *epoch,
        }
    }
}

/// The one live run tracked by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    epoch: RunEpoch,
    target: String,
    status: RunStatus,
    output: Vec<u8>,
    open_streams: u8,
}

impl RunState {
    /// Fresh run in `Launching` with no output.
    pub fn new(epoch: RunEpoch, target: impl Into<String>) -> Self {
        Self {
            epoch,
            target: target.into(),
            status: RunStatus::Launching,
            output: Vec::new(),
            open_streams: 0,
        }
    }

    /// Epoch this run was started with.
    pub fn epoch(&self) -> RunEpoch {
        self.epoch
    }

    /// Qualified path handed to the framework.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Current lifecycle state.
    pub fn status(&self) -> &RunStatus {
        &self.status
    }

    /// Append-only output, both streams interleaved in arrival order.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Readers still draining.
    pub fn open_streams(&self) -> u8 {
        self.open_streams
    }

    /// Apply an update. Returns `false` if it belongs to another run or
    /// arrives after a terminal state, in which case nothing changes.
    pub fn apply(&mut self, update: RunUpdate) -> bool {
        if update.epoch() != self.epoch || self.status.is_terminal() {
            return false;
        }

        match update {
            RunUpdate::Launched { .. } => {
                self.status = RunStatus::Streaming;
                self.open_streams = 2;
            }
            RunUpdate::Output { bytes, .. } => {
                if bytes.is_empty() {
                    return false;
                }
                self.output.extend_from_slice(&bytes);
            }
            RunUpdate::StreamClosed { .. } => {
                self.open_streams = self.open_streams.saturating_sub(1);
            }
            RunUpdate::Finished { passed, .. } => {
                self.open_streams = 0;
                self.status = if passed {
                    RunStatus::Passed
                } else {
                    RunStatus::Failed
                };
            }
            RunUpdate::LaunchFailed { message, .. } => {
                self.status = RunStatus::LaunchError(message);
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E1: RunEpoch = RunEpoch::new(1);
    const E2: RunEpoch = RunEpoch::new(2);

    fn output(epoch: RunEpoch, s: &str) -> RunUpdate {
        RunUpdate::Output {
            epoch,
            bytes: s.as_bytes().to_vec(),
        }
    }

    #[test]
    fn new_run_starts_launching_with_empty_buffer() {
        let run = RunState::new(E1, "a.py::t");
        assert_eq!(run.status(), &RunStatus::Launching);
        assert!(run.output().is_empty());
        assert_eq!(run.target(), "a.py::t");
    }

    #[test]
    fn launched_moves_to_streaming() {
        let mut run = RunState::new(E1, "t");
        assert!(run.apply(RunUpdate::Launched { epoch: E1, pid: 42 }));
        assert_eq!(run.status(), &RunStatus::Streaming);
        assert_eq!(run.open_streams(), 2);
    }

    #[test]
    fn output_is_appended_in_arrival_order() {
        let mut run = RunState::new(E1, "t");
        run.apply(RunUpdate::Launched { epoch: E1, pid: 1 });
        run.apply(output(E1, "one "));
        run.apply(output(E1, "two "));
        run.apply(output(E1, "three"));
        assert_eq!(run.output(), b"one two three");
    }

    #[test]
    fn empty_chunks_are_ignored() {
        let mut run = RunState::new(E1, "t");
        assert!(!run.apply(output(E1, "")));
    }

    #[test]
    fn stream_closures_are_counted() {
        let mut run = RunState::new(E1, "t");
        run.apply(RunUpdate::Launched { epoch: E1, pid: 1 });
        run.apply(RunUpdate::StreamClosed {
            epoch: E1,
            stream: StreamKind::Stdout,
        });
        assert_eq!(run.open_streams(), 1);
        run.apply(RunUpdate::StreamClosed {
            epoch: E1,
            stream: StreamKind::Stderr,
        });
        assert_eq!(run.open_streams(), 0);
        assert!(run.status().is_running());
    }

    #[test]
    fn finished_sets_verdict() {
        let mut passed = RunState::new(E1, "t");
        passed.apply(RunUpdate::Finished {
            epoch: E1,
            passed: true,
        });
        assert_eq!(passed.status(), &RunStatus::Passed);

        let mut failed = RunState::new(E1, "t");
        failed.apply(RunUpdate::Finished {
            epoch: E1,
            passed: false,
        });
        assert_eq!(failed.status(), &RunStatus::Failed);
    }

    #[test]
    fn launch_failure_is_terminal() {
        let mut run = RunState::new(E1, "t");
        run.apply(RunUpdate::LaunchFailed {
            epoch: E1,
            message: "no such file".to_string(),
        });
        assert_eq!(
            run.status(),
            &RunStatus::LaunchError("no such file".to_string())
        );
        assert!(!run.apply(RunUpdate::Launched { epoch: E1, pid: 1 }));
    }

    #[test]
    fn updates_from_other_epochs_are_dropped() {
        let mut run = RunState::new(E2, "t");
        run.apply(RunUpdate::Launched { epoch: E2, pid: 1 });
        assert!(!run.apply(output(E1, "stale")));
        assert!(!run.apply(RunUpdate::Finished {
            epoch: E1,
            passed: true
        }));
        assert!(run.output().is_empty());
        assert_eq!(run.status(), &RunStatus::Streaming);
    }

    #[test]
    fn output_after_finish_is_dropped() {
        let mut run = RunState::new(E1, "t");
        run.apply(RunUpdate::Finished {
            epoch: E1,
            passed: true,
        });
        assert!(!run.apply(output(E1, "late")));
        assert!(run.output().is_empty());
    }

    #[test]
    fn epochs_increase() {
        assert!(E1.next() > E1);
        assert_eq!(E1.next(), E2);
        assert_eq!(E2.to_string(), "#2");
    }
}
