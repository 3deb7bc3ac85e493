//! Execution of a single test target as a subprocess.
//!
//! Each run is supervised by a background thread:
//!
//! ```text
//! Idle -> Launching -> Streaming -> {Passed, Failed}
//!            \-> LaunchError
//! ```
//!
//! The supervisor spawns the framework, starts one reader per output stream,
//! waits for the process to exit, then joins both readers before reporting
//! [`RunUpdate::Finished`]. Every message goes through the update channel, so
//! the UI loop is the only place dashboard state changes.
//!
//! Runs are never cancelled. Starting a new run leaves the previous process
//! alone; its messages carry an older [`RunEpoch`] and are discarded by the
//! consumer.

pub mod stream;

use crate::framework::FrameworkCommand;
use crate::model::{LaunchError, RunEpoch, RunStatus, RunUpdate, StreamKind};
use std::process::{Child, ChildStderr, ChildStdout, Command};
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

pub use stream::CHUNK_SIZE;

/// Launches test runs and streams their progress into an update channel.
#[derive(Debug)]
pub struct ExecutionController {
    framework: FrameworkCommand,
    updates: Sender<RunUpdate>,
    last_epoch: RunEpoch,
}

/// A launched run. Dropping it detaches the supervisor thread.
#[derive(Debug)]
pub struct RunHandle {
    epoch: RunEpoch,
    supervisor: JoinHandle<RunStatus>,
}

impl RunHandle {
    /// Epoch assigned to this run.
    pub fn epoch(&self) -> RunEpoch {
        self.epoch
    }

    /// Block until the run reaches a terminal status.
    ///
    /// Every update of the run has been sent by the time this returns.
    pub fn wait(self) -> RunStatus {
        self.supervisor
            .join()
            .unwrap_or_else(|_| RunStatus::LaunchError("run supervisor panicked".to_string()))
    }
}

impl ExecutionController {
    /// Controller that reports every run on `updates`.
    pub fn new(framework: FrameworkCommand, updates: Sender<RunUpdate>) -> Self {
        Self {
            framework,
            updates,
            last_epoch: RunEpoch::new(0),
        }
    }

    /// Framework invocation used for runs.
    pub fn framework(&self) -> &FrameworkCommand {
        &self.framework
    }

    /// Epoch of the most recently started run (`#0` before any run).
    pub fn last_epoch(&self) -> RunEpoch {
        self.last_epoch
    }

    /// Start running exactly `target` in the background.
    pub fn run(&mut self, target: &str) -> RunHandle {
        self.last_epoch = self.last_epoch.next();
        let epoch = self.last_epoch;

        let command = self.framework.run_command(target);
        let program = self.framework.program().to_string();
        let updates = self.updates.clone();
        let target = target.to_string();

        info!(%epoch, test_target = %target, "Starting test run");
        let supervisor = thread::spawn(move || supervise(command, &program, &target, epoch, &updates));

        RunHandle { epoch, supervisor }
    }
}

/// Send an update, ignoring a closed channel: the dashboard has exited and
/// nobody is listening any more.
pub(crate) fn send(updates: &Sender<RunUpdate>, update: RunUpdate) {
    if updates.send(update).is_err() {
        debug!("Update channel closed, dropping update");
    }
}

fn supervise(
    mut command: Command,
    program: &str,
    target: &str,
    epoch: RunEpoch,
    updates: &Sender<RunUpdate>,
) -> RunStatus {
    let (mut child, stdout, stderr) = match launch(&mut command, program) {
        Ok(launched) => launched,
        Err(err) => {
            warn!(%epoch, test_target = target, error = %err, "Failed to launch test run");
            let message = err.to_string();
            send(
                updates,
                RunUpdate::LaunchFailed {
                    epoch,
                    message: message.clone(),
                },
            );
            return RunStatus::LaunchError(message);
        }
    };

    let pid = child.id();
    debug!(%epoch, pid, "Test process started");
    send(updates, RunUpdate::Launched { epoch, pid });

    let readers = [
        stream::spawn_reader(stdout, StreamKind::Stdout, epoch, updates.clone()),
        stream::spawn_reader(stderr, StreamKind::Stderr, epoch, updates.clone()),
    ];

    let passed = match child.wait() {
        Ok(status) => {
            info!(%epoch, test_target = target, %status, "Test process exited");
            status.success()
        }
        Err(err) => {
            warn!(%epoch, test_target = target, error = %err, "Failed to wait for test process");
            false
        }
    };

    // Readers may still hold undelivered chunks after exit; Finished must
    // come after all of them.
    for reader in readers {
        if reader.join().is_err() {
            warn!(%epoch, "Stream reader panicked");
        }
    }

    send(updates, RunUpdate::Finished { epoch, passed });
    if passed {
        RunStatus::Passed
    } else {
        RunStatus::Failed
    }
}

fn launch(
    command: &mut Command,
    program: &str,
) -> Result<(Child, ChildStdout, ChildStderr), LaunchError> {
    let mut child = command.spawn().map_err(|source| LaunchError::Spawn {
        program: program.to_string(),
        source,
    })?;

    match (child.stdout.take(), child.stderr.take()) {
        (Some(stdout), Some(stderr)) => Ok((child, stdout, stderr)),
        (stdout, _) => {
            let stream = if stdout.is_none() {
                StreamKind::Stdout
            } else {
                StreamKind::Stderr
            };
            // Nothing will read its output; do not leave it running.
            let _ = child.kill();
            let _ = child.wait();
            Err(LaunchError::MissingPipe { stream })
        }
    }
}
