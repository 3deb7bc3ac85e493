//! Dashboard state and transitions.
//!
//! AppState owns everything the dashboard draws: the flattened tree, the
//! selection, the live run and the status line. It is mutated only from the
//! UI loop; background work reaches it through [`RunUpdate`] messages.

use crate::model::{RunEpoch, RunState, RunStatus, RunUpdate, TestTree};
use crate::state::output_scroll::{OutputScroll, OutputViewport};
use crate::state::tree_rows::{flatten, RowTarget, TreeRow};
use std::fmt;
use tracing::debug;

/// Text of the one-line status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    /// Idle hint shown at startup.
    Help,
    /// A run of the target is in progress.
    Running(String),
    /// The target's run exited successfully.
    Passed(String),
    /// The target's run exited unsuccessfully.
    Failed(String),
    /// The target's run could not be started.
    LaunchError(String),
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLine::Help => f.write_str("Ctrl+C: Exit | r: Run tests"),
            StatusLine::Running(target) => write!(f, "Running: {target}"),
            StatusLine::Passed(target) => write!(f, "Test passed: {target}"),
            StatusLine::Failed(target) => write!(f, "Test failed: {target}"),
            StatusLine::LaunchError(target) => write!(f, "Launch error: {target}"),
        }
    }
}

/// Application state. Pure data, no side effects.
#[derive(Debug, Clone)]
pub struct AppState {
    tree: TestTree,

    /// Root row first, then the tree in display order. Never empty.
    rows: Vec<TreeRow>,

    /// Index into `rows`. Starts on the root.
    selected: usize,

    /// The live run, if any run has been started.
    run: Option<RunState>,

    status: StatusLine,

    /// Scroll position of the output pane.
    pub output_scroll: OutputScroll,

    /// Output pane geometry recorded by the last render.
    pub output_viewport: OutputViewport,
}

impl AppState {
    /// State for a freshly discovered tree: root selected, no run, help
    /// status.
    pub fn new(tree: TestTree) -> Self {
        let rows = flatten(&tree);
        Self {
            tree,
            rows,
            selected: 0,
            run: None,
            status: StatusLine::Help,
            output_scroll: OutputScroll::Follow,
            output_viewport: OutputViewport::default(),
        }
    }

    /// The discovered hierarchy.
    pub fn tree(&self) -> &TestTree {
        &self.tree
    }

    /// Rows of the tree pane, root first.
    pub fn rows(&self) -> &[TreeRow] {
        &self.rows
    }

    /// Index of the selected row.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The selected row.
    pub fn selected_row(&self) -> &TreeRow {
        // rows always holds at least the root row
        &self.rows[self.selected.min(self.rows.len() - 1)]
    }

    /// Target of the selected row.
    pub fn selected_target(&self) -> &RowTarget {
        &self.selected_row().target
    }

    /// Move the selection down one row, stopping at the last.
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    /// Move the selection up one row, stopping at the root.
    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Select the root row.
    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    /// Select the last row.
    pub fn select_last(&mut self) {
        self.selected = self.rows.len() - 1;
    }

    /// Select the row with the given target path. Returns `false` when no
    /// row matches.
    #[cfg(test)]
    pub(crate) fn select_path(&mut self, path: &str) -> bool {
        let found = self
            .rows
            .iter()
            .position(|row| matches!(&row.target, RowTarget::Path(p) if p == path));
        if let Some(index) = found {
            self.selected = index;
        }
        found.is_some()
    }

    /// The live run, if one has been started.
    pub fn run(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    /// Current status bar text.
    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Output of the live run; empty before the first run.
    pub fn output(&self) -> &[u8] {
        self.run.as_ref().map(RunState::output).unwrap_or_default()
    }

    /// Launch failure message of the live run, if it failed to start.
    pub fn launch_error(&self) -> Option<&str> {
        match self.run.as_ref().map(RunState::status) {
            Some(RunStatus::LaunchError(message)) => Some(message.as_str()),
            _ => None,
        }
    }

    /// Start tracking a new run. The previous run's output is discarded and
    /// any of its late updates will be ignored.
    pub fn begin_run(&mut self, epoch: RunEpoch, target: impl Into<String>) {
        let target = target.into();
        debug!(%epoch, test_target = %target, "Tracking new run");
        self.status = StatusLine::Running(target.clone());
        self.run = Some(RunState::new(epoch, target));
        self.output_scroll = OutputScroll::Follow;
    }

    /// Apply a background update. Returns `true` if anything visible changed.
    pub fn apply_update(&mut self, update: RunUpdate) -> bool {
        let Some(run) = self.run.as_mut() else {
            debug!(epoch = %update.epoch(), "Update with no run in progress");
            return false;
        };

        let epoch = update.epoch();
        if !run.apply(update) {
            if epoch != run.epoch() {
                debug!(%epoch, live = %run.epoch(), "Dropped update from superseded run");
            }
            return false;
        }

        let target = run.target().to_string();
        self.status = match run.status() {
            RunStatus::Launching | RunStatus::Streaming => StatusLine::Running(target),
            RunStatus::Passed => StatusLine::Passed(target),
            RunStatus::Failed => StatusLine::Failed(target),
            RunStatus::LaunchError(_) => StatusLine::LaunchError(target),
        };
        true
    }
}

#[cfg(test)]
#[path = "app_state_tests.rs"]
mod tests;
