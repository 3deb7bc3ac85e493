//! TUI rendering and terminal management (impure shell)

pub mod layout;
pub mod output;
mod styles;
pub mod tree;

pub use styles::{ColorConfig, DashboardStyles};

use crate::config::{KeyBindings, ResolvedConfig};
use crate::model::{AppError, KeyAction, RunUpdate, TestTree};
use crate::runner::ExecutionController;
use crate::state::{handle_navigation_action, AppState, RowTarget};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;
use tracing::{debug, info};

/// How long the loop waits for terminal input before draining run updates.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Updates applied per loop iteration, so a flood of output cannot starve
/// keyboard input.
const MAX_UPDATES_PER_TICK: usize = 256;

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    terminal: Terminal<B>,
    app_state: AppState,
    key_bindings: KeyBindings,
    styles: DashboardStyles,
    controller: ExecutionController,
    /// Single consumer of every background run update.
    updates: Receiver<RunUpdate>,
}

impl TuiApp<CrosstermBackend<Stdout>> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(tree: TestTree, config: &ResolvedConfig) -> Result<Self, AppError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self::with_terminal(terminal, tree, config))
    }

    /// Run the main event loop
    ///
    /// Returns when the user quits. Redraws only after input or applied
    /// run updates.
    pub fn run(&mut self) -> Result<(), AppError> {
        self.draw()?;

        loop {
            let mut dirty = false;

            if event::poll(POLL_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                        dirty = true;
                    }
                    Event::Resize(..) => dirty = true,
                    _ => {}
                }
            }

            dirty |= self.drain_updates();

            if dirty {
                self.draw()?;
            }
        }
    }
}

impl<B> TuiApp<B>
where
    B: ratatui::backend::Backend,
{
    /// Build the app on an already prepared terminal.
    pub fn with_terminal(terminal: Terminal<B>, tree: TestTree, config: &ResolvedConfig) -> Self {
        let (sender, updates) = mpsc::channel();
        let controller = ExecutionController::new(config.framework(), sender);

        Self {
            terminal,
            app_state: AppState::new(tree),
            key_bindings: config.keybindings.clone(),
            styles: DashboardStyles::with_color_config(ColorConfig::from_no_color(
                config.no_color,
            )),
            controller,
            updates,
        }
    }

    /// Current dashboard state.
    pub fn app_state(&self) -> &AppState {
        &self.app_state
    }

    /// The terminal being drawn to.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Handle a single keyboard event
    ///
    /// Returns true if app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        // Ctrl+C always quits, even if rebound
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }

        let Some(action) = self.key_bindings.get(key) else {
            return false;
        };

        match action {
            KeyAction::Quit => return true,
            KeyAction::RunSelected => self.run_selected(),
            other => {
                handle_navigation_action(&mut self.app_state, other);
            }
        }
        false
    }

    /// Start a run for the selected row. The root row runs nothing.
    fn run_selected(&mut self) {
        let RowTarget::Path(target) = self.app_state.selected_target() else {
            debug!("Root selected, nothing to run");
            return;
        };
        let target = target.clone();

        // The handle is dropped: the run completes on its own and reports
        // through the update channel.
        let handle = self.controller.run(&target);
        info!(epoch = %handle.epoch(), test_target = %target, "Run requested");
        self.app_state.begin_run(handle.epoch(), target);
    }

    /// Apply pending run updates. Returns `true` if anything visible changed.
    pub fn drain_updates(&mut self) -> bool {
        let mut changed = false;
        for update in self.updates.try_iter().take(MAX_UPDATES_PER_TICK) {
            changed |= self.app_state.apply_update(update);
        }
        changed
    }

    /// Render the dashboard, recording output pane geometry for paging.
    pub fn draw(&mut self) -> Result<(), AppError> {
        let size = self.terminal.size()?;
        let frame_area = Rect::new(0, 0, size.width, size.height);
        self.app_state.output_viewport = layout::output_viewport(frame_area, &self.app_state);

        let state = &self.app_state;
        let styles = &self.styles;
        self.terminal.draw(|frame| {
            layout::render_layout(frame, state, styles);
        })?;

        Ok(())
    }
}

/// Show the dashboard for a discovered tree until the user quits.
///
/// The terminal is restored even if the loop fails.
pub fn run_dashboard(tree: TestTree, config: &ResolvedConfig) -> Result<(), AppError> {
    let mut app = TuiApp::new(tree, config)?;

    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode and leaves alternate screen
pub fn restore_terminal() -> Result<(), AppError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;
