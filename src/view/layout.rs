//! Dashboard layout.
//!
//! Tree on the left third, bordered output on the right two thirds, and a
//! centered one-line status bar along the bottom.

use crate::state::{AppState, OutputViewport};
use crate::view::{output, tree, DashboardStyles};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

/// Screen regions of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardAreas {
    /// Left third: the test tree.
    pub tree: Rect,
    /// Right two thirds: bordered test output.
    pub output: Rect,
    /// Bottom row: the status line.
    pub status: Rect,
}

/// Split the frame into tree, output and status regions.
pub fn calculate_areas(frame_area: Rect) -> DashboardAreas {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Panes
            Constraint::Length(1), // Status bar (1 line)
        ])
        .split(frame_area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
        .split(vertical_chunks[0]);

    DashboardAreas {
        tree: horizontal_chunks[0],
        output: horizontal_chunks[1],
        status: vertical_chunks[1],
    }
}

/// Output pane geometry for the given frame and state, matching what
/// [`render_layout`] draws.
pub fn output_viewport(frame_area: Rect, state: &AppState) -> OutputViewport {
    let inner = output::output_block().inner(calculate_areas(frame_area).output);
    let rows = output::output_rows(state, inner.width as usize);
    OutputViewport::new(rows.len(), inner.height as usize)
}

/// Draw the whole dashboard.
pub fn render_layout(frame: &mut Frame, state: &AppState, styles: &DashboardStyles) {
    let areas = calculate_areas(frame.area());

    tree::render_tree(frame, areas.tree, state, styles);
    output::render_output(frame, areas.output, state, styles);
    render_status_bar(frame, areas.status, state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let status = Paragraph::new(state.status().to_string()).alignment(Alignment::Center);
    frame.render_widget(status, area);
}

#[cfg(test)]
#[path = "layout_tests.rs"]
mod tests;
