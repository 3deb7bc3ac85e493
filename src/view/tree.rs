//! Tree pane rendering.

use crate::state::AppState;
use crate::view::DashboardStyles;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Columns of indentation per tree level.
pub const INDENT_WIDTH: usize = 2;

/// First visible row such that the selection stays on screen.
pub fn tree_scroll_top(selected: usize, height: usize) -> usize {
    if height == 0 {
        return selected;
    }
    (selected + 1).saturating_sub(height)
}

/// Draw the tree pane with the selected row highlighted.
pub fn render_tree(frame: &mut Frame, area: Rect, state: &AppState, styles: &DashboardStyles) {
    let height = area.height as usize;
    let selected = state.selected_index();
    let top = tree_scroll_top(selected, height);

    let lines: Vec<Line> = state
        .rows()
        .iter()
        .enumerate()
        .skip(top)
        .take(height)
        .map(|(index, row)| {
            let mut style = styles.row_style(row.kind);
            if index == selected {
                style = style.patch(styles.selected_style());
            }
            Line::from(vec![
                Span::raw(" ".repeat(row.depth * INDENT_WIDTH)),
                Span::styled(row.label.clone(), style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}
