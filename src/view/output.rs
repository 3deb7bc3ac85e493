//! Output pane rendering.
//!
//! Subprocess output is hard-wrapped to the pane width before scrolling, so
//! row counts used for paging match what is drawn exactly.

use crate::state::{AppState, OutputViewport};
use crate::view::DashboardStyles;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthChar;

/// Title of the output pane border.
pub const OUTPUT_TITLE: &str = "Test Output";

const TAB_WIDTH: usize = 4;

/// Split text into display rows no wider than `width` columns.
///
/// A trailing newline does not produce an extra empty row. Carriage returns
/// and other control characters are dropped; tabs become spaces.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let body = text.strip_suffix('\n').unwrap_or(text);
    if text.is_empty() {
        return rows;
    }

    for line in body.split('\n') {
        let mut row = String::new();
        let mut row_width = 0;
        for ch in line.chars() {
            let (c, repeat) = match ch {
                '\t' => (' ', TAB_WIDTH),
                c if c.is_control() => continue,
                c => (c, 1),
            };
            let ch_width = c.width().unwrap_or(0);
            for _ in 0..repeat {
                if row_width + ch_width > width && row_width > 0 {
                    rows.push(std::mem::take(&mut row));
                    row_width = 0;
                }
                row.push(c);
                row_width += ch_width;
            }
        }
        rows.push(row);
    }
    rows
}

/// Wrapped rows of the live run: decoded output, then the launch error if
/// the run never started. The flag marks error rows.
pub fn output_rows(state: &AppState, width: usize) -> Vec<(String, bool)> {
    let output = String::from_utf8_lossy(state.output());
    let mut rows: Vec<(String, bool)> = wrap_text(&output, width)
        .into_iter()
        .map(|row| (row, false))
        .collect();
    if let Some(message) = state.launch_error() {
        rows.extend(wrap_text(message, width).into_iter().map(|row| (row, true)));
    }
    rows
}

/// Bordered output block; its inner area is where rows are drawn.
pub fn output_block() -> Block<'static> {
    Block::default().borders(Borders::ALL).title(OUTPUT_TITLE)
}

/// Draw the output pane, honouring the scroll position.
pub fn render_output(frame: &mut Frame, area: Rect, state: &AppState, styles: &DashboardStyles) {
    let block = output_block();
    let inner = block.inner(area);
    let rows = output_rows(state, inner.width as usize);
    let viewport = OutputViewport::new(rows.len(), inner.height as usize);
    let top = state.output_scroll.top(viewport);

    let lines: Vec<Line> = rows
        .into_iter()
        .skip(top)
        .take(viewport.height)
        .map(|(row, is_error)| {
            if is_error {
                Line::from(Span::styled(row, styles.error_style()))
            } else {
                Line::from(row)
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_lines_are_kept_whole() {
        assert_eq!(wrap_text("a\nbc\n", 10), vec!["a", "bc"]);
    }

    #[test]
    fn empty_text_has_no_rows() {
        assert!(wrap_text("", 10).is_empty());
    }

    #[test]
    fn blank_lines_are_preserved() {
        assert_eq!(wrap_text("a\n\nb", 10), vec!["a", "", "b"]);
    }

    #[test]
    fn long_lines_are_hard_wrapped() {
        assert_eq!(wrap_text("abcdefg", 3), vec!["abc", "def", "g"]);
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(wrap_text("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn carriage_returns_are_dropped_and_tabs_expanded() {
        assert_eq!(wrap_text("a\r\n\tb", 10), vec!["a", "    b"]);
    }

    #[test]
    fn zero_width_is_treated_as_one_column() {
        assert_eq!(wrap_text("ab", 0), vec!["a", "b"]);
    }
}
