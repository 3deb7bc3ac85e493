//! Scroll position of the output pane.
//!
//! The pane follows the tail of the output until the user scrolls up, and
//! resumes following once scrolled back to the bottom.

/// Geometry of the output pane as of the last render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputViewport {
    /// Wrapped rows of output.
    pub total_rows: usize,
    /// Visible rows.
    pub height: usize,
}

impl OutputViewport {
    /// Viewport over `total_rows` rows showing `height` at a time.
    pub fn new(total_rows: usize, height: usize) -> Self {
        Self { total_rows, height }
    }

    /// Highest useful top row.
    pub fn max_top(&self) -> usize {
        self.total_rows.saturating_sub(self.height)
    }
}

/// Where the output pane is scrolled to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputScroll {
    /// Pinned to the last page.
    #[default]
    Follow,
    /// Pinned to a top row.
    Top(usize),
}

impl OutputScroll {
    /// First visible row for the given viewport.
    pub fn top(self, viewport: OutputViewport) -> usize {
        match self {
            OutputScroll::Follow => viewport.max_top(),
            OutputScroll::Top(top) => top.min(viewport.max_top()),
        }
    }

    /// Move `rows` towards the start, leaving follow mode.
    pub fn scroll_up(self, viewport: OutputViewport, rows: usize) -> Self {
        OutputScroll::Top(self.top(viewport).saturating_sub(rows))
    }

    /// Move `rows` towards the tail. Reaching the last page resumes
    /// following.
    pub fn scroll_down(self, viewport: OutputViewport, rows: usize) -> Self {
        let top = self.top(viewport) + rows;
        if top >= viewport.max_top() {
            OutputScroll::Follow
        } else {
            OutputScroll::Top(top)
        }
    }
}
