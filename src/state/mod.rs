//! Dashboard state machine (pure).
//!
//! All state transitions are testable without a terminal.

pub mod app_state;
pub mod navigation_handler;
pub mod output_scroll;
pub mod tree_rows;

pub use app_state::{AppState, StatusLine};
pub use navigation_handler::handle_navigation_action;
pub use output_scroll::{OutputScroll, OutputViewport};
pub use tree_rows::{flatten, RowKind, RowTarget, TreeRow, ROOT_LABEL};
