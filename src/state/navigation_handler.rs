//! Keyboard actions that only touch dashboard state.
//!
//! Running a test needs the execution controller, so `RunSelected` and
//! `Quit` are left to the event loop.

use crate::model::KeyAction;
use crate::state::AppState;

/// Apply a selection or output-scroll action. Returns `false` for actions
/// this handler does not own.
pub fn handle_navigation_action(state: &mut AppState, action: KeyAction) -> bool {
    let viewport = state.output_viewport;
    // Page by a full pane, at least one row before the first render
    let page = viewport.height.max(1);

    match action {
        KeyAction::SelectNext => state.select_next(),
        KeyAction::SelectPrev => state.select_prev(),
        KeyAction::SelectFirst => state.select_first(),
        KeyAction::SelectLast => state.select_last(),
        KeyAction::ScrollOutputUp => {
            state.output_scroll = state.output_scroll.scroll_up(viewport, page);
        }
        KeyAction::ScrollOutputDown => {
            state.output_scroll = state.output_scroll.scroll_down(viewport, page);
        }
        KeyAction::Quit | KeyAction::RunSelected => return false,
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::identifier::parse_lines;
    use crate::model::TestTree;
    use crate::state::{OutputScroll, OutputViewport};

    fn make_state() -> AppState {
        AppState::new(TestTree::build(&parse_lines("a.py::t1\na.py::t2\nb.py::t3")))
    }

    #[test]
    fn selection_actions_move_focus() {
        let mut state = make_state();
        assert!(handle_navigation_action(&mut state, KeyAction::SelectNext));
        assert_eq!(state.selected_index(), 1);
        assert!(handle_navigation_action(&mut state, KeyAction::SelectLast));
        assert_eq!(state.selected_row().label, "t3");
        assert!(handle_navigation_action(&mut state, KeyAction::SelectPrev));
        assert_eq!(state.selected_row().label, "b.py");
        assert!(handle_navigation_action(&mut state, KeyAction::SelectFirst));
        assert_eq!(state.selected_index(), 0);
    }

    #[test]
    fn scroll_actions_page_by_viewport_height() {
        let mut state = make_state();
        state.output_viewport = OutputViewport::new(50, 10);

        handle_navigation_action(&mut state, KeyAction::ScrollOutputUp);
        assert_eq!(state.output_scroll, OutputScroll::Top(30));

        handle_navigation_action(&mut state, KeyAction::ScrollOutputDown);
        assert_eq!(state.output_scroll, OutputScroll::Follow);
    }

    #[test]
    fn run_and_quit_are_not_handled() {
        let mut state = make_state();
        assert!(!handle_navigation_action(&mut state, KeyAction::RunSelected));
        assert!(!handle_navigation_action(&mut state, KeyAction::Quit));
        assert_eq!(state.selected_index(), 0);
    }
}
