//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions that can be mapped to configurable key bindings.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Commands
    /// Exit immediately, leaving any in-flight run alone. Default: Ctrl+c
    Quit,
    /// Run the focused tree node. Default: r
    RunSelected,

    // Tree navigation
    /// Move focus to the next row. Default: j/↓
    SelectNext,
    /// Move focus to the previous row. Default: k/↑
    SelectPrev,
    /// Focus the root row. Default: g/Home
    SelectFirst,
    /// Focus the last row. Default: G/End
    SelectLast,

    // Output pane
    /// Scroll output towards the start. Default: Ctrl+u/Page Up
    ScrollOutputUp,
    /// Scroll output towards the tail. Default: Ctrl+d/Page Down
    ScrollOutputDown,
}

impl KeyAction {
    /// Every action, in help order.
    pub const ALL: [KeyAction; 8] = [
        KeyAction::Quit,
        KeyAction::RunSelected,
        KeyAction::SelectNext,
        KeyAction::SelectPrev,
        KeyAction::SelectFirst,
        KeyAction::SelectLast,
        KeyAction::ScrollOutputUp,
        KeyAction::ScrollOutputDown,
    ];

    /// Name used in the `[keybindings]` config table.
    pub fn config_name(self) -> &'static str {
        match self {
            KeyAction::Quit => "quit",
            KeyAction::RunSelected => "run_selected",
            KeyAction::SelectNext => "select_next",
            KeyAction::SelectPrev => "select_prev",
            KeyAction::SelectFirst => "select_first",
            KeyAction::SelectLast => "select_last",
            KeyAction::ScrollOutputUp => "scroll_output_up",
            KeyAction::ScrollOutputDown => "scroll_output_down",
        }
    }

    /// Inverse of [`KeyAction::config_name`].
    pub fn from_config_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.config_name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_names_round_trip() {
        for action in KeyAction::ALL {
            assert_eq!(
                KeyAction::from_config_name(action.config_name()),
                Some(action)
            );
        }
    }

    #[test]
    fn unknown_config_name_is_none() {
        assert_eq!(KeyAction::from_config_name("refresh"), None);
    }
}
