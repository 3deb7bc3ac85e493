//! Keyboard bindings configuration.

use crate::model::key_action::KeyAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use thiserror::Error;

/// Errors in a `[keybindings]` config table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyBindingError {
    /// Table key does not name a known action.
    #[error("Unknown key binding action: {0}")]
    UnknownAction(String),

    /// Key string could not be parsed.
    #[error("Invalid key {key:?} for action {action}")]
    InvalidKey {
        /// Action the key was bound to.
        action: String,
        /// The offending key string.
        key: String,
    },
}

/// Maps keyboard events to domain actions.
///
/// Provides vim-style defaults, with per-action overrides from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindings {
    bindings: HashMap<KeyEvent, KeyAction>,
}

impl KeyBindings {
    /// Look up the action for a key event.
    ///
    /// Event kind and state are ignored, and Shift is implied by the case of
    /// a character key.
    pub fn get(&self, key: KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&normalize(key.code, key.modifiers)).copied()
    }

    /// Bind `code`+`modifiers` to `action`, replacing any previous binding
    /// of that key.
    pub fn bind(&mut self, code: KeyCode, modifiers: KeyModifiers, action: KeyAction) {
        self.bindings.insert(normalize(code, modifiers), action);
    }

    /// Keys currently bound to `action`.
    pub fn keys_for(&self, action: KeyAction) -> Vec<KeyEvent> {
        self.bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| *k)
            .collect()
    }

    /// Replace the keys of each named action with the given key strings.
    ///
    /// Actions not mentioned keep their defaults.
    ///
    /// # Errors
    ///
    /// Fails on an unknown action name or an unparseable key string.
    pub fn with_overrides(
        mut self,
        overrides: &HashMap<String, Vec<String>>,
    ) -> Result<Self, KeyBindingError> {
        for (name, keys) in overrides {
            let action = KeyAction::from_config_name(name)
                .ok_or_else(|| KeyBindingError::UnknownAction(name.clone()))?;

            let parsed = keys
                .iter()
                .map(|key| {
                    parse_key(key).ok_or_else(|| KeyBindingError::InvalidKey {
                        action: name.clone(),
                        key: key.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            self.bindings.retain(|_, a| *a != action);
            for (code, modifiers) in parsed {
                self.bind(code, modifiers, action);
            }
        }
        Ok(self)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut bindings = Self {
            bindings: HashMap::new(),
        };
        let none = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;

        // Commands
        bindings.bind(KeyCode::Char('c'), ctrl, KeyAction::Quit);
        bindings.bind(KeyCode::Char('r'), none, KeyAction::RunSelected);

        // Vim-style tree navigation
        bindings.bind(KeyCode::Char('j'), none, KeyAction::SelectNext);
        bindings.bind(KeyCode::Char('k'), none, KeyAction::SelectPrev);
        bindings.bind(KeyCode::Char('g'), none, KeyAction::SelectFirst);
        bindings.bind(KeyCode::Char('G'), KeyModifiers::SHIFT, KeyAction::SelectLast);

        // Arrow key navigation
        bindings.bind(KeyCode::Down, none, KeyAction::SelectNext);
        bindings.bind(KeyCode::Up, none, KeyAction::SelectPrev);
        bindings.bind(KeyCode::Home, none, KeyAction::SelectFirst);
        bindings.bind(KeyCode::End, none, KeyAction::SelectLast);

        // Output scrolling
        bindings.bind(KeyCode::Char('u'), ctrl, KeyAction::ScrollOutputUp);
        bindings.bind(KeyCode::Char('d'), ctrl, KeyAction::ScrollOutputDown);
        bindings.bind(KeyCode::PageUp, none, KeyAction::ScrollOutputUp);
        bindings.bind(KeyCode::PageDown, none, KeyAction::ScrollOutputDown);

        bindings
    }
}

fn normalize(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    let modifiers = match code {
        KeyCode::Char(_) => modifiers - KeyModifiers::SHIFT,
        _ => modifiers,
    };
    KeyEvent::new(code, modifiers)
}

/// Parse a key string such as `r`, `G`, `ctrl+c`, `pgdn` or `shift+tab`.
pub fn parse_key(spec: &str) -> Option<(KeyCode, KeyModifiers)> {
    let mut parts: Vec<&str> = spec.split('+').collect();
    // "ctrl++" binds the plus key
    if spec.ends_with("++") {
        parts.truncate(parts.len() - 2);
        parts.push("+");
    }
    let key = parts.pop()?;

    let mut modifiers = KeyModifiers::NONE;
    for modifier in parts {
        modifiers |= match modifier.to_ascii_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "alt" => KeyModifiers::ALT,
            "shift" => KeyModifiers::SHIFT,
            _ => return None,
        };
    }

    let mut chars = key.chars();
    let code = match (chars.next(), chars.next()) {
        (Some(c), None) => KeyCode::Char(c),
        _ => match key.to_ascii_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pgup" | "pageup" => KeyCode::PageUp,
            "pgdn" | "pagedown" => KeyCode::PageDown,
            "enter" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "esc" => KeyCode::Esc,
            "space" => KeyCode::Char(' '),
            "backspace" => KeyCode::Backspace,
            other => {
                let n: u8 = other.strip_prefix('f')?.parse().ok()?;
                if !(1..=12).contains(&n) {
                    return None;
                }
                KeyCode::F(n)
            }
        },
    };
    Some((code, modifiers))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn default_bindings_map_ctrl_c_to_quit() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.get(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
        assert_eq!(bindings.get(key(KeyCode::Char('c'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn default_bindings_map_r_to_run_selected() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.get(key(KeyCode::Char('r'), KeyModifiers::NONE)),
            Some(KeyAction::RunSelected)
        );
    }

    #[test]
    fn uppercase_g_matches_with_or_without_shift_flag() {
        let bindings = KeyBindings::default();
        assert_eq!(
            bindings.get(key(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Some(KeyAction::SelectLast)
        );
        assert_eq!(
            bindings.get(key(KeyCode::Char('G'), KeyModifiers::NONE)),
            Some(KeyAction::SelectLast)
        );
    }

    #[test]
    fn unbound_key_is_none() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.get(key(KeyCode::Char('x'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn override_replaces_default_keys_of_action() {
        let overrides = HashMap::from([(
            "run_selected".to_string(),
            vec!["enter".to_string(), "ctrl+r".to_string()],
        )]);
        let bindings = KeyBindings::default().with_overrides(&overrides).unwrap();

        assert_eq!(bindings.get(key(KeyCode::Char('r'), KeyModifiers::NONE)), None);
        assert_eq!(
            bindings.get(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(KeyAction::RunSelected)
        );
        assert_eq!(
            bindings.get(key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(KeyAction::RunSelected)
        );
        assert_eq!(
            bindings.get(key(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(KeyAction::SelectNext),
            "Other actions keep their defaults"
        );
    }

    #[test]
    fn override_rejects_unknown_action() {
        let overrides = HashMap::from([("explode".to_string(), vec!["x".to_string()])]);
        assert_eq!(
            KeyBindings::default().with_overrides(&overrides),
            Err(KeyBindingError::UnknownAction("explode".to_string()))
        );
    }

    #[test]
    fn override_rejects_invalid_key() {
        let overrides = HashMap::from([("quit".to_string(), vec!["hyper+q".to_string()])]);
        assert!(matches!(
            KeyBindings::default().with_overrides(&overrides),
            Err(KeyBindingError::InvalidKey { .. })
        ));
    }

    #[test]
    fn keys_for_lists_every_binding() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.keys_for(KeyAction::SelectNext).len(), 2);
    }

    #[test]
    fn parse_key_handles_names_and_modifiers() {
        assert_eq!(parse_key("r"), Some((KeyCode::Char('r'), KeyModifiers::NONE)));
        assert_eq!(
            parse_key("ctrl+c"),
            Some((KeyCode::Char('c'), KeyModifiers::CONTROL))
        );
        assert_eq!(
            parse_key("Ctrl+Alt+Del"),
            None,
            "Unknown key names are rejected"
        );
        assert_eq!(parse_key("pgdn"), Some((KeyCode::PageDown, KeyModifiers::NONE)));
        assert_eq!(parse_key("f5"), Some((KeyCode::F(5), KeyModifiers::NONE)));
        assert_eq!(parse_key("f13"), None);
        assert_eq!(parse_key("space"), Some((KeyCode::Char(' '), KeyModifiers::NONE)));
        assert_eq!(
            parse_key("ctrl++"),
            Some((KeyCode::Char('+'), KeyModifiers::CONTROL))
        );
        assert_eq!(parse_key(""), None);
    }
}
