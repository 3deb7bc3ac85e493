//! Dashboard styling.
//!
//! Tree rows are coloured by node kind, launch errors are red.

use crate::state::RowKind;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Configuration for color output.
///
/// Resolved from the `--no-color` flag and the `NO_COLOR` environment
/// variable by the config layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Colors on when `enabled`.
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Colors are on unless explicitly disabled.
    pub fn from_no_color(no_color: bool) -> Self {
        Self { enabled: !no_color }
    }

    /// Check if colors are enabled.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self::new(true)
    }
}

// ===== DashboardStyles =====

/// Styles for every styled element of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardStyles {
    root_style: Style,
    module_style: Style,
    class_style: Style,
    leaf_style: Style,
    error_style: Style,
    selected_style: Style,
}

impl DashboardStyles {
    /// Create a new DashboardStyles with specified color configuration.
    ///
    /// With colors disabled every style is plain, except that the selected
    /// row stays reversed so focus remains visible.
    pub fn with_color_config(config: ColorConfig) -> Self {
        let selected_style = Style::default().add_modifier(Modifier::REVERSED);
        if config.colors_enabled() {
            Self {
                root_style: Style::default().fg(Color::Yellow),
                module_style: Style::default().fg(Color::Green),
                class_style: Style::default().fg(Color::Blue),
                leaf_style: Style::default().fg(Color::White),
                error_style: Style::default().fg(Color::Red),
                selected_style,
            }
        } else {
            Self {
                root_style: Style::default(),
                module_style: Style::default(),
                class_style: Style::default(),
                leaf_style: Style::default(),
                error_style: Style::default(),
                selected_style,
            }
        }
    }

    /// Style of a tree row of the given kind.
    pub fn row_style(&self, kind: RowKind) -> Style {
        match kind {
            RowKind::Root => self.root_style,
            RowKind::Module => self.module_style,
            RowKind::Class => self.class_style,
            RowKind::Leaf => self.leaf_style,
        }
    }

    /// Style of launch error text.
    pub fn error_style(&self) -> Style {
        self.error_style
    }

    /// Highlight of the selected tree row.
    pub fn selected_style(&self) -> Style {
        self.selected_style
    }
}

impl Default for DashboardStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::default())
    }
}
