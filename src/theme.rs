//! Theme support for the table viewer.
//!
//! A theme is a color palette plus the row dimensions the height function
//! reads, so a denser theme also changes the offset table.
//!
//! # Examples
//!
//! ```
//! use rtable::theme::ThemeManager;
//!
//! let manager = ThemeManager::new();
//! let compact = manager.get_theme("Compact").unwrap();
//! assert!(compact.dimensions.row_height < manager.get_theme("Dark").unwrap().dimensions.row_height);
//! ```

use crate::config::{Dimensions, DEFAULT_ROW_HEIGHT};
use egui::Color32;

/// Color palette covering the table chrome and row states.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Background colors
    pub background: Color32,
    pub panel_background: Color32,
    pub extreme_background: Color32,
    pub header_background: Color32,
    pub stripe: Color32,

    // Foreground colors
    pub text: Color32,
    pub text_dim: Color32,
    pub text_strong: Color32,

    // Interactive colors
    pub selection: Color32,
    pub hover: Color32,
    pub border: Color32,
    /// Line under the last row of a group
    pub group_boundary: Color32,

    // Row state colors
    pub entering: Color32,
    pub exiting: Color32,
    pub loading: Color32,
    pub error: Color32,
    pub empty: Color32,
    pub nested_grid: Color32,
}

/// A complete theme definition.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub description: String,
    pub colors: ThemeColors,
    pub dimensions: Dimensions,
}

/// Built-in themes and the current selection.
pub struct ThemeManager {
    themes: Vec<Theme>,
    current: usize,
}

impl ThemeManager {
    /// Creates a manager with every built-in theme; "Dark" is selected.
    pub fn new() -> Self {
        let themes = vec![light_theme(), dark_theme(), dracula_theme(), compact_theme()];
        let current = themes.iter().position(|t| t.name == "Dark").unwrap_or(0);
        Self { themes, current }
    }

    /// Retrieves a theme by name.
    pub fn get_theme(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.name == name)
    }

    /// Returns all theme names, sorted.
    pub fn list_themes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.themes.iter().map(|t| t.name.as_str()).collect();
        names.sort();
        names
    }

    pub fn current_theme(&self) -> &Theme {
        &self.themes[self.current]
    }

    /// Selects a theme by name.
    pub fn set_current_theme(&mut self, name: &str) -> anyhow::Result<()> {
        match self.themes.iter().position(|t| t.name == name) {
            Some(index) => {
                self.current = index;
                Ok(())
            }
            None => anyhow::bail!("Theme '{}' not found", name),
        }
    }

    /// Applies a theme's colors to egui visuals.
    pub fn apply_theme(&self, theme: &Theme, visuals: &mut egui::Visuals) {
        let colors = &theme.colors;

        visuals.panel_fill = colors.panel_background;
        visuals.extreme_bg_color = colors.extreme_background;
        visuals.faint_bg_color = colors.stripe;

        visuals.override_text_color = Some(colors.text);

        visuals.selection.bg_fill = colors.selection;
        visuals.selection.stroke.color = colors.text_strong;

        visuals.widgets.noninteractive.bg_fill = colors.panel_background;
        visuals.widgets.inactive.bg_fill = colors.hover;
        visuals.widgets.hovered.bg_fill = colors.hover;
        visuals.widgets.active.bg_fill = colors.selection;

        visuals.error_fg_color = colors.error;
        visuals.warn_fg_color = colors.loading;
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new()
    }
}

fn standard_dimensions() -> Dimensions {
    Dimensions {
        row_height: DEFAULT_ROW_HEIGHT,
        nested_grid_height: Some(DEFAULT_ROW_HEIGHT * 6.0),
        state_row_height: Some(DEFAULT_ROW_HEIGHT),
    }
}

fn light_theme() -> Theme {
    Theme {
        name: "Light".to_string(),
        description: "Light theme with egui default colors".to_string(),
        colors: ThemeColors {
            background: Color32::from_rgb(248, 248, 248),
            panel_background: Color32::from_rgb(248, 248, 248),
            extreme_background: Color32::from_rgb(255, 255, 255),
            header_background: Color32::from_rgb(232, 232, 232),
            stripe: Color32::from_rgb(240, 240, 240),

            text: Color32::from_rgb(0, 0, 0),
            text_dim: Color32::from_rgb(120, 120, 120),
            text_strong: Color32::from_rgb(0, 0, 0),

            selection: Color32::from_rgb(180, 200, 255),
            hover: Color32::from_rgb(220, 220, 220),
            border: Color32::from_rgb(160, 160, 160),
            group_boundary: Color32::from_rgb(40, 100, 200),

            entering: Color32::from_rgb(40, 160, 40),
            exiting: Color32::from_rgb(200, 40, 40),
            loading: Color32::from_rgb(230, 120, 20),
            error: Color32::from_rgb(200, 40, 40),
            empty: Color32::from_rgb(120, 120, 120),
            nested_grid: Color32::from_rgb(225, 235, 250),
        },
        dimensions: standard_dimensions(),
    }
}

fn dark_theme() -> Theme {
    Theme {
        name: "Dark".to_string(),
        description: "Dark theme with egui default colors".to_string(),
        colors: ThemeColors {
            background: Color32::from_rgb(39, 39, 39),
            panel_background: Color32::from_rgb(39, 39, 39),
            extreme_background: Color32::from_rgb(16, 16, 16),
            header_background: Color32::from_rgb(52, 52, 52),
            stripe: Color32::from_rgb(45, 45, 45),

            text: Color32::from_rgb(255, 255, 255),
            text_dim: Color32::from_rgb(160, 160, 160),
            text_strong: Color32::from_rgb(255, 255, 255),

            selection: Color32::from_rgb(50, 80, 120),
            hover: Color32::from_rgb(70, 70, 70),
            border: Color32::from_rgb(100, 100, 100),
            group_boundary: Color32::from_rgb(52, 152, 219),

            entering: Color32::from_rgb(46, 204, 113),
            exiting: Color32::from_rgb(231, 76, 60),
            loading: Color32::from_rgb(243, 156, 18),
            error: Color32::from_rgb(231, 76, 60),
            empty: Color32::from_rgb(149, 165, 166),
            nested_grid: Color32::from_rgb(30, 42, 56),
        },
        dimensions: standard_dimensions(),
    }
}

/// Official colors from: https://draculatheme.com/spec
fn dracula_theme() -> Theme {
    Theme {
        name: "Dracula".to_string(),
        description: "Dracula color palette".to_string(),
        colors: ThemeColors {
            background: hex_to_color32("#282a36"),
            panel_background: hex_to_color32("#282a36"),
            extreme_background: hex_to_color32("#21222c"),
            header_background: hex_to_color32("#343746"),
            stripe: hex_to_color32("#2d2f3d"),

            text: hex_to_color32("#f8f8f2"),
            text_dim: hex_to_color32("#6272a4"),
            text_strong: hex_to_color32("#f8f8f2"),

            selection: hex_to_color32("#44475a"),
            hover: hex_to_color32("#44475a"),
            border: hex_to_color32("#6272a4"),
            group_boundary: hex_to_color32("#bd93f9"),

            entering: hex_to_color32("#50fa7b"),
            exiting: hex_to_color32("#ff5555"),
            loading: hex_to_color32("#ffb86c"),
            error: hex_to_color32("#ff5555"),
            empty: hex_to_color32("#6272a4"),
            nested_grid: hex_to_color32("#313445"),
        },
        dimensions: standard_dimensions(),
    }
}

/// Dark palette with tighter rows.
fn compact_theme() -> Theme {
    let mut theme = dark_theme();
    theme.name = "Compact".to_string();
    theme.description = "Dark palette with dense rows".to_string();
    theme.dimensions = Dimensions {
        row_height: 18.0,
        nested_grid_height: Some(18.0 * 6.0),
        state_row_height: Some(18.0),
    };
    theme
}

/// Converts a hex color string (like "#282a36") to Color32
pub fn hex_to_color32(hex: &str) -> Color32 {
    let hex = hex.trim_start_matches('#');

    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
        Color32::from_rgb(r, g, b)
    } else {
        Color32::from_rgb(0, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_themes() {
        let manager = ThemeManager::new();
        assert_eq!(manager.list_themes(), vec!["Compact", "Dark", "Dracula", "Light"]);
        assert_eq!(manager.current_theme().name, "Dark");
    }

    #[test]
    fn test_set_current_theme() {
        let mut manager = ThemeManager::new();
        manager.set_current_theme("Compact").unwrap();
        assert_eq!(manager.current_theme().dimensions.row_height, 18.0);
        assert!(manager.set_current_theme("Solarized").is_err());
        assert_eq!(manager.current_theme().name, "Compact");
    }

    #[test]
    fn test_hex_to_color32() {
        assert_eq!(hex_to_color32("#ff0080"), Color32::from_rgb(255, 0, 128));
        assert_eq!(hex_to_color32("bad"), Color32::from_rgb(0, 0, 0));
    }
}
