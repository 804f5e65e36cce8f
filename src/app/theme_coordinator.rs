//! Theme management and persistence coordination.

use crate::app::AppState;

const THEME_KEY: &str = "theme_preference";

/// Coordinates theme selection, application and persistence.
pub struct ThemeCoordinator;

impl ThemeCoordinator {
    /// Returns the stored theme name, or "Dark".
    pub fn load_theme_from_storage(storage: Option<&dyn eframe::Storage>) -> String {
        storage
            .and_then(|storage| storage.get_string(THEME_KEY))
            .unwrap_or_else(|| "Dark".to_string())
    }

    pub fn save_theme_to_storage(storage: &mut dyn eframe::Storage, theme_name: &str) {
        storage.set_string(THEME_KEY, theme_name.to_string());
    }

    /// Switches theme; row heights follow the theme's dimensions.
    pub fn change_theme(state: &mut AppState, theme_name: &str) {
        if !state.theme.set_theme(theme_name) {
            return;
        }
        if state.table.set_theme_dimensions(state.theme.dimensions()) {
            state.viewport.invalidate();
        }
        tracing::debug!(theme = theme_name, "theme changed");
    }

    /// Applies the current theme to the egui context.
    ///
    /// Called every frame to ensure theme is correctly applied.
    pub fn apply_current_theme(ctx: &egui::Context, state: &AppState) {
        let theme = state.theme.current_theme();
        let mut visuals = if theme.name == "Light" {
            egui::Visuals::light()
        } else {
            egui::Visuals::dark()
        };
        state.theme.theme_manager().apply_theme(theme, &mut visuals);
        ctx.set_visuals(visuals);
    }
}
