//! Theme and styling state management.
//!
//! This module encapsulates all state related to visual theming,
//! including theme manager and currently selected theme.

use rtable::config::Dimensions;
use rtable::{Theme, ThemeColors, ThemeManager};

/// State related to visual theme and styling.
///
/// Responsibilities:
/// - Managing theme instances
/// - Tracking current theme selection
/// - Exposing the active palette and row dimensions
pub struct ThemeState {
    /// Theme manager instance
    theme_manager: ThemeManager,
}

impl std::fmt::Debug for ThemeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeState")
            .field("current_theme_name", &self.current_theme_name())
            .finish_non_exhaustive()
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new()
    }
}

impl ThemeState {
    /// Creates a new theme state with the default theme.
    pub fn new() -> Self {
        Self {
            theme_manager: ThemeManager::new(),
        }
    }

    /// Creates a new theme state with a specific theme.
    ///
    /// Unknown names (a theme removed since the preference was saved) keep
    /// the default.
    pub fn with_theme(theme_name: &str) -> Self {
        let mut state = Self::new();
        if let Err(err) = state.theme_manager.set_current_theme(theme_name) {
            tracing::warn!("{err:#}");
        }
        state
    }

    // ===== Theme Queries =====

    pub fn theme_manager(&self) -> &ThemeManager {
        &self.theme_manager
    }

    pub fn current_theme(&self) -> &Theme {
        self.theme_manager.current_theme()
    }

    pub fn current_theme_name(&self) -> &str {
        &self.current_theme().name
    }

    pub fn colors(&self) -> &ThemeColors {
        &self.current_theme().colors
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.current_theme().dimensions
    }

    // ===== Theme Mutations =====

    /// Sets the current theme by name.
    ///
    /// # Returns
    /// `true` if the theme changed
    pub fn set_theme(&mut self, theme_name: &str) -> bool {
        if theme_name == self.current_theme_name() {
            return false;
        }
        match self.theme_manager.set_current_theme(theme_name) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!("{err:#}");
                false
            }
        }
    }
}
