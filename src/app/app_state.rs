//! Centralized application state for the table viewer.
//!
//! The state is composed of focused components, each keeping its own
//! invariants, so panels can borrow disjoint parts at the same time.

use crate::domain::view_order::ViewSpec;
use crate::state::{LayoutState, SelectionState, TableState, ThemeState, ViewportState};
use rtable::ValidatedConfig;

/// Main application state composed of focused state components.
pub struct AppState {
    // ===== Focused State Components =====
    /// Dataset, flattened rows, page and pending transition
    pub table: TableState,

    /// Scroll position and render window
    pub viewport: ViewportState,

    /// Selected row
    pub selection: SelectionState,

    /// Theme and styling state
    pub theme: ThemeState,

    /// Column widths
    pub layout: LayoutState,

    // ===== Top-Level State =====
    /// Sort and filter as the controls show them; may run ahead of the
    /// table's committed view while a transition is pending
    pub requested_view: ViewSpec,

    /// Current error message to display (if any)
    pub error_message: Option<String>,

    /// Time of the current frame in seconds
    pub now: f64,
}

impl AppState {
    /// Creates the state with settings restored from storage.
    ///
    /// # Arguments
    /// * `config` - Validated table configuration
    /// * `theme_name` - Persisted theme name
    /// * `layout` - Persisted column layout
    pub fn new(config: ValidatedConfig, theme_name: &str, layout: LayoutState) -> Self {
        let theme = ThemeState::with_theme(theme_name);
        let table = TableState::new(config, theme.dimensions());
        Self {
            table,
            viewport: ViewportState::new(),
            selection: SelectionState::new(),
            theme,
            layout,
            requested_view: ViewSpec::default(),
            error_message: None,
            now: 0.0,
        }
    }

    // ===== High-Level Coordination Methods =====

    /// Resets table-related state before a new dataset arrives.
    pub fn reset_table_state(&mut self) {
        self.table.clear();
        self.viewport.reset();
        self.selection.clear();
        self.requested_view = ViewSpec::default();
        self.error_message = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtable::TableConfig;

    #[test]
    fn test_reset_clears_error_and_selection() {
        let config = TableConfig::default().validate().unwrap();
        let mut state = AppState::new(config, "Light", LayoutState::new());
        state.error_message = Some("boom".to_string());
        state.selection.select(rtable::RowId::from_keys([0usize]));

        state.reset_table_state();
        assert!(state.error_message.is_none());
        assert!(state.selection.selected().is_none());
        assert_eq!(state.theme.current_theme_name(), "Light");
        assert_eq!(state.viewport.take_scroll_request(), Some(0.0));
    }
}
