//! UI layout state management.
//!
//! Column widths are keyed by column name so they survive datasets whose
//! columns come in a different order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Width of a column nobody has resized yet.
pub const DEFAULT_COLUMN_WIDTH: f32 = 140.0;

/// Narrowest a column can be dragged.
pub const MIN_COLUMN_WIDTH: f32 = 50.0;

/// State related to UI layout and sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutState {
    /// Width of the expand/collapse column (indent and toggle area)
    expand_width: f32,
    /// Widths by column name
    column_widths: HashMap<String, f32>,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutState {
    pub fn new() -> Self {
        Self {
            expand_width: 100.0,
            column_widths: HashMap::new(),
        }
    }

    // ===== Layout Queries =====

    pub fn expand_width(&self) -> f32 {
        self.expand_width
    }

    pub fn column_width(&self, column: &str) -> f32 {
        self.column_widths.get(column).copied().unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// Total width of the expand column plus `columns`.
    pub fn row_width(&self, columns: &[String]) -> f32 {
        self.expand_width + columns.iter().map(|c| self.column_width(c)).sum::<f32>()
    }

    // ===== Layout Mutations =====

    pub fn resize_expand(&mut self, delta: f32) {
        self.expand_width = (self.expand_width + delta).max(MIN_COLUMN_WIDTH);
    }

    pub fn resize_column(&mut self, column: &str, delta: f32) {
        let width = (self.column_width(column) + delta).max(MIN_COLUMN_WIDTH);
        self.column_widths.insert(column.to_string(), width);
    }
}
