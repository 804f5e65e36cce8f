//! Row selection state.
//!
//! Selection is held by row id, so it survives sorting, filtering and
//! expansion changes that move the row to another display position.

use rtable::{FlattenedRows, RowId};

/// State related to the selected row.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: Option<RowId>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self { selected: None }
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    // ===== Selection Queries =====

    pub fn selected(&self) -> Option<&RowId> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, row_id: &RowId) -> bool {
        self.selected.as_ref() == Some(row_id)
    }

    /// Display position of the selection in `rows`, if it is still shown.
    pub fn position_in<R>(&self, rows: &FlattenedRows<R>) -> Option<usize> {
        rows.position_of(self.selected.as_ref()?)
    }

    // ===== Selection Mutations =====

    pub fn select(&mut self, row_id: RowId) {
        self.selected = Some(row_id);
    }

    /// Moves the selection `delta` data rows within `range` of `rows`.
    ///
    /// Starts at the first data row of the range when nothing is selected or
    /// the selection is outside the range. Returns the new display position.
    pub fn step<R>(&mut self, rows: &FlattenedRows<R>, range: std::ops::Range<usize>, delta: isize) -> Option<usize> {
        let data_positions: Vec<usize> = range
            .filter(|&i| rows.get(i).is_some_and(|row| row.kind.is_data()))
            .collect();
        if data_positions.is_empty() {
            return None;
        }

        let current = self
            .position_in(rows)
            .and_then(|position| data_positions.iter().position(|&p| p == position));
        let next = match current {
            Some(i) => i.saturating_add_signed(delta).min(data_positions.len() - 1),
            None => 0,
        };
        let position = data_positions[next];
        self.selected = rows.get(position).map(|row| row.row_id.clone());
        Some(position)
    }

    /// Moves a selection hidden by collapsing `collapsed` onto that row.
    ///
    /// Returns `true` if the selection moved.
    pub fn retreat_to(&mut self, collapsed: &RowId) -> bool {
        match &self.selected {
            Some(selected) if collapsed.is_ancestor_of(selected) => {
                self.selected = Some(collapsed.clone());
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtable::{flatten_rows, ExpansionState, FlattenOptions};
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_step_skips_state_rows() {
        let data = vec![json!({"n": 0}), json!({"n": 1}), json!({"n": 2})];
        let grouping: Vec<String> = Vec::new();
        let rows = flatten_rows(data.iter(), &ExpansionState::new(), &HashMap::new(), &FlattenOptions::new(&grouping));

        let mut selection = SelectionState::new();
        assert_eq!(selection.step(&rows, 0..3, 1), Some(0));
        assert_eq!(selection.step(&rows, 0..3, 1), Some(1));
        assert_eq!(selection.step(&rows, 0..3, 5), Some(2));
        assert_eq!(selection.step(&rows, 0..3, -9), Some(0));
        assert!(selection.is_selected(&RowId::from_keys([0usize])));
    }

    #[test]
    fn test_retreat_to_collapsed_ancestor() {
        let mut selection = SelectionState::new();
        selection.select(RowId::from_keys([1usize, 2]));

        assert!(!selection.retreat_to(&RowId::from_keys([0usize])));
        assert!(selection.is_selected(&RowId::from_keys([1usize, 2])));

        assert!(selection.retreat_to(&RowId::from_keys([1usize])));
        assert!(selection.is_selected(&RowId::from_keys([1usize])));
        // A row is not its own ancestor
        assert!(!selection.retreat_to(&RowId::from_keys([1usize])));
    }
}
