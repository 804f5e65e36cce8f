//! Expand/collapse state for grouped rows.
//!
//! Expansion is resolved in two layers:
//! - a set of globally expanded depths, applying to every row at that depth
//! - per-row overrides (force-expanded or force-collapsed) keyed by [`RowId`]
//!
//! An override always wins over the depth default. The two override maps are
//! kept disjoint: setting one removes the row from the other. Each override
//! stores an insertion marker so the animation layer can order rows by when
//! they were toggled; the marker never affects precedence.

use crate::identity::RowId;
use std::collections::{BTreeSet, HashMap};

/// Expansion state owned by the user-interaction layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    /// Depths expanded by default
    expanded_depths: BTreeSet<usize>,
    /// Rows forced open, with their insertion marker
    expanded_rows: HashMap<RowId, u64>,
    /// Rows forced closed, with their insertion marker
    collapsed_rows: HashMap<RowId, u64>,
    /// Next insertion marker
    next_marker: u64,
}

impl ExpansionState {
    /// Creates a state with everything collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state with the given depths expanded by default.
    pub fn with_expanded_depths<I: IntoIterator<Item = usize>>(depths: I) -> Self {
        Self {
            expanded_depths: depths.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Creates the initial state for a grouping spec with `levels` levels.
    ///
    /// # Arguments
    /// * `levels` - Number of grouping levels (length of the grouping spec)
    /// * `expand_all` - Expand every level by default
    /// * `initial_depths` - Extra depths to expand when `expand_all` is off
    pub fn initial(levels: usize, expand_all: bool, initial_depths: &[usize]) -> Self {
        if expand_all {
            Self::with_expanded_depths(0..levels)
        } else {
            Self::with_expanded_depths(initial_depths.iter().copied().filter(|&d| d < levels))
        }
    }

    // ===== Expansion Queries =====

    /// Resolves whether the row `row_id` at `depth` is expanded.
    pub fn is_expanded(&self, row_id: &RowId, depth: usize) -> bool {
        if self.collapsed_rows.contains_key(row_id) {
            return false;
        }
        if self.expanded_rows.contains_key(row_id) {
            return true;
        }
        self.expanded_depths.contains(&depth)
    }

    /// Returns true if `depth` is expanded by default.
    pub fn is_depth_expanded(&self, depth: usize) -> bool {
        self.expanded_depths.contains(&depth)
    }

    /// Returns the depths expanded by default.
    pub fn expanded_depths(&self) -> impl Iterator<Item = usize> + '_ {
        self.expanded_depths.iter().copied()
    }

    /// Returns the insertion marker of the row's override, if it has one.
    pub fn override_order(&self, row_id: &RowId) -> Option<u64> {
        self.expanded_rows
            .get(row_id)
            .or_else(|| self.collapsed_rows.get(row_id))
            .copied()
    }

    /// Returns the number of per-row overrides.
    pub fn override_count(&self) -> usize {
        self.expanded_rows.len() + self.collapsed_rows.len()
    }

    // ===== Expansion Mutations =====

    /// Toggles the row and returns its new expansion state.
    pub fn toggle(&mut self, row_id: &RowId, depth: usize) -> bool {
        let expanded = !self.is_expanded(row_id, depth);
        if expanded {
            self.expand(row_id.clone());
        } else {
            self.collapse(row_id.clone());
        }
        expanded
    }

    /// Forces the row open.
    pub fn expand(&mut self, row_id: RowId) {
        self.collapsed_rows.remove(&row_id);
        let marker = self.take_marker();
        self.expanded_rows.insert(row_id, marker);
    }

    /// Forces the row closed.
    pub fn collapse(&mut self, row_id: RowId) {
        self.expanded_rows.remove(&row_id);
        let marker = self.take_marker();
        self.collapsed_rows.insert(row_id, marker);
    }

    /// Sets the default for a whole depth and clears overrides at that depth.
    pub fn set_depth_expanded(&mut self, depth: usize, expanded: bool) {
        if expanded {
            self.expanded_depths.insert(depth);
        } else {
            self.expanded_depths.remove(&depth);
        }
        self.expanded_rows.retain(|id, _| id.depth() != depth);
        self.collapsed_rows.retain(|id, _| id.depth() != depth);
    }

    /// Expands every depth in `0..levels` and drops all overrides.
    pub fn expand_all(&mut self, levels: usize) {
        self.expanded_depths = (0..levels).collect();
        self.expanded_rows.clear();
        self.collapsed_rows.clear();
    }

    /// Collapses everything and drops all overrides.
    pub fn collapse_all(&mut self) {
        self.expanded_depths.clear();
        self.expanded_rows.clear();
        self.collapsed_rows.clear();
    }

    fn take_marker(&mut self) -> u64 {
        let marker = self.next_marker;
        self.next_marker += 1;
        marker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(keys: &[usize]) -> RowId {
        RowId::from_keys(keys.iter().copied())
    }

    #[test]
    fn test_depth_default() {
        let state = ExpansionState::with_expanded_depths([0]);
        assert!(state.is_expanded(&id(&[3]), 0));
        assert!(!state.is_expanded(&id(&[3, 1]), 1));
    }

    #[test]
    fn test_override_wins_over_depth() {
        let mut state = ExpansionState::with_expanded_depths([0]);
        state.collapse(id(&[1]));
        assert!(!state.is_expanded(&id(&[1]), 0));
        assert!(state.is_expanded(&id(&[2]), 0));

        state.expand(id(&[1, 4]));
        assert!(state.is_expanded(&id(&[1, 4]), 1));
    }

    #[test]
    fn test_overrides_stay_disjoint() {
        let mut state = ExpansionState::new();
        state.expand(id(&[0]));
        state.collapse(id(&[0]));
        assert_eq!(state.override_count(), 1);
        assert!(!state.is_expanded(&id(&[0]), 0));
    }

    #[test]
    fn test_toggle_returns_new_state() {
        let mut state = ExpansionState::new();
        assert!(state.toggle(&id(&[0]), 0));
        assert!(state.is_expanded(&id(&[0]), 0));
        assert!(!state.toggle(&id(&[0]), 0));
        assert!(!state.is_expanded(&id(&[0]), 0));
    }

    #[test]
    fn test_insertion_markers_increase() {
        let mut state = ExpansionState::new();
        state.expand(id(&[0]));
        state.collapse(id(&[1]));
        let first = state.override_order(&id(&[0])).unwrap();
        let second = state.override_order(&id(&[1])).unwrap();
        assert!(first < second);
        assert_eq!(state.override_order(&id(&[2])), None);
    }

    #[test]
    fn test_set_depth_clears_overrides_at_depth() {
        let mut state = ExpansionState::new();
        state.collapse(id(&[0, 1]));
        state.expand(id(&[0]));
        state.set_depth_expanded(1, true);

        assert!(state.is_expanded(&id(&[0, 1]), 1));
        assert_eq!(state.override_order(&id(&[0])).is_some(), true);
        assert_eq!(state.override_count(), 1);
    }

    #[test]
    fn test_initial_expand_all() {
        let state = ExpansionState::initial(2, true, &[]);
        assert!(state.is_depth_expanded(0));
        assert!(state.is_depth_expanded(1));
        assert!(!state.is_depth_expanded(2));

        let partial = ExpansionState::initial(2, false, &[1, 5]);
        assert_eq!(partial.expanded_depths().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_collapse_all() {
        let mut state = ExpansionState::initial(3, true, &[]);
        state.expand(id(&[0, 0, 0]));
        state.collapse_all();
        assert_eq!(state.override_count(), 0);
        assert!(!state.is_expanded(&id(&[0]), 0));
    }
}
