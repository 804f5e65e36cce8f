//! Per-row asynchronous load state.
//!
//! Loading collaborators write here; the flattener only reads. Entries are
//! keyed by [`RowId`] so they survive data refreshes together with the row.

use crate::identity::RowId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Load state of a row's children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowRuntimeState {
    /// Children are being fetched
    pub loading: bool,
    /// Fetching failed with this message
    pub error: Option<String>,
    /// Fetch finished and returned nothing
    pub is_empty: bool,
    /// Message shown in the empty state row
    pub empty_message: Option<String>,
}

impl RowRuntimeState {
    /// Returns true if no flag is set.
    pub fn is_idle(&self) -> bool {
        !self.loading && self.error.is_none() && !self.is_empty
    }
}

/// Store of [`RowRuntimeState`] entries.
#[derive(Debug, Clone, Default)]
pub struct RowStateStore {
    states: HashMap<RowId, RowRuntimeState>,
}

impl RowStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the row as loading, clearing a previous error or empty flag.
    pub fn set_loading(&mut self, row_id: RowId) {
        self.states.insert(
            row_id,
            RowRuntimeState {
                loading: true,
                ..RowRuntimeState::default()
            },
        );
    }

    /// Records a load failure for the row.
    pub fn set_error(&mut self, row_id: RowId, message: impl Into<String>) {
        self.states.insert(
            row_id,
            RowRuntimeState {
                error: Some(message.into()),
                ..RowRuntimeState::default()
            },
        );
    }

    /// Records that loading finished with no children.
    pub fn set_empty(&mut self, row_id: RowId, message: Option<String>) {
        self.states.insert(
            row_id,
            RowRuntimeState {
                is_empty: true,
                empty_message: message,
                ..RowRuntimeState::default()
            },
        );
    }

    /// Removes the entry for the row.
    ///
    /// Returns the removed state, if any.
    pub fn clear(&mut self, row_id: &RowId) -> Option<RowRuntimeState> {
        self.states.remove(row_id)
    }

    pub fn get(&self, row_id: &RowId) -> Option<&RowRuntimeState> {
        self.states.get(row_id)
    }

    /// Read-only view handed to the flattener.
    pub fn as_map(&self) -> &HashMap<RowId, RowRuntimeState> {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_replace_previous_state() {
        let id = RowId::from_keys([0usize]);
        let mut store = RowStateStore::new();

        store.set_loading(id.clone());
        assert!(store.get(&id).unwrap().loading);

        store.set_error(id.clone(), "timeout");
        let state = store.get(&id).unwrap();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("timeout"));

        store.set_empty(id.clone(), Some("nothing here".to_string()));
        let state = store.get(&id).unwrap();
        assert!(state.is_empty);
        assert!(state.error.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_clear() {
        let id = RowId::from_keys([3usize, 1]);
        let mut store = RowStateStore::new();
        store.set_loading(id.clone());

        assert!(store.clear(&id).is_some());
        assert!(store.clear(&id).is_none());
        assert!(store.is_empty());
        assert!(store.as_map().is_empty());
    }

    #[test]
    fn test_idle() {
        assert!(RowRuntimeState::default().is_idle());
        let state = RowRuntimeState {
            loading: true,
            ..Default::default()
        };
        assert!(!state.is_idle());
    }
}
