//! Two-stage transitions for sort and filter changes.
//!
//! Stage 1 renders the union of the current and the preview sequence for one
//! frame, so exiting rows are still mounted and entering rows already are.
//! Stage 2 commits the change; the regular flattener output becomes the new
//! steady state.
//!
//! Entries are matched by [`EntryKey`]: the row id plus the entry slot, since
//! synthetic entries share the id of the row that owns them.

use crate::flatten::{RowKind, TableRow};
use crate::identity::RowId;
use std::collections::{HashMap, HashSet};

/// Which entry of a row a key refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntrySlot {
    Row,
    Loading,
    Error,
    Empty,
    NestedGrid,
}

impl From<&RowKind> for EntrySlot {
    fn from(kind: &RowKind) -> Self {
        match kind {
            RowKind::Data => EntrySlot::Row,
            RowKind::Loading => EntrySlot::Loading,
            RowKind::Error { .. } => EntrySlot::Error,
            RowKind::Empty { .. } => EntrySlot::Empty,
            RowKind::NestedGrid => EntrySlot::NestedGrid,
        }
    }
}

/// Identity of one flattened entry across passes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub row_id: RowId,
    pub slot: EntrySlot,
}

impl EntryKey {
    pub fn of<R>(row: &TableRow<R>) -> Self {
        Self {
            row_id: row.row_id.clone(),
            slot: EntrySlot::from(&row.kind),
        }
    }
}

/// Animation role of a staged entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStatus {
    /// In both sequences; `from` is the previous display position
    Persisting { from: usize },
    /// Only in the preview
    Entering,
    /// Only in the current sequence
    Exiting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagedRow<R> {
    pub row: TableRow<R>,
    pub status: TransitionStatus,
}

/// The stage-1 superset.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedTransition<R> {
    /// Preview entries in preview order, then exiting entries in their
    /// previous order
    pub rows: Vec<StagedRow<R>>,
    pub entering: HashSet<EntryKey>,
    pub exiting: HashSet<EntryKey>,
}

impl<R> StagedTransition<R> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when nothing enters or exits (a pure reorder or no change).
    pub fn is_reorder_only(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }
}

/// Diffs the current sequence against the preview.
///
/// # Arguments
/// * `current` - What is rendered now
/// * `preview` - What the flattener produces under the pending change
pub fn stage_transition<R: Clone>(current: &[TableRow<R>], preview: &[TableRow<R>]) -> StagedTransition<R> {
    let current_positions: HashMap<EntryKey, usize> = current
        .iter()
        .map(|row| (EntryKey::of(row), row.display_position))
        .collect();
    let preview_keys: HashSet<EntryKey> = preview.iter().map(EntryKey::of).collect();

    let mut rows = Vec::with_capacity(preview.len());
    let mut entering = HashSet::new();
    let mut exiting = HashSet::new();

    for row in preview {
        let key = EntryKey::of(row);
        let status = match current_positions.get(&key) {
            Some(&from) => TransitionStatus::Persisting { from },
            None => {
                entering.insert(key);
                TransitionStatus::Entering
            }
        };
        rows.push(StagedRow {
            row: row.clone(),
            status,
        });
    }

    for row in current {
        let key = EntryKey::of(row);
        if !preview_keys.contains(&key) {
            exiting.insert(key);
            rows.push(StagedRow {
                row: row.clone(),
                status: TransitionStatus::Exiting,
            });
        }
    }

    tracing::debug!(
        rows = rows.len(),
        entering = entering.len(),
        exiting = exiting.len(),
        "staged transition"
    );

    StagedTransition {
        rows,
        entering,
        exiting,
    }
}

/// Result of [`TransitionStager::request`].
#[derive(Debug, PartialEq)]
pub enum StageOutcome<C> {
    /// Animations are off: apply the change now
    Commit(C),
    /// The superset is staged; render it before committing
    Preview,
}

/// Holds one pending change between stage 1 and stage 2.
pub struct TransitionStager<C, R> {
    animations_enabled: bool,
    pending: Option<Pending<C, R>>,
}

struct Pending<C, R> {
    change: C,
    staged: StagedTransition<R>,
    rendered: bool,
}

impl<C, R: Clone> TransitionStager<C, R> {
    pub fn new(animations_enabled: bool) -> Self {
        Self {
            animations_enabled,
            pending: None,
        }
    }

    pub fn animations_enabled(&self) -> bool {
        self.animations_enabled
    }

    pub fn set_animations_enabled(&mut self, enabled: bool) {
        self.animations_enabled = enabled;
    }

    /// Starts a transition.
    ///
    /// With animations disabled the change is handed straight back. A change
    /// still pending is replaced; call [`flush`](Self::flush) first to keep it.
    pub fn request(&mut self, change: C, current: &[TableRow<R>], preview: &[TableRow<R>]) -> StageOutcome<C> {
        if !self.animations_enabled {
            return StageOutcome::Commit(change);
        }
        if self.pending.is_some() {
            tracing::debug!("replacing a staged change that was never committed");
        }
        self.pending = Some(Pending {
            change,
            staged: stage_transition(current, preview),
            rendered: false,
        });
        StageOutcome::Preview
    }

    /// The superset to render while a change is pending.
    pub fn staged(&self) -> Option<&StagedTransition<R>> {
        self.pending.as_ref().map(|p| &p.staged)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records that the staged superset has been painted.
    pub fn frame_rendered(&mut self) {
        if let Some(pending) = self.pending.as_mut() {
            pending.rendered = true;
        }
    }

    /// Releases the pending change once its superset has been painted.
    pub fn poll_commit(&mut self) -> Option<C> {
        if self.pending.as_ref().is_some_and(|p| p.rendered) {
            return self.pending.take().map(|p| p.change);
        }
        None
    }

    /// Releases the pending change whether or not it was painted.
    pub fn flush(&mut self) -> Option<C> {
        self.pending.take().map(|p| p.change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::RowKey;

    fn entry(key: &str, position: usize, kind: RowKind) -> TableRow<String> {
        TableRow {
            row: key.to_string(),
            kind,
            depth: 0,
            row_id: RowId::from_keys([RowKey::from(key)]),
            row_path: Vec::new(),
            row_index_path: Vec::new(),
            absolute_row_index: None,
            display_position: position,
            grouping_key: None,
            is_last_group_row: false,
            is_expandable: false,
            is_expanded: false,
        }
    }

    fn data(keys: &[&str]) -> Vec<TableRow<String>> {
        keys.iter().enumerate().map(|(i, k)| entry(k, i, RowKind::Data)).collect()
    }

    #[test]
    fn test_pure_reorder() {
        let keys: Vec<String> = (0..50).map(|i| format!("r{i}")).collect();
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        let current = data(&refs);

        let mut reordered = refs.clone();
        reordered[0..10].reverse();
        let preview = data(&reordered);

        let staged = stage_transition(&current, &preview);
        assert_eq!(staged.len(), 50);
        assert!(staged.is_reorder_only());
        assert_eq!(staged.rows[0].row.row, "r9");
        assert_eq!(staged.rows[0].status, TransitionStatus::Persisting { from: 9 });
    }

    #[test]
    fn test_filter_classification() {
        let current = data(&["a", "b", "c"]);
        let preview = data(&["c", "d"]);
        let staged = stage_transition(&current, &preview);

        let order: Vec<(&str, TransitionStatus)> =
            staged.rows.iter().map(|r| (r.row.row.as_str(), r.status)).collect();
        assert_eq!(
            order,
            vec![
                ("c", TransitionStatus::Persisting { from: 2 }),
                ("d", TransitionStatus::Entering),
                ("a", TransitionStatus::Exiting),
                ("b", TransitionStatus::Exiting),
            ]
        );
        assert_eq!(staged.entering.len(), 1);
        assert_eq!(staged.exiting.len(), 2);
        // Exiting rows keep their previous positions
        assert_eq!(staged.rows[3].row.display_position, 1);
    }

    #[test]
    fn test_state_entry_distinct_from_owner() {
        let current = vec![entry("p", 0, RowKind::Data), entry("p", 1, RowKind::Loading)];
        let preview = vec![entry("p", 0, RowKind::Data), entry("p", 1, RowKind::Empty { message: None })];
        let staged = stage_transition(&current, &preview);

        assert_eq!(staged.len(), 3);
        assert!(staged.entering.contains(&EntryKey {
            row_id: RowId::from_keys([RowKey::from("p")]),
            slot: EntrySlot::Empty
        }));
        assert_eq!(staged.exiting.len(), 1);
    }

    #[test]
    fn test_stager_waits_for_render() {
        let current = data(&["a", "b"]);
        let preview = data(&["b", "a"]);
        let mut stager: TransitionStager<&str, String> = TransitionStager::new(true);

        assert_eq!(stager.request("sort", &current, &preview), StageOutcome::Preview);
        assert!(stager.staged().is_some());
        assert_eq!(stager.poll_commit(), None);

        stager.frame_rendered();
        assert_eq!(stager.poll_commit(), Some("sort"));
        assert!(!stager.is_pending());
        assert_eq!(stager.poll_commit(), None);
    }

    #[test]
    fn test_stager_disabled_commits_immediately() {
        let rows = data(&["a"]);
        let mut stager: TransitionStager<u32, String> = TransitionStager::new(false);
        assert_eq!(stager.request(7, &rows, &rows), StageOutcome::Commit(7));
        assert!(stager.staged().is_none());
    }

    #[test]
    fn test_flush_releases_unrendered_change() {
        let rows = data(&["a"]);
        let mut stager: TransitionStager<u32, String> = TransitionStager::new(true);
        stager.request(1, &rows, &rows);
        assert_eq!(stager.flush(), Some(1));
        assert_eq!(stager.flush(), None);
    }
}
