//! Tree flattening.
//!
//! Walks a grouped row tree into the ordered sequence of entries the table
//! renders, top to bottom. The walk is an explicit-stack pre-order traversal:
//! frames are pushed in reverse sibling order so they pop in display order,
//! and every expanded parent pushes a close-group marker underneath its
//! children so the last entry of the group can be flagged once the subtree is
//! done.
//!
//! Collapsed subtrees are skipped entirely. A parent whose children are
//! loading, failed or came back empty gets one synthetic state entry instead
//! of its children, provided the host registered a renderer for that state.

use crate::config::StateRenderers;
use crate::expansion::ExpansionState;
use crate::identity::{resolve_row_id, PathSegment, RowId, RowIdContext, RowIdFn};
use crate::row_state::RowRuntimeState;
use crate::traits::RowData;
use std::collections::HashMap;

/// Provider for custom sibling ordering.
///
/// Sorting and filtering plug in here: the provider may reorder siblings and
/// may leave indices out. Row ids and index paths keep using the original
/// positions, so identity is unaffected by either.
pub trait SiblingOrder<R> {
    /// Returns the visit order for `siblings`, or `None` for natural order.
    ///
    /// # Arguments
    /// * `siblings` - All rows of one sibling collection, in data order
    /// * `depth` - Depth of the siblings (0 for root rows)
    ///
    /// # Returns
    /// Indices into `siblings`; out-of-range indices are ignored
    fn sibling_indices(&self, siblings: &[R], depth: usize) -> Option<Vec<usize>>;
}

/// What a flattened entry represents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// An application row
    Data,
    /// Children of the preceding row are loading
    Loading,
    /// Loading the children of the preceding row failed
    Error { message: String },
    /// The preceding row has no children
    Empty { message: Option<String> },
    /// The children of the preceding row, shown as one nested grid
    NestedGrid,
}

impl RowKind {
    pub fn is_data(&self) -> bool {
        matches!(self, RowKind::Data)
    }

    /// Loading, error and empty entries.
    pub fn is_state(&self) -> bool {
        matches!(self, RowKind::Loading | RowKind::Error { .. } | RowKind::Empty { .. })
    }
}

/// One entry of the flattened sequence.
///
/// Synthetic entries (state rows, nested grids) carry the row and id of the
/// parent that owns them and sit directly after it.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow<R> {
    pub row: R,
    pub kind: RowKind,
    /// Nesting depth (0 for root rows)
    pub depth: usize,
    pub row_id: RowId,
    /// Navigation path into the original tree: `[0, "stores", 2]`
    pub row_path: Vec<PathSegment>,
    /// Original index per level: `[0, 2]`
    pub row_index_path: Vec<usize>,
    /// Position among data rows of the unsorted, unfiltered walk under the
    /// same expansion; `None` for synthetic entries
    pub absolute_row_index: Option<usize>,
    /// Index in the flattened sequence
    pub display_position: usize,
    /// Child collection this row exposes at its level
    pub grouping_key: Option<String>,
    /// Last entry produced by its parent's group
    pub is_last_group_row: bool,
    pub is_expandable: bool,
    pub is_expanded: bool,
}

impl<R> TableRow<R> {
    /// Replaces the row handle, keeping every computed field.
    pub fn map_row<U>(self, f: impl FnOnce(R) -> U) -> TableRow<U> {
        TableRow {
            row: f(self.row),
            kind: self.kind,
            depth: self.depth,
            row_id: self.row_id,
            row_path: self.row_path,
            row_index_path: self.row_index_path,
            absolute_row_index: self.absolute_row_index,
            display_position: self.display_position,
            grouping_key: self.grouping_key,
            is_last_group_row: self.is_last_group_row,
            is_expandable: self.is_expandable,
            is_expanded: self.is_expanded,
        }
    }
}

/// Inputs of a flattening pass besides the rows and the mutable state.
pub struct FlattenOptions<'o, R> {
    /// Child-collection name per nesting level
    pub grouping: &'o [String],
    /// Level whose expanded rows show a nested grid instead of child rows
    pub nested_grid_level: Option<usize>,
    pub state_renderers: StateRenderers,
    /// Application id function; positional ids when `None`
    pub id_fn: Option<&'o RowIdFn<'o, R>>,
    /// Sort/filter order; natural order when `None`
    pub order: Option<&'o dyn SiblingOrder<R>>,
}

impl<'o, R> FlattenOptions<'o, R> {
    pub fn new(grouping: &'o [String]) -> Self {
        Self {
            grouping,
            nested_grid_level: None,
            state_renderers: StateRenderers::default(),
            id_fn: None,
            order: None,
        }
    }
}

/// Output of [`flatten_rows`].
#[derive(Debug, Clone)]
pub struct FlattenedRows<R> {
    rows: Vec<TableRow<R>>,
    position_of: HashMap<RowId, usize>,
    data_row_count: usize,
}

impl<R> Default for FlattenedRows<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            position_of: HashMap::new(),
            data_row_count: 0,
        }
    }
}

impl<R> FlattenedRows<R> {
    pub fn rows(&self) -> &[TableRow<R>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<TableRow<R>> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TableRow<R>> {
        self.rows.get(index)
    }

    /// Display position of the data row with this id.
    ///
    /// When ids collide the last row seen wins.
    pub fn position_of(&self, row_id: &RowId) -> Option<usize> {
        self.position_of.get(row_id).copied()
    }

    /// Number of data entries (synthetic entries excluded).
    pub fn data_row_count(&self) -> usize {
        self.data_row_count
    }

    /// Detaches the sequence from borrowed row handles.
    ///
    /// Hosts that own their data keep `row_path` to get back to it.
    pub fn map_rows<U>(self, mut f: impl FnMut(R) -> U) -> FlattenedRows<U> {
        FlattenedRows {
            rows: self.rows.into_iter().map(|row| row.map_row(&mut f)).collect(),
            position_of: self.position_of,
            data_row_count: self.data_row_count,
        }
    }
}

/// How the walk continues below a row.
enum Descent {
    /// No child collection and no runtime state
    Leaf,
    Collapsed,
    /// Expanded, replaced by one synthetic entry
    Inject(RowKind),
    /// Expanded, `n` children to visit
    Children(usize),
    /// Expanded with nothing to show
    Nothing,
}

struct VisitFrame<R> {
    row: R,
    depth: usize,
    /// Original position in the sibling collection
    index: usize,
    parent_id: RowId,
    row_path: Vec<PathSegment>,
    row_index_path: Vec<usize>,
    /// Precomputed when a sibling order is active
    absolute: Option<usize>,
}

enum Frame<R> {
    Visit(VisitFrame<R>),
    /// Children of a group were pushed above this marker
    CloseGroup { first_position: usize },
}

struct Flattener<'f, 'o, R> {
    expansion: &'f ExpansionState,
    row_states: &'f HashMap<RowId, RowRuntimeState>,
    options: &'f FlattenOptions<'o, R>,
}

impl<'f, 'o, R: RowData> Flattener<'f, 'o, R> {
    fn resolve(
        &self,
        row: &R,
        depth: usize,
        index: usize,
        index_path: &[usize],
        parent_id: &RowId,
    ) -> RowId {
        let ctx = RowIdContext {
            row,
            depth,
            index,
            index_path,
            parent_id,
        };
        resolve_row_id(&ctx, self.options.id_fn)
    }

    fn descent(&self, row: &R, row_id: &RowId, depth: usize) -> Descent {
        // Depth is bounded by the grouping spec
        let Some(collection) = self.options.grouping.get(depth) else {
            return Descent::Leaf;
        };
        let child_count = row.child_count(collection);
        let state = self.row_states.get(row_id).filter(|s| !s.is_idle());
        if child_count.is_none() && state.is_none() {
            return Descent::Leaf;
        }
        if !self.expansion.is_expanded(row_id, depth) {
            return Descent::Collapsed;
        }

        let children = child_count.unwrap_or(0);
        let renderers = self.options.state_renderers;
        if let Some(state) = state {
            if let (Some(message), true) = (&state.error, renderers.error) {
                return Descent::Inject(RowKind::Error {
                    message: message.clone(),
                });
            }
            if state.loading && renderers.loading {
                return Descent::Inject(RowKind::Loading);
            }
            if state.is_empty && renderers.empty && children == 0 {
                return Descent::Inject(RowKind::Empty {
                    message: state.empty_message.clone(),
                });
            }
        }

        if children == 0 {
            Descent::Nothing
        } else if self.options.nested_grid_level == Some(depth) {
            Descent::Inject(RowKind::NestedGrid)
        } else {
            Descent::Children(children)
        }
    }

    fn children_of(&self, row: &R, depth: usize, count: usize) -> Vec<R> {
        let collection = &self.options.grouping[depth];
        (0..count).map_while(|i| row.child_at(collection, i)).collect()
    }

    fn visit_order(&self, siblings: &[R], depth: usize) -> Vec<usize> {
        self.options
            .order
            .and_then(|order| order.sibling_indices(siblings, depth))
            .map(|indices| indices.into_iter().filter(|&i| i < siblings.len()).collect())
            .unwrap_or_else(|| (0..siblings.len()).collect())
    }

    /// Counts data entries of the subtree rooted at `row` in natural order.
    fn count_data_rows(
        &self,
        row: &R,
        depth: usize,
        index: usize,
        index_path: &[usize],
        parent_id: &RowId,
    ) -> usize {
        let mut total = 0;
        let mut stack = vec![(row.clone(), depth, index, index_path.to_vec(), parent_id.clone())];
        while let Some((row, depth, index, index_path, parent_id)) = stack.pop() {
            total += 1;
            let row_id = self.resolve(&row, depth, index, &index_path, &parent_id);
            if let Descent::Children(count) = self.descent(&row, &row_id, depth) {
                for (i, child) in self.children_of(&row, depth, count).into_iter().enumerate() {
                    let mut child_path = index_path.clone();
                    child_path.push(i);
                    stack.push((child, depth + 1, i, child_path, row_id.clone()));
                }
            }
        }
        total
    }

    /// Pushes one sibling collection so it pops in visit order.
    ///
    /// # Arguments
    /// * `first_absolute` - Absolute index of the first natural sibling, when
    ///   a sibling order is active
    #[allow(clippy::too_many_arguments)]
    fn push_siblings(
        &self,
        stack: &mut Vec<Frame<R>>,
        siblings: Vec<R>,
        depth: usize,
        parent_id: &RowId,
        parent_path: &[PathSegment],
        parent_index_path: &[usize],
        first_absolute: Option<usize>,
    ) {
        let order = self.visit_order(&siblings, depth);

        let absolutes: Option<Vec<usize>> = first_absolute.map(|first| {
            let mut next = first;
            siblings
                .iter()
                .enumerate()
                .map(|(i, row)| {
                    let mut index_path = parent_index_path.to_vec();
                    index_path.push(i);
                    let absolute = next;
                    next += self.count_data_rows(row, depth, i, &index_path, parent_id);
                    absolute
                })
                .collect()
        });

        for i in order.into_iter().rev() {
            let mut row_path = parent_path.to_vec();
            row_path.push(PathSegment::Index(i));
            let mut row_index_path = parent_index_path.to_vec();
            row_index_path.push(i);
            stack.push(Frame::Visit(VisitFrame {
                row: siblings[i].clone(),
                depth,
                index: i,
                parent_id: parent_id.clone(),
                row_path,
                row_index_path,
                absolute: absolutes.as_ref().map(|a| a[i]),
            }));
        }
    }
}

/// Flattens a row tree into its render sequence.
///
/// Pure: the same rows, expansion state, runtime states and options always
/// produce the same sequence.
///
/// # Arguments
/// * `roots` - Root rows in data order
/// * `expansion` - Depth defaults and per-row overrides
/// * `row_states` - Runtime load state per row
/// * `options` - Grouping spec, renderers, id function and ordering
pub fn flatten_rows<R, I>(
    roots: I,
    expansion: &ExpansionState,
    row_states: &HashMap<RowId, RowRuntimeState>,
    options: &FlattenOptions<'_, R>,
) -> FlattenedRows<R>
where
    R: RowData,
    I: IntoIterator<Item = R>,
{
    let flattener = Flattener {
        expansion,
        row_states,
        options,
    };

    let mut stack: Vec<Frame<R>> = Vec::new();
    let first_absolute = options.order.is_some().then_some(0);
    flattener.push_siblings(&mut stack, roots.into_iter().collect(), 0, &RowId::root(), &[], &[], first_absolute);

    let mut rows: Vec<TableRow<R>> = Vec::new();
    let mut position_of: HashMap<RowId, usize> = HashMap::new();
    let mut data_row_count = 0;

    while let Some(frame) = stack.pop() {
        let visit = match frame {
            Frame::CloseGroup { first_position } => {
                if rows.len() > first_position {
                    if let Some(last) = rows.last_mut() {
                        last.is_last_group_row = true;
                    }
                }
                continue;
            }
            Frame::Visit(visit) => visit,
        };

        let depth = visit.depth;
        let row_id = flattener.resolve(&visit.row, depth, visit.index, &visit.row_index_path, &visit.parent_id);
        let descent = flattener.descent(&visit.row, &row_id, depth);
        let grouping_key = options.grouping.get(depth).cloned();
        let position = rows.len();
        let absolute = visit.absolute.unwrap_or(data_row_count);
        data_row_count += 1;

        if let Some(previous) = position_of.insert(row_id.clone(), position) {
            tracing::debug!(%row_id, previous, position, "duplicate row id, keeping last position");
        }

        rows.push(TableRow {
            row: visit.row.clone(),
            kind: RowKind::Data,
            depth,
            row_id: row_id.clone(),
            row_path: visit.row_path.clone(),
            row_index_path: visit.row_index_path.clone(),
            absolute_row_index: Some(absolute),
            display_position: position,
            grouping_key: grouping_key.clone(),
            is_last_group_row: false,
            is_expandable: !matches!(descent, Descent::Leaf),
            is_expanded: matches!(descent, Descent::Inject(_) | Descent::Children(_) | Descent::Nothing),
        });

        match descent {
            Descent::Inject(kind) => {
                let mut row_path = visit.row_path;
                if let Some(collection) = &grouping_key {
                    row_path.push(PathSegment::Collection(collection.clone()));
                }
                rows.push(TableRow {
                    row: visit.row,
                    kind,
                    depth: depth + 1,
                    row_id,
                    row_path,
                    row_index_path: visit.row_index_path,
                    absolute_row_index: None,
                    display_position: position + 1,
                    grouping_key,
                    is_last_group_row: true,
                    is_expandable: false,
                    is_expanded: false,
                });
            }
            Descent::Children(count) => {
                stack.push(Frame::CloseGroup {
                    first_position: rows.len(),
                });
                let children = flattener.children_of(&visit.row, depth, count);
                let mut child_path = visit.row_path;
                if let Some(collection) = grouping_key {
                    child_path.push(PathSegment::Collection(collection));
                }
                flattener.push_siblings(
                    &mut stack,
                    children,
                    depth + 1,
                    &row_id,
                    &child_path,
                    &visit.row_index_path,
                    visit.absolute.map(|a| a + 1),
                );
            }
            Descent::Leaf | Descent::Collapsed | Descent::Nothing => {}
        }
    }

    tracing::debug!(rows = rows.len(), data_rows = data_row_count, "flattened row tree");

    FlattenedRows {
        rows,
        position_of,
        data_row_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{attribute_key, RowKey};
    use crate::row_state::RowStateStore;
    use serde_json::{json, Value};

    fn grouping(levels: &[&str]) -> Vec<String> {
        levels.iter().map(|s| s.to_string()).collect()
    }

    fn id(keys: &[usize]) -> RowId {
        RowId::from_keys(keys.iter().copied())
    }

    /// Three rows, the second one with four children.
    fn small_tree() -> Vec<Value> {
        vec![
            json!({"name": "a"}),
            json!({"name": "b", "children": [
                {"name": "b0"}, {"name": "b1"}, {"name": "b2"}, {"name": "b3"}
            ]}),
            json!({"name": "c"}),
        ]
    }

    fn names<R: RowData>(rows: &FlattenedRows<R>) -> Vec<String> {
        rows.rows()
            .iter()
            .map(|r| match &r.kind {
                RowKind::Data => r.row.attr("name").and_then(|v| v.as_str().map(String::from)).unwrap_or_default(),
                RowKind::Loading => "<loading>".to_string(),
                RowKind::Error { .. } => "<error>".to_string(),
                RowKind::Empty { .. } => "<empty>".to_string(),
                RowKind::NestedGrid => "<grid>".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_all_collapsed() {
        let data = small_tree();
        let spec = grouping(&["children"]);
        let options = FlattenOptions::new(&spec);
        let flat = flatten_rows(data.iter(), &ExpansionState::new(), &HashMap::new(), &options);

        assert_eq!(flat.len(), 3);
        assert!(flat.rows().iter().all(|r| r.kind.is_data()));
        assert!(!flat.rows()[0].is_expandable);
        assert!(flat.rows()[1].is_expandable);
        assert!(!flat.rows()[1].is_expanded);
    }

    #[test]
    fn test_loading_row_replaces_children() {
        let data = small_tree();
        let spec = grouping(&["children"]);
        let options = FlattenOptions::new(&spec);
        let mut expansion = ExpansionState::new();
        expansion.expand(id(&[1]));
        let mut states = RowStateStore::new();
        states.set_loading(id(&[1]));

        let flat = flatten_rows(data.iter(), &expansion, states.as_map(), &options);

        assert_eq!(names(&flat), vec!["a", "b", "<loading>", "c"]);
        let loading = &flat.rows()[2];
        assert_eq!(loading.row_id, id(&[1]));
        assert_eq!(loading.depth, 1);
        assert!(!loading.is_expandable);
        assert_eq!(loading.absolute_row_index, None);
        assert_eq!(flat.data_row_count(), 3);
        assert_eq!(flat.position_of(&id(&[2])), Some(3));
    }

    #[test]
    fn test_expanded_children_in_order() {
        let data = small_tree();
        let spec = grouping(&["children"]);
        let options = FlattenOptions::new(&spec);
        let expansion = ExpansionState::with_expanded_depths([0]);
        let flat = flatten_rows(data.iter(), &expansion, &HashMap::new(), &options);

        assert_eq!(names(&flat), vec!["a", "b", "b0", "b1", "b2", "b3", "c"]);
        let b2 = &flat.rows()[4];
        assert_eq!(b2.row_id, id(&[1, 2]));
        assert_eq!(b2.row_index_path, vec![1, 2]);
        assert_eq!(
            b2.row_path,
            vec![
                PathSegment::Index(1),
                PathSegment::Collection("children".to_string()),
                PathSegment::Index(2)
            ]
        );
        assert_eq!(b2.grouping_key, None);
        assert_eq!(flat.rows()[1].grouping_key.as_deref(), Some("children"));

        let last_flags: Vec<bool> = flat.rows().iter().map(|r| r.is_last_group_row).collect();
        assert_eq!(last_flags, vec![false, false, false, false, false, true, false]);

        for (i, row) in flat.rows().iter().enumerate() {
            assert_eq!(row.display_position, i);
            assert_eq!(row.absolute_row_index, Some(i));
        }
    }

    #[test]
    fn test_collapse_override_hides_descendants() {
        let data = vec![json!({"name": "r", "l1": [
            {"name": "x", "l2": [{"name": "x0"}, {"name": "x1"}]},
            {"name": "y", "l2": [{"name": "y0"}]}
        ]})];
        let spec = grouping(&["l1", "l2"]);
        let options = FlattenOptions::new(&spec);
        let mut expansion = ExpansionState::with_expanded_depths([0, 1]);
        expansion.collapse(id(&[0, 0]));

        let flat = flatten_rows(data.iter(), &expansion, &HashMap::new(), &options);
        assert_eq!(names(&flat), vec!["r", "x", "y", "y0"]);

        // Last descendant of the deepest group closes both groups
        assert!(flat.rows()[3].is_last_group_row);
        assert!(!flat.rows()[2].is_last_group_row);
    }

    #[test]
    fn test_state_precedence() {
        let data = small_tree();
        let spec = grouping(&["children"]);
        let mut expansion = ExpansionState::new();
        expansion.expand(id(&[1]));
        let mut states = HashMap::new();
        states.insert(
            id(&[1]),
            RowRuntimeState {
                loading: true,
                error: Some("boom".to_string()),
                is_empty: true,
                empty_message: None,
            },
        );

        let options = FlattenOptions::new(&spec);
        let flat = flatten_rows(data.iter(), &expansion, &states, &options);
        assert_eq!(flat.rows()[2].kind, RowKind::Error { message: "boom".to_string() });

        let mut options = FlattenOptions::new(&spec);
        options.state_renderers.error = false;
        let flat = flatten_rows(data.iter(), &expansion, &states, &options);
        assert_eq!(flat.rows()[2].kind, RowKind::Loading);

        // Empty only wins when there really are no children
        options.state_renderers.loading = false;
        let flat = flatten_rows(data.iter(), &expansion, &states, &options);
        assert_eq!(names(&flat), vec!["a", "b", "b0", "b1", "b2", "b3", "c"]);
    }

    #[test]
    fn test_unregistered_renderer_skips_injection() {
        let data = small_tree();
        let spec = grouping(&["children"]);
        let mut options = FlattenOptions::new(&spec);
        options.state_renderers = StateRenderers::NONE;
        let mut expansion = ExpansionState::new();
        expansion.expand(id(&[1]));
        let mut states = RowStateStore::new();
        states.set_loading(id(&[1]));

        let flat = flatten_rows(data.iter(), &expansion, states.as_map(), &options);
        assert_eq!(flat.len(), 7);
    }

    #[test]
    fn test_lazy_row_without_collection() {
        let data = vec![json!({"name": "lazy"})];
        let spec = grouping(&["children"]);
        let options = FlattenOptions::new(&spec);
        let mut expansion = ExpansionState::new();
        expansion.expand(id(&[0]));
        let mut states = RowStateStore::new();

        let flat = flatten_rows(data.iter(), &expansion, states.as_map(), &options);
        assert!(!flat.rows()[0].is_expandable);

        states.set_empty(id(&[0]), Some("no stores".to_string()));
        let flat = flatten_rows(data.iter(), &expansion, states.as_map(), &options);
        assert!(flat.rows()[0].is_expandable);
        assert_eq!(
            flat.rows()[1].kind,
            RowKind::Empty {
                message: Some("no stores".to_string())
            }
        );
        assert!(flat.rows()[1].is_last_group_row);
    }

    #[test]
    fn test_idle_state_keeps_leaf() {
        let data = vec![json!({"name": "leaf"})];
        let spec = grouping(&["children"]);
        let options = FlattenOptions::new(&spec);
        let mut expansion = ExpansionState::new();
        expansion.expand(id(&[0]));
        let mut states = HashMap::new();
        states.insert(id(&[0]), RowRuntimeState::default());

        let flat = flatten_rows(data.iter(), &expansion, &states, &options);
        assert_eq!(flat.len(), 1);
        assert!(!flat.rows()[0].is_expandable);
        assert!(!flat.rows()[0].is_expanded);
    }

    #[test]
    fn test_nested_grid_level() {
        let data = small_tree();
        let spec = grouping(&["children"]);
        let mut options = FlattenOptions::new(&spec);
        options.nested_grid_level = Some(0);
        let expansion = ExpansionState::with_expanded_depths([0]);

        let flat = flatten_rows(data.iter(), &expansion, &HashMap::new(), &options);
        assert_eq!(names(&flat), vec!["a", "b", "<grid>", "c"]);
        assert_eq!(flat.data_row_count(), 3);
    }

    #[test]
    fn test_non_array_collection_is_leaf() {
        let data = vec![json!({"name": "odd", "children": "not a list"})];
        let spec = grouping(&["children", "deeper"]);
        let options = FlattenOptions::new(&spec);
        let flat = flatten_rows(data.iter(), &ExpansionState::initial(2, true, &[]), &HashMap::new(), &options);
        assert_eq!(flat.len(), 1);
        assert!(!flat.rows()[0].is_expandable);
    }

    #[test]
    fn test_grouping_shallower_than_data() {
        let data = vec![json!({"name": "r", "children": [{"name": "c", "children": [{"name": "g"}]}]})];
        let spec = grouping(&["children"]);
        let options = FlattenOptions::new(&spec);
        let flat = flatten_rows(data.iter(), &ExpansionState::with_expanded_depths([0, 1]), &HashMap::new(), &options);
        assert_eq!(names(&flat), vec!["r", "c"]);
        assert!(!flat.rows()[1].is_expandable);
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let data = small_tree();
        let spec = grouping(&["children"]);
        let options = FlattenOptions::new(&spec);
        let expansion = ExpansionState::with_expanded_depths([0]);
        let first = flatten_rows(data.iter(), &expansion, &HashMap::new(), &options);
        let second = flatten_rows(data.iter(), &expansion, &HashMap::new(), &options);
        assert_eq!(first.rows(), second.rows());
    }

    #[test]
    fn test_duplicate_ids_keep_last_position() {
        let data = vec![json!({"code": "same"}), json!({"code": "same"})];
        let spec = grouping(&[]);
        let id_fn = attribute_key::<&Value>("code");
        let mut options = FlattenOptions::new(&spec);
        options.id_fn = Some(&id_fn);

        let flat = flatten_rows(data.iter(), &ExpansionState::new(), &HashMap::new(), &options);
        assert_eq!(flat.len(), 2);
        assert_eq!(flat.position_of(&RowId::from_keys([RowKey::from("same")])), Some(1));
    }

    struct Reverse;

    impl<R> SiblingOrder<R> for Reverse {
        fn sibling_indices(&self, siblings: &[R], _depth: usize) -> Option<Vec<usize>> {
            Some((0..siblings.len()).rev().collect())
        }
    }

    struct DropFirst;

    impl<R> SiblingOrder<R> for DropFirst {
        fn sibling_indices(&self, siblings: &[R], _depth: usize) -> Option<Vec<usize>> {
            Some((1..siblings.len()).collect())
        }
    }

    #[test]
    fn test_order_keeps_identity_and_absolute_index() {
        let data = small_tree();
        let spec = grouping(&["children"]);
        let expansion = ExpansionState::with_expanded_depths([0]);
        let mut options = FlattenOptions::new(&spec);
        options.order = Some(&Reverse);

        let flat = flatten_rows(data.iter(), &expansion, &HashMap::new(), &options);
        assert_eq!(names(&flat), vec!["c", "b", "b3", "b2", "b1", "b0", "a"]);
        assert_eq!(flat.rows()[0].row_id, id(&[2]));
        assert_eq!(flat.rows()[0].absolute_row_index, Some(6));
        assert_eq!(flat.rows()[2].absolute_row_index, Some(5));
        assert_eq!(flat.rows()[6].absolute_row_index, Some(0));
        assert!(flat.rows()[5].is_last_group_row);
    }

    #[test]
    fn test_filter_keeps_absolute_index() {
        let data = small_tree();
        let spec = grouping(&["children"]);
        let expansion = ExpansionState::with_expanded_depths([0]);
        let mut options = FlattenOptions::new(&spec);
        options.order = Some(&DropFirst);

        let flat = flatten_rows(data.iter(), &expansion, &HashMap::new(), &options);
        assert_eq!(names(&flat), vec!["b", "b1", "b2", "b3", "c"]);
        let absolutes: Vec<Option<usize>> = flat.rows().iter().map(|r| r.absolute_row_index).collect();
        assert_eq!(absolutes, vec![Some(1), Some(3), Some(4), Some(5), Some(6)]);
        assert_eq!(flat.data_row_count(), 5);
    }

    #[test]
    fn test_map_rows_detaches_handles() {
        let data = small_tree();
        let spec = grouping(&["children"]);
        let expansion = ExpansionState::with_expanded_depths([0]);
        let flat = flatten_rows(data.iter(), &expansion, &HashMap::new(), &FlattenOptions::new(&spec));
        let detached = flat.clone().map_rows(|_| ());

        assert_eq!(detached.len(), flat.len());
        assert_eq!(detached.position_of(&id(&[1, 2])), Some(4));
        let path = &detached.rows()[4].row_path;
        assert_eq!(crate::identity::row_at_path(&data, path), Some(&data[1]["children"][2]));
    }
}
