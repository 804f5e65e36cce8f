//! Table data and pipeline state.
//!
//! Owns the dataset and everything derived from it: expansion, runtime row
//! states, the flattened sequence, the current page and its offset table,
//! and the transition that is staged between a view change and its commit.
//!
//! The flattened sequence is detached from the dataset (`TableRow<()>`);
//! renderers resolve `row_path` against the dataset when they need values.

use crate::domain::view_order::ViewSpec;
use rtable::config::Dimensions;
use rtable::identity::{attribute_key, row_at_path, PathSegment, RowIdFn};
use rtable::pagination::is_data_row;
use rtable::{
    flatten_rows, paginate, ConfigError, Dataset, EntryKey, ExpansionState, FlattenOptions, FlattenedRows,
    HeightOffsets, RowHeights, RowId, RowStateStore, SiblingOrder, StageOutcome, StagedTransition, TableConfig,
    TableRow, TransitionStager, ValidatedConfig,
};
use serde_json::Value;
use std::collections::HashSet;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Seconds an entering row stays highlighted after a commit.
pub const ENTER_FADE_SECONDS: f64 = 0.4;

/// Rows that entered with the last committed view change.
#[derive(Debug, Clone)]
pub struct RecentTransition {
    pub entering: HashSet<EntryKey>,
    pub started_at: f64,
}

/// State related to the table contents.
///
/// Responsibilities:
/// - Holding the loaded dataset and its effective configuration
/// - Keeping the flattened sequence in sync with expansion, row states and view
/// - Slicing the current page and measuring it
/// - Staging sort/filter changes for animated commits
pub struct TableState {
    // ===== Data =====
    dataset: Option<Dataset>,
    file_path: Option<PathBuf>,
    /// Attribute names across all grouping levels, in first-seen order
    columns: Vec<String>,

    // ===== Configuration =====
    /// Configuration as loaded, before the dataset's grouping is merged in
    base_config: TableConfig,
    config: ValidatedConfig,
    heights: RowHeights,

    // ===== Pipeline =====
    expansion: ExpansionState,
    row_states: RowStateStore,
    view: ViewSpec,
    flattened: FlattenedRows<()>,
    page: usize,
    page_count: usize,
    page_range: Range<usize>,
    offsets: HeightOffsets,

    // ===== Transitions =====
    stager: TransitionStager<ViewSpec, ()>,
    /// Offsets over the staged superset while a change is pending
    superset_offsets: Option<HeightOffsets>,
    recent: Option<RecentTransition>,
}

impl TableState {
    /// Creates an empty table state.
    ///
    /// # Arguments
    /// * `config` - Validated startup configuration
    /// * `theme_dimensions` - Row dimensions of the active theme
    pub fn new(config: ValidatedConfig, theme_dimensions: &Dimensions) -> Self {
        let heights = config.row_heights(theme_dimensions);
        let animations = config.config().animations_enabled;
        Self {
            dataset: None,
            file_path: None,
            columns: Vec::new(),
            base_config: config.config().clone(),
            expansion: config.initial_expansion(),
            config,
            heights,
            row_states: RowStateStore::new(),
            view: ViewSpec::default(),
            flattened: FlattenedRows::default(),
            page: 0,
            page_count: 1,
            page_range: 0..0,
            offsets: HeightOffsets::default(),
            stager: TransitionStager::new(animations),
            superset_offsets: None,
            recent: None,
        }
    }

    /// Drops the dataset and everything derived from it.
    pub fn clear(&mut self) {
        self.dataset = None;
        self.file_path = None;
        self.columns.clear();
        self.row_states = RowStateStore::new();
        self.view = ViewSpec::default();
        self.stager.flush();
        self.superset_offsets = None;
        self.recent = None;
        self.page = 0;
        self.rebuild();
    }

    /// Installs a freshly loaded dataset.
    ///
    /// The configured grouping wins; a configuration without one adopts the
    /// dataset's grouping. Expansion restarts from the configured defaults.
    pub fn load_dataset(
        &mut self,
        dataset: Dataset,
        path: Option<PathBuf>,
        theme_dimensions: &Dimensions,
    ) -> Result<(), ConfigError> {
        let mut config = self.base_config.clone();
        if config.grouping.is_empty() {
            config.grouping = dataset.grouping.clone();
        }
        let config = config.validate()?;

        self.heights = config.row_heights(theme_dimensions);
        self.expansion = config.initial_expansion();
        self.columns = dataset.columns(config.grouping());
        self.config = config;
        self.dataset = Some(dataset);
        self.file_path = path;
        self.row_states = RowStateStore::new();
        self.view = ViewSpec::default();
        self.stager.flush();
        self.superset_offsets = None;
        self.recent = None;
        self.page = 0;
        self.rebuild();

        tracing::info!(
            rows = self.flattened.len(),
            data_rows = self.flattened.data_row_count(),
            "table ready"
        );
        Ok(())
    }

    // ===== Queries =====

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewSpec {
        &self.view
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    pub fn row_states(&self) -> &RowStateStore {
        &self.row_states
    }

    pub fn flattened(&self) -> &FlattenedRows<()> {
        &self.flattened
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Position of the current page inside the flattened sequence.
    pub fn page_range(&self) -> Range<usize> {
        self.page_range.clone()
    }

    /// Entries of the current page.
    pub fn page_rows(&self) -> &[TableRow<()>] {
        &self.flattened.rows()[self.page_range.clone()]
    }

    /// Offsets over [`page_rows`](Self::page_rows).
    pub fn offsets(&self) -> &HeightOffsets {
        &self.offsets
    }

    /// Resolves an entry back to its dataset row.
    ///
    /// Synthetic entries resolve to the row that owns them.
    pub fn row_value(&self, row: &TableRow<()>) -> Option<&Value> {
        let path = match row.row_path.split_last() {
            Some((PathSegment::Collection(_), owner)) => owner,
            _ => &row.row_path[..],
        };
        row_at_path(&self.dataset.as_ref()?.rows, path)
    }

    // ===== Pipeline =====

    /// Flattens the dataset under `view` without touching the current state.
    pub fn flatten_view(&self, view: &ViewSpec) -> FlattenedRows<()> {
        let Some(dataset) = &self.dataset else {
            return FlattenedRows::default();
        };
        let config = self.config.config();
        let grouping = self.config.grouping();

        let id_fn = config.id_attribute.as_deref().map(attribute_key::<&Value>);
        let order = view.order(grouping, &self.columns);

        let mut options = FlattenOptions::new(grouping);
        options.nested_grid_level = config.nested_grid_level;
        options.state_renderers = config.state_renderers;
        options.id_fn = id_fn.as_ref().map(|f| f as &RowIdFn<'_, &Value>);
        options.order = order.as_ref().map(|o| o as &dyn SiblingOrder<&Value>);

        flatten_rows(dataset.roots(), &self.expansion, self.row_states.as_map(), &options).map_rows(|_| ())
    }

    /// Re-runs the flattener and re-slices the page.
    pub fn rebuild(&mut self) {
        self.flattened = self.flatten_view(&self.view);
        self.refresh_page();
    }

    fn refresh_page(&mut self) {
        let page = paginate(self.flattened.rows(), self.config.pagination_mode(), self.page, is_data_row);
        self.page = page.page;
        self.page_count = page.page_count;
        self.page_range = page.range.clone();
        self.offsets = HeightOffsets::compute(page.rows, &self.heights, None);
    }

    /// Switches to another page; out-of-range pages clamp.
    pub fn set_page(&mut self, page: usize) {
        self.flush_transition();
        self.page = page;
        self.refresh_page();
    }

    /// Picks up new theme dimensions. Returns true when heights changed.
    pub fn set_theme_dimensions(&mut self, dimensions: &Dimensions) -> bool {
        let heights = self.config.row_heights(dimensions);
        if heights == self.heights {
            return false;
        }
        self.heights = heights;
        self.refresh_page();
        true
    }

    // ===== Expansion =====

    /// Flips one row and returns its new state.
    pub fn toggle_expansion(&mut self, row_id: &RowId, depth: usize) -> bool {
        self.flush_transition();
        let expanded = self.expansion.toggle(row_id, depth);
        self.rebuild();
        expanded
    }

    pub fn expand_all(&mut self) {
        self.flush_transition();
        self.expansion.expand_all(self.config.grouping().len());
        self.rebuild();
    }

    pub fn collapse_all(&mut self) {
        self.flush_transition();
        self.expansion.collapse_all();
        self.rebuild();
    }

    // ===== Row Runtime States =====

    pub fn set_row_loading(&mut self, row_id: RowId) {
        self.row_states.set_loading(row_id);
        self.rebuild();
    }

    pub fn set_row_error(&mut self, row_id: RowId, message: impl Into<String>) {
        self.row_states.set_error(row_id, message);
        self.rebuild();
    }

    pub fn set_row_empty(&mut self, row_id: RowId, message: Option<String>) {
        self.row_states.set_empty(row_id, message);
        self.rebuild();
    }

    pub fn clear_row_state(&mut self, row_id: &RowId) {
        if self.row_states.clear(row_id).is_some() {
            self.rebuild();
        }
    }

    // ===== Transitions =====

    /// Stages a sort or filter change.
    ///
    /// Returns `Commit` when animations are off; the caller applies it with
    /// [`apply_view`](Self::apply_view). On `Preview` the superset is staged
    /// and the change waits for [`commit_painted`](Self::commit_painted).
    pub fn request_view(&mut self, view: ViewSpec) -> StageOutcome<ViewSpec> {
        let preview = self.flatten_view(&view);
        let preview_page = paginate(preview.rows(), self.config.pagination_mode(), self.page, is_data_row);
        let current = &self.flattened.rows()[self.page_range.clone()];

        let outcome = self.stager.request(view, current, preview_page.rows);
        self.superset_offsets = self
            .stager
            .staged()
            .map(|staged| HeightOffsets::from_heights(staged.rows.iter().map(|s| self.heights.height_of(&s.row.kind))));
        outcome
    }

    pub fn staged(&self) -> Option<&StagedTransition<()>> {
        self.stager.staged()
    }

    pub fn superset_offsets(&self) -> Option<&HeightOffsets> {
        self.superset_offsets.as_ref()
    }

    /// Records that the staged superset reached the screen.
    pub fn mark_superset_painted(&mut self) {
        self.stager.frame_rendered();
    }

    /// Commits the pending change if its superset has been painted.
    ///
    /// # Arguments
    /// * `now` - Current time in seconds, for the entering-row fade
    pub fn commit_painted(&mut self, now: f64) -> bool {
        let entering = self.stager.staged().map(|s| s.entering.clone()).unwrap_or_default();
        match self.stager.poll_commit() {
            Some(view) => {
                self.recent = (!entering.is_empty()).then_some(RecentTransition {
                    entering,
                    started_at: now,
                });
                self.apply_view(view);
                true
            }
            None => false,
        }
    }

    /// Makes `view` the steady state.
    pub fn apply_view(&mut self, view: ViewSpec) {
        self.superset_offsets = None;
        self.view = view;
        self.rebuild();
    }

    /// Applies a pending change immediately, skipping its animation.
    pub fn flush_transition(&mut self) {
        if let Some(view) = self.stager.flush() {
            self.apply_view(view);
        }
    }

    pub fn animations_enabled(&self) -> bool {
        self.stager.animations_enabled()
    }

    pub fn set_animations_enabled(&mut self, enabled: bool) {
        self.stager.set_animations_enabled(enabled);
        if !enabled {
            self.flush_transition();
            self.recent = None;
        }
    }

    /// Highlight strength (1.0 fading to 0.0) for a row that just entered.
    pub fn entering_fade(&self, key: &EntryKey, now: f64) -> Option<f32> {
        let recent = self.recent.as_ref()?;
        if !recent.entering.contains(key) {
            return None;
        }
        let elapsed = now - recent.started_at;
        (elapsed < ENTER_FADE_SECONDS).then(|| (1.0 - elapsed / ENTER_FADE_SECONDS) as f32)
    }

    /// True while a fade is still running.
    pub fn is_animating(&self, now: f64) -> bool {
        self.stager.is_pending()
            || self
                .recent
                .as_ref()
                .is_some_and(|r| now - r.started_at < ENTER_FADE_SECONDS)
    }
}
