//! Application-level coordination and workflow management.
//!
//! Handles high-level operations like dataset loading, error handling, view
//! changes and row actions, coordinating between the state components.

use crate::app::AppState;
use crate::domain::sorting::SortSpec;
use crate::domain::view_order::ViewSpec;
use crate::io::{AsyncLoader, LoadResult};
use rtable::virtual_dataset::VirtualDatasetConfig;
use rtable::{Dataset, RowId, StageOutcome, TwoPhaseScheduler};
use std::path::PathBuf;

/// Runtime state a user can put on a row from its context menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowAction {
    MarkLoading,
    MarkError(String),
    MarkEmpty,
    ClearState,
}

/// Coordinates application-level operations and workflows.
///
/// This struct is responsible for:
/// - Managing file loading workflows
/// - Routing sort and filter changes through the two-phase scheduler
/// - Applying expansion, paging and row-state changes
/// - Managing error states
pub struct ApplicationCoordinator;

impl ApplicationCoordinator {
    // ===== Loading =====

    /// Initiates asynchronous file loading.
    ///
    /// Immediately clears the previous dataset to show the loading indicator.
    pub fn open_file(state: &mut AppState, loader: &mut AsyncLoader, path: PathBuf, ctx: &egui::Context) {
        state.reset_table_state();
        loader.start_file_load(path, ctx);
    }

    /// Checks for loading completion and applies results to application state.
    ///
    /// Called once per frame in the update loop.
    /// Returns true if a load operation completed (success or error).
    pub fn check_loading_completion(state: &mut AppState, loader: &mut AsyncLoader) -> bool {
        match loader.check_completion() {
            LoadResult::Success { data, path } => {
                Self::install_dataset(state, data, path);
                true
            }
            LoadResult::Error(error_msg) => {
                tracing::error!(error = %error_msg, "dataset load failed");
                state.error_message = Some(format!("Error loading dataset: {error_msg}"));
                state.table.clear();
                true
            }
            LoadResult::None => false,
        }
    }

    /// Generates and loads a virtual dataset in-memory.
    pub fn open_virtual_dataset(state: &mut AppState, loader: &mut AsyncLoader) {
        state.reset_table_state();
        let data = loader.load_virtual_dataset(&VirtualDatasetConfig::default());
        Self::install_dataset(state, data, None);
    }

    fn install_dataset(state: &mut AppState, data: Dataset, path: Option<PathBuf>) {
        let dimensions = *state.theme.dimensions();
        match state.table.load_dataset(data, path, &dimensions) {
            Ok(()) => {
                state.error_message = None;
                state.selection.clear();
                state.requested_view = ViewSpec::default();
                state.viewport.reset();
            }
            Err(err) => {
                tracing::error!(%err, "dataset rejected");
                state.error_message = Some(format!("Invalid configuration for dataset: {err}"));
                state.table.clear();
            }
        }
    }

    // ===== View Changes =====

    /// Requests a sort or filter change.
    ///
    /// With animations on, the change is staged in phase 1 so the superset
    /// of old and new rows is painted, and committed in phase 2 once that
    /// frame is on screen.
    pub fn request_view_change(state: &mut AppState, scheduler: &mut TwoPhaseScheduler<AppState>, view: ViewSpec) {
        if state.requested_view == view {
            return;
        }
        state.requested_view = view.clone();

        if !state.table.animations_enabled() {
            state.table.apply_view(view);
            state.viewport.invalidate();
            return;
        }

        scheduler.schedule(move |state: &mut AppState| {
            if let StageOutcome::Commit(view) = state.table.request_view(view) {
                state.table.apply_view(view);
            }
            state.viewport.invalidate();
        });
        scheduler.schedule_after_paint(|state: &mut AppState| {
            state.table.mark_superset_painted();
            if state.table.commit_painted(state.now) {
                state.viewport.invalidate();
            }
        });
    }

    /// Cycles the sort on `column`: ascending, descending, natural.
    pub fn toggle_sort(state: &mut AppState, scheduler: &mut TwoPhaseScheduler<AppState>, column: &str) {
        let view = ViewSpec {
            sort: SortSpec::cycle(state.requested_view.sort.as_ref(), column),
            filter: state.requested_view.filter.clone(),
        };
        Self::request_view_change(state, scheduler, view);
    }

    pub fn set_filter(state: &mut AppState, scheduler: &mut TwoPhaseScheduler<AppState>, filter: String) {
        let view = ViewSpec {
            sort: state.requested_view.sort.clone(),
            filter,
        };
        Self::request_view_change(state, scheduler, view);
    }

    pub fn set_animations(state: &mut AppState, enabled: bool) {
        state.table.set_animations_enabled(enabled);
        state.viewport.invalidate();
    }

    // ===== Structure Changes =====

    /// Handles an expand toggle from the row renderer.
    pub fn handle_expand_toggle(state: &mut AppState, row_id: &RowId, depth: usize) {
        let expanded = state.table.toggle_expansion(row_id, depth);
        tracing::debug!(row = %row_id, expanded, "expansion toggled");
        if !expanded && state.selection.retreat_to(row_id) {
            tracing::debug!(row = %row_id, "selection moved to collapsed row");
        }
        state.viewport.invalidate();
    }

    pub fn expand_all(state: &mut AppState) {
        state.table.expand_all();
        state.viewport.invalidate();
    }

    pub fn collapse_all(state: &mut AppState) {
        state.table.collapse_all();
        state.viewport.invalidate();
    }

    pub fn set_page(state: &mut AppState, page: usize) {
        state.table.set_page(page);
        state.viewport.reset();
    }

    /// Applies a context-menu action to a row's runtime state.
    pub fn handle_row_action(state: &mut AppState, row_id: RowId, action: RowAction) {
        tracing::debug!(row = %row_id, ?action, "row action");
        match action {
            RowAction::MarkLoading => state.table.set_row_loading(row_id),
            RowAction::MarkError(message) => state.table.set_row_error(row_id, message),
            RowAction::MarkEmpty => state.table.set_row_empty(row_id, None),
            RowAction::ClearState => state.table.clear_row_state(&row_id),
        }
        state.viewport.invalidate();
    }

    // ===== Selection =====

    pub fn handle_row_selected(state: &mut AppState, row_id: RowId) {
        state.selection.select(row_id);
    }

    /// Moves the selection by `delta` data rows and scrolls it into view.
    pub fn move_selection(state: &mut AppState, delta: isize) {
        let range = state.table.page_range();
        let start = range.start;
        if let Some(position) = state.selection.step(state.table.flattened(), range, delta) {
            state.viewport.reveal(state.table.offsets(), position - start);
        }
    }
}
