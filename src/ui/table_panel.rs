//! Table panel UI rendering
//!
//! Renders the column header and the virtualized row list. Only the buffered
//! window of the current page is laid out; the rest of the content height is
//! covered by top and bottom padding. While a sort or filter change is
//! staged, the superset of old and new rows is shown instead of the page.

use crate::app::AppState;
use crate::io::AsyncLoader;
use crate::rendering::row_renderer::{self, RowInteraction, RowPaint};
use crate::state::ScrollSample;
use crate::ui::table_header;
use egui::ScrollArea;
use rtable::{EntryKey, HeightOffsets, TableRow, TransitionStatus};

/// Result of table panel interactions that need to be handled by the application.
pub enum TablePanelInteraction {
    /// A column label was clicked
    SortRequested(String),
    Row(RowInteraction),
    /// Arrow keys moved the selection by this many data rows
    MoveSelection(isize),
}

/// Tint strength of entering and exiting rows
const TINT_STRENGTH: f32 = 0.35;

/// Renders the complete table panel.
pub fn render_table_panel(
    ui: &mut egui::Ui,
    state: &mut AppState,
    loader: &AsyncLoader,
) -> Option<TablePanelInteraction> {
    if state.table.dataset().is_none() {
        if loader.is_loading() {
            ui.horizontal(|ui| {
                ui.spinner();
                match loader.progress_label() {
                    Some(progress) => ui.label(format!("Loading {progress}…")),
                    None => ui.label("Loading dataset…"),
                };
            });
        } else {
            ui.label("No dataset loaded");
        }
        return None;
    }

    let mut interaction = None;

    let AppState {
        table,
        viewport,
        selection,
        theme,
        layout,
        now,
        ..
    } = state;

    if let Some(column) =
        table_header::render_table_header(ui, layout, table.columns(), table.view().sort.as_ref())
    {
        interaction = Some(TablePanelInteraction::SortRequested(column));
    }
    ui.separator();

    if ui.ctx().memory(|m| m.focused().is_none()) {
        let delta = ui.input(|i| {
            if i.key_pressed(egui::Key::ArrowDown) {
                1
            } else if i.key_pressed(egui::Key::ArrowUp) {
                -1
            } else if i.key_pressed(egui::Key::PageDown) {
                10
            } else if i.key_pressed(egui::Key::PageUp) {
                -10
            } else {
                0
            }
        });
        if delta != 0 {
            interaction = Some(TablePanelInteraction::MoveSelection(delta));
        }
    }

    // Staged superset while a change is pending, else the page
    let (rows, statuses, offsets): (Vec<&TableRow<()>>, Vec<Option<TransitionStatus>>, &HeightOffsets) =
        match (table.staged(), table.superset_offsets()) {
            (Some(staged), Some(offsets)) => (
                staged.rows.iter().map(|s| &s.row).collect(),
                staged.rows.iter().map(|s| Some(s.status)).collect(),
                offsets,
            ),
            _ => (
                table.page_rows().iter().collect(),
                vec![None; table.page_rows().len()],
                table.offsets(),
            ),
        };

    let config = table.config().config();
    let (buffer_rows, threshold) = (config.buffer_row_count, config.virtualization_threshold);
    let colors = &theme.current_theme().colors;

    let mut scroll_area = ScrollArea::vertical()
        .id_salt("table_scroll_area")
        .auto_shrink([false, false]);
    if let Some(offset) = viewport.take_scroll_request() {
        scroll_area = scroll_area.vertical_scroll_offset(offset);
    }

    scroll_area.show_viewport(ui, |ui, visible| {
        viewport.observe(ScrollSample {
            scroll_top: visible.min.y,
            content_height: visible.height(),
        });
        viewport.update_window(offsets, buffer_rows, threshold);

        let window = viewport.window().buffered.clone();
        let (top_padding, bottom_padding) = viewport.window().padding(offsets);

        // Row heights must add up to the offsets exactly
        ui.spacing_mut().item_spacing.y = 0.0;
        if top_padding > 0.0 {
            ui.add_space(top_padding);
        }

        for index in window {
            let (Some(row), Some(status)) = (rows.get(index), statuses.get(index)) else {
                break;
            };
            let tint = match status {
                Some(TransitionStatus::Entering) => Some(colors.entering.gamma_multiply(TINT_STRENGTH)),
                Some(TransitionStatus::Exiting) => Some(colors.exiting.gamma_multiply(TINT_STRENGTH)),
                Some(TransitionStatus::Persisting { .. }) => None,
                None => table
                    .entering_fade(&EntryKey::of(row), *now)
                    .map(|fade| colors.entering.gamma_multiply(TINT_STRENGTH * fade)),
            };
            let paint = RowPaint {
                height: offsets.height(index),
                columns: table.columns(),
                layout: &*layout,
                colors,
                selected: row.kind.is_data() && selection.is_selected(&row.row_id),
                tint,
                inert: matches!(status, Some(TransitionStatus::Exiting)),
            };
            if let Some(row_interaction) = row_renderer::render_row(ui, row, table.row_value(row), &paint) {
                interaction = Some(TablePanelInteraction::Row(row_interaction));
            }
        }

        if bottom_padding > 0.0 {
            ui.add_space(bottom_padding);
        }
    });

    interaction
}
