//! Status bar UI rendering
//!
//! Shows memory use, the dataset source and row counts.

use crate::app::AppState;
use crate::utils::{format_count, format_memory_mb, get_current_memory_mb};
use eframe::egui;
use egui::RichText;
use rtable::ScrollDirection;

/// Renders the status panel at the bottom of the window
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Reference to application state
pub fn render_status_bar(ui: &mut egui::Ui, state: &AppState) {
    ui.horizontal(|ui| {
        // Always show memory usage first
        let memory_text = format_memory_mb(get_current_memory_mb());
        ui.label(RichText::new(&memory_text).strong());

        let Some(dataset) = state.table.dataset() else {
            ui.label(RichText::new("| No dataset loaded").strong());
            return;
        };

        ui.label(RichText::new("|").strong());
        let source = match state.table.file_path() {
            Some(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            None => "Virtual Dataset".to_string(),
        };
        let grouping = state.table.config().grouping().join(" › ");
        ui.label(
            RichText::new(format!(
                "{source} | Grouping: {} | Rows: {}",
                if grouping.is_empty() { "none" } else { &grouping },
                format_count(dataset.total_rows() as i64),
            ))
            .strong(),
        );

        let flattened = state.table.flattened();
        ui.label(RichText::new("|").strong());
        ui.label(format!(
            "Shown: {} ({} entries)",
            format_count(flattened.data_row_count() as i64),
            format_count(flattened.len() as i64),
        ));

        if state.table.page_count() > 1 {
            ui.label(RichText::new("|").strong());
            ui.label(format!("Page {} / {}", state.table.page() + 1, state.table.page_count()));
        }

        let overrides = state.table.expansion().override_count();
        let row_states = state.table.row_states().len();
        if overrides > 0 || row_states > 0 {
            ui.label(RichText::new("|").strong());
            ui.label(format!("Toggled: {overrides} | Row states: {row_states}"));
        }

        if let Some(selected) = state.selection.selected() {
            ui.label(RichText::new("|").strong());
            ui.label(format!("Selected: {selected}"));
        }

        if !state.requested_view.is_natural() {
            ui.label(RichText::new("|").strong());
            ui.label(RichText::new("View: sorted/filtered").color(egui::Color32::YELLOW));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let viewport = &state.viewport;
            let window = viewport.window();
            let arrow = match viewport.direction() {
                ScrollDirection::Down => "↓",
                ScrollDirection::Up => "↑",
                ScrollDirection::None => "·",
            };
            ui.label(format!(
                "{arrow} {:.0}px of {:.0}px | Window {}..{} | Coalesced scrolls: {}",
                viewport.scroll_top(),
                viewport.content_height(),
                window.buffered.start,
                window.buffered.end,
                viewport.coalesced_samples(),
            ));
        });
    });
}
