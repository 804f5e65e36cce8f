//! Header panel UI rendering
//!
//! Handles the top bar with file controls, tree controls, the filter box,
//! paging and the theme selector.

use crate::app::AppState;
use eframe::egui;
use egui::Color32;
use std::path::PathBuf;

/// Result of user interaction with the header panel
pub enum HeaderInteraction {
    /// User clicked "Open Dataset"
    OpenFileRequested(PathBuf),
    /// User clicked "Virtual Dataset"
    OpenVirtualDatasetRequested,
    ExpandAll,
    CollapseAll,
    /// Filter text was edited
    FilterChanged(String),
    AnimationsToggled(bool),
    PageRequested(usize),
    ThemeChanged(String),
}

/// Renders the application header.
///
/// # Arguments
/// * `ui` - The egui UI context for drawing
/// * `state` - Application state
///
/// # Returns
/// * `Option<HeaderInteraction>` - User interaction result
pub fn render_header(ui: &mut egui::Ui, state: &AppState) -> Option<HeaderInteraction> {
    let mut interaction = None;

    ui.horizontal(|ui| {
        if ui.button("📁 Open Dataset").clicked() {
            let mut dialog = rfd::FileDialog::new()
                .add_filter("All Datasets", &["jsonl", "json", "br"])
                .add_filter("Row Streams", &["jsonl"])
                .add_filter("JSON Documents", &["json"])
                .add_filter("Compressed", &["br"]);

            if let Ok(cwd) = std::env::current_dir() {
                dialog = dialog.set_directory(cwd);
            }

            if let Some(path) = dialog.pick_file() {
                interaction = Some(HeaderInteraction::OpenFileRequested(path));
            }
        }

        if ui.button("🔮 Virtual Dataset").clicked() {
            interaction = Some(HeaderInteraction::OpenVirtualDatasetRequested);
        }

        ui.separator();

        if state.table.dataset().is_some() {
            if ui.button("⊞ Expand All").clicked() {
                interaction = Some(HeaderInteraction::ExpandAll);
            }
            if ui.button("⊟ Collapse All").clicked() {
                interaction = Some(HeaderInteraction::CollapseAll);
            }

            ui.separator();

            ui.label("Filter:");
            let mut filter = state.requested_view.filter.clone();
            let response = egui::TextEdit::singleline(&mut filter)
                .desired_width(160.0)
                .hint_text("text in any column")
                .show(ui)
                .response;
            if response.changed() {
                interaction = Some(HeaderInteraction::FilterChanged(filter));
            }

            let mut animations = state.table.animations_enabled();
            let toggle = ui.checkbox(&mut animations, "Animate");
            if toggle.changed() {
                interaction = Some(HeaderInteraction::AnimationsToggled(animations));
            }
            toggle.on_hover_text("Show entering and exiting rows before a sort or filter is committed");

            let page_count = state.table.page_count();
            if page_count > 1 {
                ui.separator();
                let page = state.table.page();
                if ui.add_enabled(page > 0, egui::Button::new("◀")).clicked() {
                    interaction = Some(HeaderInteraction::PageRequested(page - 1));
                }
                ui.label(format!("Page {} / {}", page + 1, page_count));
                if ui.add_enabled(page + 1 < page_count, egui::Button::new("▶")).clicked() {
                    interaction = Some(HeaderInteraction::PageRequested(page + 1));
                }
            }
        }

        // Push theme selector to the right
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let old_theme = state.theme.current_theme_name().to_string();
            let mut current_theme = old_theme.clone();
            egui::ComboBox::from_id_salt("theme_selector")
                .selected_text(&current_theme)
                .show_ui(ui, |ui| {
                    for theme_name in state.theme.theme_manager().list_themes() {
                        ui.selectable_value(&mut current_theme, theme_name.to_string(), theme_name);
                    }
                });

            if old_theme != current_theme {
                interaction = Some(HeaderInteraction::ThemeChanged(current_theme));
            }

            ui.label("Theme:");
        });
    });

    if let Some(err) = &state.error_message {
        ui.colored_label(Color32::RED, err);
    }

    interaction
}
