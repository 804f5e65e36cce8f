//! Panel orchestration and layout management.
//!
//! Lays out the header, the table and the status bar, and folds their
//! interactions into one [`PanelInteraction`] for the application.

use crate::app::{AppState, RowAction};
use crate::io::AsyncLoader;
use crate::rendering::row_renderer::RowInteraction;
use crate::ui::header::{self, HeaderInteraction};
use crate::ui::status_bar;
use crate::ui::table_panel::{self, TablePanelInteraction};
use rtable::RowId;
use std::path::PathBuf;

/// Result of panel interactions that need to be handled by the application coordinator.
pub enum PanelInteraction {
    /// User requested to open a file
    OpenFileRequested(PathBuf),
    /// User requested to open a virtual dataset
    OpenVirtualDatasetRequested,
    ExpandAll,
    CollapseAll,
    FilterChanged(String),
    AnimationsToggled(bool),
    PageRequested(usize),
    ThemeChanged(String),
    /// A column label was clicked
    SortRequested(String),
    RowSelected(RowId),
    RowExpandToggled { row_id: RowId, depth: usize },
    RowAction { row_id: RowId, action: RowAction },
    MoveSelection(isize),
}

impl From<HeaderInteraction> for PanelInteraction {
    fn from(interaction: HeaderInteraction) -> Self {
        match interaction {
            HeaderInteraction::OpenFileRequested(path) => PanelInteraction::OpenFileRequested(path),
            HeaderInteraction::OpenVirtualDatasetRequested => PanelInteraction::OpenVirtualDatasetRequested,
            HeaderInteraction::ExpandAll => PanelInteraction::ExpandAll,
            HeaderInteraction::CollapseAll => PanelInteraction::CollapseAll,
            HeaderInteraction::FilterChanged(filter) => PanelInteraction::FilterChanged(filter),
            HeaderInteraction::AnimationsToggled(enabled) => PanelInteraction::AnimationsToggled(enabled),
            HeaderInteraction::PageRequested(page) => PanelInteraction::PageRequested(page),
            HeaderInteraction::ThemeChanged(name) => PanelInteraction::ThemeChanged(name),
        }
    }
}

impl From<TablePanelInteraction> for PanelInteraction {
    fn from(interaction: TablePanelInteraction) -> Self {
        match interaction {
            TablePanelInteraction::SortRequested(column) => PanelInteraction::SortRequested(column),
            TablePanelInteraction::MoveSelection(delta) => PanelInteraction::MoveSelection(delta),
            TablePanelInteraction::Row(RowInteraction::Selected(row_id)) => PanelInteraction::RowSelected(row_id),
            TablePanelInteraction::Row(RowInteraction::ExpandToggled { row_id, depth }) => {
                PanelInteraction::RowExpandToggled { row_id, depth }
            }
            TablePanelInteraction::Row(RowInteraction::Action { row_id, action }) => {
                PanelInteraction::RowAction { row_id, action }
            }
        }
    }
}

/// Manages the layout and rendering of all UI panels.
pub struct PanelManager;

impl PanelManager {
    /// Renders all panels in the application window.
    ///
    /// This is the main entry point for rendering the entire UI, called from
    /// the eframe::App::update() implementation.
    pub fn render_all_panels(
        ctx: &egui::Context,
        state: &mut AppState,
        loader: &AsyncLoader,
    ) -> Option<PanelInteraction> {
        let mut interaction: Option<PanelInteraction> = None;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            if let Some(header_interaction) = header::render_header(ui, state) {
                interaction = Some(header_interaction.into());
            }
        });

        egui::TopBottomPanel::bottom("status_panel").show(ctx, |ui| {
            status_bar::render_status_bar(ui, state);
        });

        let table_frame = egui::Frame::default()
            .inner_margin(egui::Margin::same(4))
            .fill(state.theme.colors().panel_background);

        egui::CentralPanel::default().frame(table_frame).show(ctx, |ui| {
            if let Some(table_interaction) = table_panel::render_table_panel(ui, state, loader) {
                interaction = Some(table_interaction.into());
            }
        });

        interaction
    }
}
