//! Hierarchical Table Viewer GUI Application
//!
//! An interactive viewer for grouped, nested row data built on egui.
//! The viewer features:
//! - Expandable rows following a grouping spec, with per-group sorting and filtering
//! - Virtualized rendering of only the rows near the viewport

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
//! - Two-phase animated transitions for sort and filter changes
//! - Loading, error and empty state rows, and nested grids
//! - Asynchronous dataset loading, plain or Brotli-compressed
//! - Multiple themes with persistent preferences
//!
//! The application is built with a modular architecture:
//! - `app/` - Application state management and coordination
//! - `domain/` - Sorting and filtering
//! - `io/` - File loading and virtual dataset generation
//! - `utils/` - Formatting helpers
//! - `ui/` - UI panel rendering and interaction
//! - `rendering/` - Low-level row rendering
//! - `state/` - State components (table, viewport, selection, theme, layout)

use eframe::egui;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod utils;
mod domain;
mod io;
mod app;
mod rendering;
mod ui;
mod state;

use app::{AppState, ApplicationCoordinator, SettingsCoordinator, ThemeCoordinator, ANIMATIONS_KEY, LAYOUT_KEY};
use io::AsyncLoader;
use rtable::{TableConfig, TwoPhaseScheduler, ValidatedConfig};
use state::LayoutState;
use ui::panel_manager::{PanelInteraction, PanelManager};

/// Main application entry point that initializes and launches the table viewer GUI.
fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse command-line arguments to check for initial file to load
    let initial_file = std::env::args().nth(1).map(PathBuf::from);

    let (config, config_error) = load_config();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Hierarchical Table Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "Hierarchical Table Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(TableViewerApp::new(cc, config, config_error, initial_file)))),
    )
}

/// Reads the per-user configuration, falling back to defaults on error.
fn load_config() -> (ValidatedConfig, Option<String>) {
    let loaded = match TableConfig::default_path() {
        Some(path) => TableConfig::load_or_default(&path),
        None => Ok(TableConfig::default()),
    };
    let validated = loaded.and_then(|config| config.validate().map_err(anyhow::Error::from));
    match validated {
        Ok(config) => (config, None),
        Err(err) => {
            tracing::error!("{err:#}");
            (ValidatedConfig::default(), Some(format!("Configuration ignored: {err:#}")))
        }
    }
}

/// The main table viewer application.
///
/// Delegates most functionality to coordinators:
/// - `ApplicationCoordinator` handles loading, view changes and row actions
/// - `ThemeCoordinator` handles theme persistence and application
/// - `PanelManager` handles UI panel layout and rendering
struct TableViewerApp {
    /// Centralized application state
    state: AppState,
    /// Asynchronous file loader
    loader: AsyncLoader,
    /// Two-phase queue for staged view changes
    scheduler: TwoPhaseScheduler<AppState>,
    /// Optional file to load on first frame
    pending_file_load: Option<PathBuf>,
}

impl TableViewerApp {
    /// Creates a new viewer instance with settings loaded from persistent storage.
    fn new(
        cc: &eframe::CreationContext,
        config: ValidatedConfig,
        config_error: Option<String>,
        initial_file: Option<PathBuf>,
    ) -> Self {
        let theme_name = ThemeCoordinator::load_theme_from_storage(cc.storage);
        let layout: LayoutState = SettingsCoordinator::load_setting_or(cc.storage, LAYOUT_KEY, LayoutState::new());
        let animations =
            SettingsCoordinator::load_setting_or(cc.storage, ANIMATIONS_KEY, config.config().animations_enabled);

        let mut state = AppState::new(config, &theme_name, layout);
        state.table.set_animations_enabled(animations);
        state.error_message = config_error;

        Self {
            state,
            loader: AsyncLoader::new(),
            scheduler: TwoPhaseScheduler::new(),
            pending_file_load: initial_file,
        }
    }

    fn save_preferences(&self, storage: &mut dyn eframe::Storage) {
        ThemeCoordinator::save_theme_to_storage(storage, self.state.theme.current_theme_name());
        SettingsCoordinator::save_setting(storage, LAYOUT_KEY, &self.state.layout);
        SettingsCoordinator::save_setting(storage, ANIMATIONS_KEY, &self.state.table.animations_enabled());
    }

    /// Handles panel interactions by delegating to ApplicationCoordinator.
    fn handle_panel_interaction(&mut self, interaction: PanelInteraction, ctx: &egui::Context) {
        let state = &mut self.state;
        match interaction {
            PanelInteraction::OpenFileRequested(path) => {
                self.scheduler = TwoPhaseScheduler::new();
                ApplicationCoordinator::open_file(state, &mut self.loader, path, ctx);
            }
            PanelInteraction::OpenVirtualDatasetRequested => {
                self.scheduler = TwoPhaseScheduler::new();
                ApplicationCoordinator::open_virtual_dataset(state, &mut self.loader);
            }
            PanelInteraction::ExpandAll => ApplicationCoordinator::expand_all(state),
            PanelInteraction::CollapseAll => ApplicationCoordinator::collapse_all(state),
            PanelInteraction::FilterChanged(filter) => {
                ApplicationCoordinator::set_filter(state, &mut self.scheduler, filter);
            }
            PanelInteraction::AnimationsToggled(enabled) => ApplicationCoordinator::set_animations(state, enabled),
            PanelInteraction::PageRequested(page) => ApplicationCoordinator::set_page(state, page),
            PanelInteraction::ThemeChanged(name) => ThemeCoordinator::change_theme(state, &name),
            PanelInteraction::SortRequested(column) => {
                ApplicationCoordinator::toggle_sort(state, &mut self.scheduler, &column);
            }
            PanelInteraction::RowSelected(row_id) => ApplicationCoordinator::handle_row_selected(state, row_id),
            PanelInteraction::RowExpandToggled { row_id, depth } => {
                ApplicationCoordinator::handle_expand_toggle(state, &row_id, depth);
            }
            PanelInteraction::RowAction { row_id, action } => {
                ApplicationCoordinator::handle_row_action(state, row_id, action);
            }
            PanelInteraction::MoveSelection(delta) => ApplicationCoordinator::move_selection(state, delta),
        }
        ctx.request_repaint();
    }
}

impl eframe::App for TableViewerApp {
    /// Called when the app is being shut down - ensures preferences are saved.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        self.save_preferences(storage);
    }

    /// Main update loop.
    ///
    /// 1. Run phase-2 tasks whose phase-1 work was painted last frame
    /// 2. Check for async loading completion
    /// 3. Apply theme and persist preferences
    /// 4. Load initial file if specified via command line
    /// 5. Run queued phase-1 tasks
    /// 6. Render all panels and handle their interactions
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.state.now = ctx.input(|i| i.time);
        self.scheduler.frame_painted(&mut self.state);

        if ApplicationCoordinator::check_loading_completion(&mut self.state, &mut self.loader) {
            self.scheduler = TwoPhaseScheduler::new();
        }

        ThemeCoordinator::apply_current_theme(ctx, &self.state);

        // Persist preferences during frame (for crash resilience)
        if let Some(storage) = frame.storage_mut() {
            self.save_preferences(storage);
        }

        // Load initial file if specified via command line (only on first frame)
        if let Some(path) = self.pending_file_load.take() {
            ApplicationCoordinator::open_file(&mut self.state, &mut self.loader, path, ctx);
        }

        self.scheduler.run_pending(&mut self.state);

        if let Some(interaction) = PanelManager::render_all_panels(ctx, &mut self.state, &self.loader) {
            self.handle_panel_interaction(interaction, ctx);
        }

        if self.scheduler.has_pending() || self.state.table.is_animating(self.state.now) {
            ctx.request_repaint();
        }
    }
}
