//! Asynchronous dataset loading.
//!
//! Dataset files are parsed in a background thread so the table stays
//! responsive while large or compressed files are read.

use crate::io::LoadingState;
use eframe::egui;
use rtable::dataset::read_dataset;
use rtable::virtual_dataset::{self, VirtualDatasetConfig};
use rtable::Dataset;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::{Arc, Mutex};
use std::thread;

/// Result of a completed loading operation.
pub enum LoadResult {
    /// Loading completed successfully
    Success {
        /// The loaded dataset
        data: Dataset,
        /// Path to the file that was loaded (None for virtual datasets)
        path: Option<PathBuf>,
    },
    /// Loading failed with an error
    Error(String),
    /// No loading operation in progress
    None,
}

/// Manages asynchronous loading of dataset files.
pub struct AsyncLoader {
    /// Shared loading state flag
    loading_state: Arc<Mutex<LoadingState>>,

    /// Channel receiver for loading results
    loading_receiver: Option<Receiver<Result<Dataset, String>>>,

    /// Path of the file currently being loaded
    pending_load_path: Option<PathBuf>,
}

impl AsyncLoader {
    /// Creates a new async loader with no active loading operation.
    pub fn new() -> Self {
        Self {
            loading_state: Arc::new(Mutex::new(LoadingState::new())),
            loading_receiver: None,
            pending_load_path: None,
        }
    }

    /// Checks if a loading operation is currently in progress.
    ///
    /// A poisoned lock reads as idle.
    pub fn is_loading(&self) -> bool {
        self.loading_state.lock().map(|state| state.in_progress()).unwrap_or(false)
    }

    /// Progress label such as `orders.jsonl (1.2s)`, while a file is being read.
    pub fn progress_label(&self) -> Option<String> {
        let state = self.loading_state.lock().ok()?;
        let name = state.source()?.file_name()?.to_string_lossy().into_owned();
        let elapsed = state.elapsed()?.as_secs_f32();
        Some(format!("{name} ({elapsed:.1}s)"))
    }

    /// Starts loading a dataset file in the background.
    ///
    /// Call [`check_completion`](Self::check_completion) once per frame to
    /// pick up the result.
    ///
    /// # Arguments
    /// * `path` - Path to the dataset file
    /// * `ctx` - egui context for requesting a repaint when loading completes
    pub fn start_file_load(&mut self, path: PathBuf, ctx: &egui::Context) {
        let (sender, receiver) = channel();
        self.loading_receiver = Some(receiver);
        update_state(&self.loading_state, |state| state.begin(&path));
        self.pending_load_path = Some(path.clone());

        let loading_state = Arc::clone(&self.loading_state);
        let ctx_handle = ctx.clone();

        thread::spawn(move || {
            tracing::debug!(path = %path.display(), "loading dataset");

            // Parse the dataset file (blocking operation)
            let result = read_dataset(&path).map_err(|e| format!("{e:#}"));

            let _ = sender.send(result);
            update_state(&loading_state, LoadingState::finish);

            // Notify GUI thread to repaint
            ctx_handle.request_repaint();
        });
    }

    /// Generates a virtual dataset in-memory.
    ///
    /// Generation is quick, so it runs synchronously.
    pub fn load_virtual_dataset(&mut self, config: &VirtualDatasetConfig) -> Dataset {
        virtual_dataset::generate(config)
    }

    /// Returns the background result, if one has arrived.
    ///
    /// # Returns
    /// * `LoadResult::Success` - Loading completed successfully
    /// * `LoadResult::Error` - Loading failed with an error
    /// * `LoadResult::None` - Still loading, or nothing was started
    pub fn check_completion(&mut self) -> LoadResult {
        let Some(receiver) = &self.loading_receiver else {
            return LoadResult::None;
        };
        let Ok(result) = receiver.try_recv() else {
            return LoadResult::None;
        };

        let load_result = match result {
            Ok(data) => LoadResult::Success {
                data,
                path: self.pending_load_path.take(),
            },
            Err(error_msg) => {
                self.pending_load_path = None;
                LoadResult::Error(error_msg)
            }
        };
        self.loading_receiver = None;
        load_result
    }
}

impl Default for AsyncLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn update_state(state: &Mutex<LoadingState>, update: impl FnOnce(&mut LoadingState)) {
    match state.lock() {
        Ok(mut state) => update(&mut *state),
        Err(poisoned) => update(&mut *poisoned.into_inner()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_async_loader_creation() {
        let loader = AsyncLoader::new();
        assert!(!loader.is_loading());
        assert_eq!(loader.progress_label(), None);
    }

    #[test]
    fn test_virtual_dataset_loading() {
        let mut loader = AsyncLoader::new();
        let dataset = loader.load_virtual_dataset(&VirtualDatasetConfig::default());
        assert!(!dataset.rows.is_empty());
    }

    #[test]
    fn test_check_completion_when_idle() {
        let mut loader = AsyncLoader::new();
        assert!(matches!(loader.check_completion(), LoadResult::None));
    }

    #[test]
    fn test_missing_file_reports_error() {
        let mut loader = AsyncLoader::new();
        let ctx = egui::Context::default();
        loader.start_file_load(PathBuf::from("/nonexistent/rtable/missing.jsonl"), &ctx);

        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match loader.check_completion() {
                LoadResult::Error(message) => {
                    assert!(message.contains("Failed to open file"));
                    break;
                }
                LoadResult::Success { .. } => panic!("missing file loaded"),
                LoadResult::None => {
                    assert!(Instant::now() < deadline, "loader timed out");
                    thread::sleep(Duration::from_millis(10));
                }
            }
        }
    }
}
