//! Progress of a background dataset load, shared with the loader thread.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// What is being read and since when.
///
/// Wrapped in an `Arc<Mutex<>>`; the loader thread calls [`finish`](Self::finish)
/// and the GUI polls it for the progress label.
#[derive(Debug, Default)]
pub struct LoadingState {
    source: Option<PathBuf>,
    started: Option<Instant>,
}

impl LoadingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, path: &Path) {
        self.source = Some(path.to_path_buf());
        self.started = Some(Instant::now());
    }

    pub fn finish(&mut self) {
        self.source = None;
        self.started = None;
    }

    pub fn in_progress(&self) -> bool {
        self.started.is_some()
    }

    /// File being read, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.started.map(|started| started.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_begin_and_finish() {
        let mut state = LoadingState::new();
        assert!(!state.in_progress());

        state.begin(Path::new("orders.jsonl.br"));
        assert!(state.in_progress());
        assert_eq!(state.source(), Some(Path::new("orders.jsonl.br")));
        assert!(state.elapsed().is_some());

        state.finish();
        assert!(!state.in_progress());
        assert_eq!(state.source(), None);
    }
}
