//! Vertical scroll and render window state.
//!
//! Scroll samples are coalesced: however many arrive in one frame, the
//! window is recomputed once, from the latest.

use rtable::{
    compute_window, scroll_to_reveal, FrameCoalescer, HeightOffsets, ScrollDirection, WindowRanges, WindowRequest,
};

/// One observation of the scroll container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    pub scroll_top: f32,
    pub content_height: f32,
}

/// State related to the table's scroll position.
///
/// Responsibilities:
/// - Tracking scroll top, viewport height and scroll direction
/// - Coalescing scroll samples into one window computation per frame
/// - Holding programmatic scroll requests until the next frame
#[derive(Debug)]
pub struct ViewportState {
    scroll_top: f32,
    content_height: f32,
    direction: ScrollDirection,
    samples: FrameCoalescer<ScrollSample>,
    window: WindowRanges,
    /// Forces a recompute even when the scroll position did not move
    stale: bool,
    pending_scroll: Option<f32>,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportState {
    pub fn new() -> Self {
        Self {
            scroll_top: 0.0,
            content_height: 0.0,
            direction: ScrollDirection::None,
            samples: FrameCoalescer::new(),
            window: WindowRanges::default(),
            stale: true,
            pending_scroll: None,
        }
    }

    /// Resets scroll position; used when new data is loaded.
    pub fn reset(&mut self) {
        self.direction = ScrollDirection::None;
        self.window = WindowRanges::default();
        self.stale = true;
        self.pending_scroll = Some(0.0);
    }

    // ===== Viewport Queries =====

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn content_height(&self) -> f32 {
        self.content_height
    }

    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    pub fn window(&self) -> &WindowRanges {
        &self.window
    }

    /// Superseded scroll samples so far.
    pub fn coalesced_samples(&self) -> u64 {
        self.samples.cancelled()
    }

    // ===== Viewport Mutations =====

    /// Records a scroll observation; only changes are queued.
    pub fn observe(&mut self, sample: ScrollSample) {
        if sample.scroll_top != self.scroll_top || sample.content_height != self.content_height {
            self.samples.request(sample);
        }
    }

    /// Marks the window stale after the sequence or its heights changed.
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Recomputes the window from the latest sample.
    ///
    /// A recompute without a new sample means scrolling has stopped, so the
    /// buffer goes back to symmetric.
    ///
    /// # Returns
    /// `true` when the window was recomputed
    pub fn update_window(
        &mut self,
        offsets: &HeightOffsets,
        buffer_rows: usize,
        virtualization_threshold: usize,
    ) -> bool {
        let previous_top = self.scroll_top;
        let sampled = self.samples.on_frame(|sample| sample);
        if let Some(sample) = sampled {
            self.direction = ScrollDirection::from_delta(f64::from(previous_top), f64::from(sample.scroll_top));
            self.scroll_top = sample.scroll_top;
            self.content_height = sample.content_height;
        } else if self.stale {
            self.direction = ScrollDirection::None;
        } else {
            return false;
        }
        self.stale = false;

        let request = WindowRequest {
            scroll_top: f64::from(self.scroll_top),
            content_height: f64::from(self.content_height),
            buffer_rows,
            direction: self.direction,
            virtualization_threshold,
        };
        self.window = compute_window(offsets, &request);
        true
    }

    /// Queues a scroll that brings row `index` into view, if needed.
    pub fn reveal(&mut self, offsets: &HeightOffsets, index: usize) {
        let scroll_top = f64::from(self.scroll_top);
        let content_height = f64::from(self.content_height);
        if let Some(top) = scroll_to_reveal(offsets, index, scroll_top, content_height) {
            self.pending_scroll = Some(top as f32);
        }
    }

    /// Takes the queued programmatic scroll.
    pub fn take_scroll_request(&mut self) -> Option<f32> {
        self.pending_scroll.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(scroll_top: f32) -> ScrollSample {
        ScrollSample {
            scroll_top,
            content_height: 200.0,
        }
    }

    #[test]
    fn test_samples_coalesce() {
        let offsets = HeightOffsets::uniform(1000, 20.0);
        let mut viewport = ViewportState::new();
        viewport.observe(sample(100.0));
        viewport.observe(sample(300.0));
        viewport.observe(sample(400.0));

        assert!(viewport.update_window(&offsets, 10, 100));
        assert_eq!(viewport.coalesced_samples(), 2);
        assert_eq!(viewport.scroll_top(), 400.0);
        assert_eq!(viewport.direction(), ScrollDirection::Down);
        assert_eq!(viewport.window().fully_visible, 20..30);

        // Nothing new and not stale: no recompute
        assert!(!viewport.update_window(&offsets, 10, 100));
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let mut viewport = ViewportState::new();
        viewport.update_window(&HeightOffsets::uniform(10, 20.0), 10, 100);
        viewport.invalidate();
        assert!(viewport.update_window(&HeightOffsets::uniform(5, 20.0), 10, 100));
        assert_eq!(viewport.window().buffered, 0..5);
    }

    #[test]
    fn test_reveal_queues_scroll() {
        let offsets = HeightOffsets::uniform(100, 20.0);
        let mut viewport = ViewportState::new();
        viewport.observe(sample(0.0));
        viewport.observe(sample(0.0));
        viewport.update_window(&offsets, 10, 100);

        viewport.reveal(&offsets, 2);
        assert_eq!(viewport.take_scroll_request(), None);
        viewport.reveal(&offsets, 50);
        assert_eq!(viewport.take_scroll_request(), Some(51.0 * 20.0 - 200.0));
    }

    #[test]
    fn test_forced_recompute_drops_direction_bias() {
        let offsets = HeightOffsets::uniform(1000, 20.0);
        let mut viewport = ViewportState::new();
        viewport.observe(sample(400.0));
        viewport.update_window(&offsets, 10, 100);
        assert_eq!(viewport.direction(), ScrollDirection::Down);
        assert_eq!(viewport.window().buffered, 15..45);

        viewport.invalidate();
        assert!(viewport.update_window(&offsets, 10, 100));
        assert_eq!(viewport.direction(), ScrollDirection::None);
        assert_eq!(viewport.window().buffered, 10..40);
    }
}
