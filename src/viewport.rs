//! Viewport window calculation.
//!
//! Answers two questions for a scroll position:
//! - which rows cover the viewport (`fully_visible`)
//! - which rows to actually render (`buffered`), padded with extra rows
//!   biased toward the scroll direction
//!
//! Lookups are binary searches over [`HeightOffsets`]; nothing rescans the
//! sequence on a scroll tick.

use crate::offsets::HeightOffsets;
use std::ops::Range;

/// Direction of the last scroll movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollDirection {
    Up,
    Down,
    #[default]
    None,
}

impl ScrollDirection {
    /// Derives the direction from two successive scroll tops.
    pub fn from_delta(previous_top: f64, current_top: f64) -> Self {
        if current_top > previous_top {
            ScrollDirection::Down
        } else if current_top < previous_top {
            ScrollDirection::Up
        } else {
            ScrollDirection::None
        }
    }
}

/// Scroll position and window settings for one computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRequest {
    pub scroll_top: f64,
    pub content_height: f64,
    pub buffer_rows: usize,
    pub direction: ScrollDirection,
    /// Sequences shorter than this are rendered in full
    pub virtualization_threshold: usize,
}

/// Index ranges over the flattened sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WindowRanges {
    pub fully_visible: Range<usize>,
    pub buffered: Range<usize>,
}

impl WindowRanges {
    /// Space above and below the buffered range, for placeholder padding.
    pub fn padding(&self, offsets: &HeightOffsets) -> (f32, f32) {
        let top = offsets.offset(self.buffered.start);
        let bottom = offsets.total_height() - offsets.offset(self.buffered.end);
        (top as f32, bottom.max(0.0) as f32)
    }
}

/// Largest valid scroll top.
pub fn max_scroll_top(offsets: &HeightOffsets, content_height: f64) -> f64 {
    (offsets.total_height() - content_height).max(0.0)
}

/// Rows covering `[scroll_top, scroll_top + content_height)`.
///
/// Starts at the row containing `scroll_top` and ends before the first row
/// whose top is at or past the bottom edge. The scroll top is clamped to the
/// scrollable range first.
pub fn fully_visible_range(offsets: &HeightOffsets, scroll_top: f64, content_height: f64) -> Range<usize> {
    if offsets.is_empty() {
        return 0..0;
    }
    let content_height = content_height.max(0.0);
    let scroll_top = clamp_scroll(scroll_top, offsets, content_height);
    let start = offsets.index_at(scroll_top);
    let end = offsets.rows_starting_before(scroll_top + content_height);
    start..end.max(start + 1).min(offsets.len())
}

/// Computes both ranges for one scroll position.
///
/// The buffered range extends `buffer + buffer / 2` rows ahead of the scroll
/// direction and `buffer / 2` behind it, or `buffer` on both sides when not
/// scrolling. Both ranges stay inside `0..offsets.len()`.
pub fn compute_window(offsets: &HeightOffsets, request: &WindowRequest) -> WindowRanges {
    let len = offsets.len();
    let fully_visible = fully_visible_range(offsets, request.scroll_top, request.content_height);

    let buffered = if len < request.virtualization_threshold {
        0..len
    } else {
        let buffer = request.buffer_rows;
        let (before, after) = match request.direction {
            ScrollDirection::Down => (buffer / 2, buffer + buffer / 2),
            ScrollDirection::Up => (buffer + buffer / 2, buffer / 2),
            ScrollDirection::None => (buffer, buffer),
        };
        fully_visible.start.saturating_sub(before)..fully_visible.end.saturating_add(after).min(len)
    };

    tracing::trace!(
        scroll_top = request.scroll_top,
        visible = ?fully_visible,
        buffered = ?buffered,
        "window recomputed"
    );

    WindowRanges {
        fully_visible,
        buffered,
    }
}

/// Scroll top that brings row `index` into view.
///
/// Returns `None` when the row is already in the fully visible range.
/// Otherwise aligns the row to the top edge when it lies above the viewport
/// and to the bottom edge when it lies below. Out-of-range indices clamp to
/// the last row.
pub fn scroll_to_reveal(
    offsets: &HeightOffsets,
    index: usize,
    scroll_top: f64,
    content_height: f64,
) -> Option<f64> {
    if offsets.is_empty() {
        return None;
    }
    let index = index.min(offsets.len() - 1);
    let visible = fully_visible_range(offsets, scroll_top, content_height);
    if visible.contains(&index) {
        return None;
    }

    let top = offsets.offset(index);
    let target = if index < visible.start {
        top
    } else {
        top + f64::from(offsets.height(index)) - content_height
    };
    Some(target.clamp(0.0, max_scroll_top(offsets, content_height)))
}

fn clamp_scroll(scroll_top: f64, offsets: &HeightOffsets, content_height: f64) -> f64 {
    if scroll_top.is_nan() {
        return 0.0;
    }
    scroll_top.clamp(0.0, max_scroll_top(offsets, content_height))
}
