//! Cumulative height offsets for the flattened sequence.
//!
//! Rows differ in height (nested grids, state rows), so the window math works
//! on a prefix-sum table instead of `index * row_height`.

use crate::config::Dimensions;
use crate::flatten::{RowKind, TableRow};

/// Per-row height override; `None` falls back to the kind's height.
pub type CustomHeightFn<'f, R> = dyn Fn(&TableRow<R>) -> Option<f32> + 'f;

/// Row height per entry kind, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowHeights {
    standard: f32,
    nested_grid: Option<f32>,
    state_row: Option<f32>,
}

impl RowHeights {
    /// Every kind uses `standard`.
    pub fn uniform(standard: f32) -> Self {
        Self {
            standard,
            nested_grid: None,
            state_row: None,
        }
    }

    pub fn new(standard: f32, nested_grid: Option<f32>, state_row: Option<f32>) -> Self {
        Self {
            standard,
            nested_grid,
            state_row,
        }
    }

    pub fn standard(&self) -> f32 {
        self.standard
    }

    /// Height of an entry of `kind`; missing entries use the standard height.
    pub fn height_of(&self, kind: &RowKind) -> f32 {
        let specific = match kind {
            RowKind::Data => None,
            RowKind::NestedGrid => self.nested_grid,
            RowKind::Loading | RowKind::Error { .. } | RowKind::Empty { .. } => self.state_row,
        };
        specific.unwrap_or(self.standard)
    }

    /// Height of one row, consulting `custom` first.
    ///
    /// Non-finite or negative custom heights are ignored.
    pub fn resolve<R>(&self, row: &TableRow<R>, custom: Option<&CustomHeightFn<'_, R>>) -> f32 {
        custom
            .and_then(|f| f(row))
            .filter(|h| h.is_finite() && *h >= 0.0)
            .unwrap_or_else(|| self.height_of(&row.kind))
    }
}

impl From<&Dimensions> for RowHeights {
    fn from(dimensions: &Dimensions) -> Self {
        Self::new(
            dimensions.row_height,
            dimensions.nested_grid_height,
            dimensions.state_row_height,
        )
    }
}

/// Prefix sums of row heights.
///
/// Entry `i` is the top edge of row `i`; one extra trailing entry holds the
/// total height. Sums are kept in `f64`: an `f32` accumulator stops adding
/// exactly past 2^24 px, which a table of a couple million rows reaches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeightOffsets {
    tops: Vec<f64>,
}

impl HeightOffsets {
    /// Computes offsets for a flattened sequence.
    ///
    /// # Arguments
    /// * `rows` - The flattened sequence
    /// * `heights` - Height per entry kind
    /// * `custom` - Optional per-row override
    pub fn compute<R>(
        rows: &[TableRow<R>],
        heights: &RowHeights,
        custom: Option<&CustomHeightFn<'_, R>>,
    ) -> Self {
        Self::from_heights(rows.iter().map(|row| heights.resolve(row, custom)))
    }

    /// Builds offsets from raw heights, in order.
    pub fn from_heights<I: IntoIterator<Item = f32>>(heights: I) -> Self {
        let heights = heights.into_iter();
        let mut tops = Vec::with_capacity(heights.size_hint().0 + 1);
        let mut acc = 0.0f64;
        tops.push(acc);
        for height in heights {
            acc += f64::from(height);
            tops.push(acc);
        }
        Self { tops }
    }

    /// `count` rows of `height` each.
    pub fn uniform(count: usize, height: f32) -> Self {
        Self::from_heights(std::iter::repeat(height).take(count))
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.tops.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-row top offsets, same length as the sequence.
    pub fn offsets(&self) -> &[f64] {
        &self.tops[..self.len()]
    }

    /// Top edge of row `index`; indices past the end clamp to the total height.
    pub fn offset(&self, index: usize) -> f64 {
        self.tops
            .get(index.min(self.len()))
            .copied()
            .unwrap_or(0.0)
    }

    /// Height of row `index` (0 past the end).
    pub fn height(&self, index: usize) -> f32 {
        if index >= self.len() {
            return 0.0;
        }
        (self.tops[index + 1] - self.tops[index]) as f32
    }

    pub fn total_height(&self) -> f64 {
        self.tops.last().copied().unwrap_or(0.0)
    }

    /// Index of the row containing `y`.
    ///
    /// Binary search over the tops. `y` below 0 maps to row 0, `y` past the
    /// end to the last row. Returns 0 for an empty sequence.
    pub fn index_at(&self, y: f64) -> usize {
        let rows = self.offsets();
        rows.partition_point(|&top| top <= y).saturating_sub(1)
    }

    /// Number of rows whose top edge lies strictly above `y`.
    pub fn rows_starting_before(&self, y: f64) -> usize {
        self.offsets().partition_point(|&top| top < y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::RowId;

    fn entry(kind: RowKind) -> TableRow<()> {
        TableRow {
            row: (),
            kind,
            depth: 0,
            row_id: RowId::root(),
            row_path: Vec::new(),
            row_index_path: Vec::new(),
            absolute_row_index: None,
            display_position: 0,
            grouping_key: None,
            is_last_group_row: false,
            is_expandable: false,
            is_expanded: false,
        }
    }

    #[test]
    fn test_offsets_are_prefix_sums() {
        let rows = vec![
            entry(RowKind::Data),
            entry(RowKind::NestedGrid),
            entry(RowKind::Loading),
            entry(RowKind::Data),
        ];
        let heights = RowHeights::new(20.0, Some(200.0), Some(30.0));
        let offsets = HeightOffsets::compute(&rows, &heights, None);

        assert_eq!(offsets.offsets(), &[0.0, 20.0, 220.0, 250.0]);
        assert_eq!(offsets.total_height(), 270.0);
        for i in 0..rows.len() {
            assert_eq!(offsets.offset(i + 1) - offsets.offset(i), f64::from(offsets.height(i)));
        }
    }

    #[test]
    fn test_missing_kind_height_falls_back() {
        let heights = RowHeights::uniform(24.0);
        assert_eq!(heights.height_of(&RowKind::NestedGrid), 24.0);
        assert_eq!(heights.height_of(&RowKind::Error { message: String::new() }), 24.0);
    }

    #[test]
    fn test_custom_height() {
        let rows = vec![entry(RowKind::Data), entry(RowKind::Data)];
        let heights = RowHeights::uniform(10.0);
        let custom = |row: &TableRow<()>| match row.kind {
            RowKind::Data => Some(f32::NAN),
            _ => None,
        };
        let offsets = HeightOffsets::compute(&rows, &heights, Some(&custom));
        assert_eq!(offsets.total_height(), 20.0);

        let tall = |_: &TableRow<()>| Some(50.0);
        let offsets = HeightOffsets::compute(&rows, &heights, Some(&tall));
        assert_eq!(offsets.total_height(), 100.0);
    }

    #[test]
    fn test_index_at() {
        let offsets = HeightOffsets::from_heights([10.0, 0.0, 30.0, 10.0]);
        assert_eq!(offsets.index_at(-5.0), 0);
        assert_eq!(offsets.index_at(0.0), 0);
        assert_eq!(offsets.index_at(9.9), 0);
        // Zero-height row 1 shares its top with row 2
        assert_eq!(offsets.index_at(10.0), 2);
        assert_eq!(offsets.index_at(45.0), 3);
        assert_eq!(offsets.index_at(1000.0), 3);
        assert_eq!(HeightOffsets::default().index_at(5.0), 0);
    }

    #[test]
    fn test_empty() {
        let offsets = HeightOffsets::from_heights(std::iter::empty());
        assert!(offsets.is_empty());
        assert_eq!(offsets.total_height(), 0.0);
        assert_eq!(offsets.offset(3), 0.0);
    }

    #[test]
    fn test_offsets_exact_past_f32_precision() {
        // 2M rows at 22px total 44M px, well past 2^24
        let offsets = HeightOffsets::uniform(2_000_000, 22.0);
        assert_eq!(offsets.total_height(), 44_000_000.0);

        let mismatched = (0..offsets.len())
            .find(|&i| offsets.offset(i + 1) - offsets.offset(i) != 22.0 || offsets.height(i) != 22.0);
        assert_eq!(mismatched, None);

        assert_eq!(offsets.index_at(1_900_000.0 * 22.0), 1_900_000);
        assert_eq!(offsets.index_at(1_900_000.0 * 22.0 - 0.5), 1_899_999);
    }
}
