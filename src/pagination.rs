//! Client-side pagination of the flattened sequence.
//!
//! Pages count data rows only. Synthetic entries travel with the data row
//! they follow, so a page is always a contiguous slice of the sequence.

use crate::error::{ConfigError, Result};
use crate::flatten::TableRow;
use std::num::NonZeroUsize;
use std::ops::Range;

/// Rows per page, validated non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(NonZeroUsize);

impl PageSize {
    /// # Errors
    /// [`ConfigError::ZeroPageSize`] for `0`.
    pub fn new(rows_per_page: usize) -> Result<Self> {
        NonZeroUsize::new(rows_per_page)
            .map(PageSize)
            .ok_or(ConfigError::ZeroPageSize)
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

/// Who paginates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationMode {
    /// Everything on one page
    #[default]
    Disabled,
    /// Sliced here
    Client(PageSize),
    /// The data owner already paginated; rows pass through
    Server,
}

/// One page of the flattened sequence.
#[derive(Debug)]
pub struct Page<'r, R> {
    pub rows: &'r [TableRow<R>],
    /// Position of `rows` inside the full sequence
    pub range: Range<usize>,
    /// Page actually shown, after clamping
    pub page: usize,
    pub page_count: usize,
}

/// Number of pages for `data_rows` rows; at least one.
pub fn page_count(data_rows: usize, size: PageSize) -> usize {
    data_rows.div_ceil(size.get()).max(1)
}

/// Default data-row predicate: application rows, not synthetic entries.
pub fn is_data_row<R>(row: &TableRow<R>) -> bool {
    row.kind.is_data()
}

/// Leaf-only predicate for grouped tables where parents are pure containers.
pub fn is_leaf_data_row<R>(row: &TableRow<R>) -> bool {
    row.kind.is_data() && !row.is_expandable
}

/// Returns the requested page.
///
/// Pages are 0-based; out-of-range pages clamp to the last one. Entries
/// before the first data row belong to page 0.
///
/// # Arguments
/// * `rows` - The flattened sequence
/// * `mode` - Pagination mode; anything but `Client` returns all rows
/// * `page` - Requested page
/// * `is_data` - Which entries count toward the page size
pub fn paginate<'r, R, F>(rows: &'r [TableRow<R>], mode: PaginationMode, page: usize, is_data: F) -> Page<'r, R>
where
    F: Fn(&TableRow<R>) -> bool,
{
    let PaginationMode::Client(size) = mode else {
        return Page {
            rows,
            range: 0..rows.len(),
            page: 0,
            page_count: 1,
        };
    };

    let data_positions: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| is_data(*row))
        .map(|(i, _)| i)
        .collect();

    let pages = page_count(data_positions.len(), size);
    let page = page.min(pages - 1);
    let first = page * size.get();
    let next = first + size.get();

    let start = if page == 0 {
        0
    } else {
        data_positions.get(first).copied().unwrap_or(rows.len())
    };
    let end = data_positions.get(next).copied().unwrap_or(rows.len());

    Page {
        rows: &rows[start..end],
        range: start..end,
        page,
        page_count: pages,
    }
}
