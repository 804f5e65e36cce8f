//! Combined sort and filter order handed to the flattener.

use crate::domain::filtering::TextFilter;
use crate::domain::sorting::{sort_indices, SortSpec};
use rtable::{RowData, SiblingOrder};

/// User-selected view of the table: what the sort and filter controls say.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSpec {
    pub sort: Option<SortSpec>,
    pub filter: String,
}

impl ViewSpec {
    pub fn is_natural(&self) -> bool {
        self.sort.is_none() && TextFilter::new(&self.filter).is_none()
    }

    /// Builds the sibling order, or `None` for natural order.
    pub fn order<'a>(&self, grouping: &'a [String], columns: &'a [String]) -> Option<ViewOrder<'a>> {
        if self.is_natural() {
            return None;
        }
        Some(ViewOrder {
            sort: self.sort.clone(),
            filter: TextFilter::new(&self.filter),
            grouping,
            columns,
        })
    }
}

/// Filters, then stably sorts, each sibling collection.
pub struct ViewOrder<'a> {
    sort: Option<SortSpec>,
    filter: Option<TextFilter>,
    grouping: &'a [String],
    columns: &'a [String],
}

impl<R: RowData> SiblingOrder<R> for ViewOrder<'_> {
    fn sibling_indices(&self, siblings: &[R], depth: usize) -> Option<Vec<usize>> {
        let mut indices: Vec<usize> = match &self.filter {
            Some(filter) => (0..siblings.len())
                .filter(|&i| filter.matches_subtree(&siblings[i], depth, self.grouping, self.columns))
                .collect(),
            None => (0..siblings.len()).collect(),
        };
        if let Some(spec) = &self.sort {
            sort_indices(siblings, &mut indices, spec);
        }
        Some(indices)
    }
}
