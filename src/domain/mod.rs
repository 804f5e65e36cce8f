//! Domain logic modules for the table viewer.
//!
//! - Sorting (per-group column ordering)
//! - Filtering (text match over a row and its descendants)
//! - View order (sort and filter combined into one sibling order)

pub mod sorting;
pub mod filtering;
pub mod view_order;
