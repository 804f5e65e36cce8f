//! Utility modules for the table viewer.

pub mod formatting;

pub use formatting::{format_cell_value, format_count, format_memory_mb, get_current_memory_mb};
