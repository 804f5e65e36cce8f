//! State management modules for the table viewer.
//!
//! This module contains state-only logic (no UI concerns):
//! - Table state (dataset, flattened rows, page, staged transitions)
//! - Viewport state (scroll position, render window)
//! - Selection state (selected row)
//! - Theme state (theme manager, current theme)
//! - Layout state (column widths)

mod table_state;
mod viewport;
mod selection;
mod theme_state;
mod layout_state;

pub use table_state::TableState;
pub use viewport::{ScrollSample, ViewportState};
pub use selection::SelectionState;
pub use theme_state::ThemeState;
pub use layout_state::LayoutState;
