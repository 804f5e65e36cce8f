//! Rendering subsystem for drawing table rows
//!
//! - Row rendering (data rows, state rows, nested grids)
//! - Text utilities (text measurement and truncation)

pub mod row_renderer;
pub mod text_utils;
