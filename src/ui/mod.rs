//! UI panel rendering subsystem
//!
//! - Header panel (file controls, tree controls, filter, paging, theme)
//! - Table panel (column header and virtualized rows)
//! - Table header component (sortable, resizable column headers)
//! - Status bar (dataset summary)
//! - Panel manager (panel orchestration and layout)

pub mod header;
pub mod table_panel;
pub mod status_bar;
pub mod table_header;
pub mod panel_manager;
