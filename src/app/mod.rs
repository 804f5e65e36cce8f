//! Application-level modules for the table viewer.
//!
//! Contains the coordinators and the centralized state they act on.

mod app_state;
mod application_coordinator;
mod theme_coordinator;
mod settings_coordinator;

pub use app_state::AppState;
pub use application_coordinator::{ApplicationCoordinator, RowAction};
pub use theme_coordinator::ThemeCoordinator;
pub use settings_coordinator::{SettingsCoordinator, ANIMATIONS_KEY, LAYOUT_KEY};
