//! Settings persistence through eframe storage.
//!
//! Values are stored as JSON strings. A stored value that no longer parses
//! (the type changed between versions) is logged and replaced by the default.

use serde::{Deserialize, Serialize};

/// Storage key of the persisted layout.
pub const LAYOUT_KEY: &str = "table_layout";

/// Storage key of the animation toggle.
pub const ANIMATIONS_KEY: &str = "animations_enabled";

/// Coordinates typed settings persistence.
pub struct SettingsCoordinator;

impl SettingsCoordinator {
    /// Loads a setting, returning `None` if it is missing or invalid.
    ///
    /// # Arguments
    /// * `storage` - The eframe storage interface
    /// * `key` - The storage key for this setting
    pub fn try_load_setting<T>(storage: Option<&dyn eframe::Storage>, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let json_str = storage?.get_string(key)?;
        match serde_json::from_str(&json_str) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, %err, "ignoring invalid stored setting");
                None
            }
        }
    }

    /// Loads a setting with an explicit fallback.
    pub fn load_setting_or<T>(storage: Option<&dyn eframe::Storage>, key: &str, default: T) -> T
    where
        T: for<'de> Deserialize<'de>,
    {
        Self::try_load_setting(storage, key).unwrap_or(default)
    }

    /// Saves a setting.
    ///
    /// # Examples
    /// ```ignore
    /// SettingsCoordinator::save_setting(storage, LAYOUT_KEY, &state.layout);
    /// ```
    pub fn save_setting<T>(storage: &mut dyn eframe::Storage, key: &str, value: &T)
    where
        T: Serialize,
    {
        match serde_json::to_string(value) {
            Ok(json_str) => storage.set_string(key, json_str),
            Err(err) => tracing::warn!(key, %err, "failed to serialize setting"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LayoutState;
    use std::collections::HashMap;

    /// In-memory storage
    #[derive(Default)]
    struct MockStorage {
        data: HashMap<String, String>,
    }

    impl eframe::Storage for MockStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.data.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.data.insert(key.to_string(), value);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn test_save_and_load_layout() {
        let mut storage = MockStorage::default();
        let mut layout = LayoutState::new();
        layout.resize_column("product", 35.0);

        SettingsCoordinator::save_setting(&mut storage, LAYOUT_KEY, &layout);
        let loaded: LayoutState = SettingsCoordinator::load_setting_or(Some(&storage), LAYOUT_KEY, LayoutState::new());
        assert_eq!(loaded.column_width("product"), layout.column_width("product"));
    }

    #[test]
    fn test_missing_and_invalid_fall_back() {
        let mut storage = MockStorage::default();
        assert!(SettingsCoordinator::load_setting_or(Some(&storage), ANIMATIONS_KEY, true));

        storage.data.insert(ANIMATIONS_KEY.to_string(), "\"yes\"".to_string());
        let loaded: Option<bool> = SettingsCoordinator::try_load_setting(Some(&storage), ANIMATIONS_KEY);
        assert_eq!(loaded, None);
        assert!(SettingsCoordinator::load_setting_or(None, ANIMATIONS_KEY, true));
    }
}
