//! Table configuration and boundary validation.
//!
//! `TableConfig` is what hosts write (JSON, every field optional).
//! `ValidatedConfig` is what the pipeline consumes: structurally impossible
//! values are rejected once, here, so the render path can assume sane input.

use crate::error::{ConfigError, Result};
use crate::expansion::ExpansionState;
use crate::offsets::RowHeights;
use crate::pagination::{PageSize, PaginationMode};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Standard row height in pixels when neither config nor theme sets one.
pub const DEFAULT_ROW_HEIGHT: f32 = 22.0;

/// Rows rendered beyond the visible range, split by scroll direction.
pub const DEFAULT_BUFFER_ROWS: usize = 10;

/// Sequences shorter than this render in full.
pub const DEFAULT_VIRTUALIZATION_THRESHOLD: usize = 100;

/// Which inline state renderers the host has registered.
///
/// A state row is only injected when its renderer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateRenderers {
    pub loading: bool,
    pub error: bool,
    pub empty: bool,
}

impl Default for StateRenderers {
    fn default() -> Self {
        Self {
            loading: true,
            error: true,
            empty: true,
        }
    }
}

impl StateRenderers {
    /// No renderers registered; state rows are never injected.
    pub const NONE: StateRenderers = StateRenderers {
        loading: false,
        error: false,
        empty: false,
    };
}

/// Row height dimensions in pixels.
///
/// Missing entries fall back to `row_height`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dimensions {
    pub row_height: f32,
    pub nested_grid_height: Option<f32>,
    pub state_row_height: Option<f32>,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            row_height: DEFAULT_ROW_HEIGHT,
            nested_grid_height: None,
            state_row_height: None,
        }
    }
}

impl Dimensions {
    fn validate(&self) -> Result<()> {
        let entries = [
            ("row_height", Some(self.row_height)),
            ("nested_grid_height", self.nested_grid_height),
            ("state_row_height", self.state_row_height),
        ];
        for (name, value) in entries {
            if let Some(value) = value {
                // NaN fails this comparison too
                if !(value > 0.0) || !value.is_finite() {
                    return Err(ConfigError::non_positive_height(name, value));
                }
            }
        }
        Ok(())
    }
}

/// Host-facing table configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Child-collection name per nesting level
    pub grouping: Vec<String>,
    /// Level whose children are shown as one nested grid instead of rows
    pub nested_grid_level: Option<usize>,
    /// Expand every level on load
    pub expand_all: bool,
    /// Depths expanded on load when `expand_all` is off
    pub initial_expanded_depths: Vec<usize>,
    /// Overrides the theme's dimensions when set
    pub dimensions: Option<Dimensions>,
    pub buffer_row_count: usize,
    pub virtualization_threshold: usize,
    /// Client-side page size; `None` disables pagination
    pub rows_per_page: Option<usize>,
    /// Pagination is done by the data owner; rows pass through untouched
    pub server_side_pagination: bool,
    pub animations_enabled: bool,
    /// Attribute used as the row key; positional keys when unset
    pub id_attribute: Option<String>,
    pub state_renderers: StateRenderers,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            grouping: Vec::new(),
            nested_grid_level: None,
            expand_all: false,
            initial_expanded_depths: Vec::new(),
            dimensions: None,
            buffer_row_count: DEFAULT_BUFFER_ROWS,
            virtualization_threshold: DEFAULT_VIRTUALIZATION_THRESHOLD,
            rows_per_page: None,
            server_side_pagination: false,
            animations_enabled: true,
            id_attribute: None,
            state_renderers: StateRenderers::default(),
        }
    }
}

impl TableConfig {
    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        serde_json::from_str(text).context("Failed to parse table configuration")
    }

    /// Loads a configuration file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Per-user config location: `<config_dir>/rtable/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("rtable").join("config.json"))
    }

    /// Checks the configuration at the boundary.
    ///
    /// # Errors
    /// Zero rows per page, non-positive row heights, empty grouping names
    /// and a nested grid level outside the grouping spec are rejected.
    pub fn validate(self) -> Result<ValidatedConfig> {
        if let Some(level) = self.grouping.iter().position(|name| name.is_empty()) {
            return Err(ConfigError::EmptyGroupingName { level });
        }
        if let Some(level) = self.nested_grid_level {
            if level >= self.grouping.len() {
                return Err(ConfigError::NestedGridOutOfRange {
                    level,
                    levels: self.grouping.len(),
                });
            }
        }
        if let Some(dimensions) = &self.dimensions {
            dimensions.validate()?;
        }
        let page_size = self.rows_per_page.map(PageSize::new).transpose()?;

        Ok(ValidatedConfig {
            config: self,
            page_size,
        })
    }
}

/// Configuration that passed [`TableConfig::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    config: TableConfig,
    page_size: Option<PageSize>,
}

impl Default for ValidatedConfig {
    /// The default configuration, which has no page size to check.
    fn default() -> Self {
        Self {
            config: TableConfig::default(),
            page_size: None,
        }
    }
}

impl ValidatedConfig {
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn grouping(&self) -> &[String] {
        &self.config.grouping
    }

    pub fn page_size(&self) -> Option<PageSize> {
        self.page_size
    }

    pub fn pagination_mode(&self) -> PaginationMode {
        match self.page_size {
            _ if self.config.server_side_pagination => PaginationMode::Server,
            Some(size) => PaginationMode::Client(size),
            None => PaginationMode::Disabled,
        }
    }

    /// Expansion state to start from after loading data.
    pub fn initial_expansion(&self) -> ExpansionState {
        ExpansionState::initial(
            self.config.grouping.len(),
            self.config.expand_all,
            &self.config.initial_expanded_depths,
        )
    }

    /// Row heights, preferring configured dimensions over the theme's.
    pub fn row_heights(&self, theme_dimensions: &Dimensions) -> RowHeights {
        let dimensions = self.config.dimensions.as_ref().unwrap_or(theme_dimensions);
        RowHeights::from(dimensions)
    }
}
