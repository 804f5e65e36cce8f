//! Error types for configuration validation.
//!
//! The render path never fails: malformed input degrades to a best-effort
//! result. Only structurally impossible configuration is rejected, and it is
//! rejected here, before any of it reaches the flattener or the window math.

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors produced when validating table configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Rows per page must be at least one.
    #[error("rows per page must be greater than zero")]
    ZeroPageSize,

    /// A row height is zero, negative or not a number.
    #[error("row height '{name}' must be positive, got {value}")]
    NonPositiveHeight { name: &'static str, value: f32 },

    /// A grouping level names an empty collection.
    #[error("grouping level {level} has an empty collection name")]
    EmptyGroupingName { level: usize },

    /// The nested grid level does not exist in the grouping spec.
    #[error("nested grid level {level} is outside the grouping spec ({levels} levels)")]
    NestedGridOutOfRange { level: usize, levels: usize },
}

impl ConfigError {
    /// Create a height error.
    pub fn non_positive_height(name: &'static str, value: f32) -> Self {
        Self::NonPositiveHeight { name, value }
    }
}
