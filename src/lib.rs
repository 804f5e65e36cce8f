pub mod traits;
pub mod identity;
pub mod expansion;
pub mod row_state;
pub mod flatten;
pub mod offsets;
pub mod viewport;
pub mod pagination;
pub mod transition;
pub mod scheduler;
pub mod error;
pub mod config;
pub mod dataset;
pub mod virtual_dataset;
pub mod theme;

// Export row model
pub use traits::RowData;
pub use identity::{attribute_key, resolve_row_id, PathSegment, RowId, RowIdContext, RowIdFn, RowKey};

// Export flattening pipeline
pub use expansion::ExpansionState;
pub use row_state::{RowRuntimeState, RowStateStore};
pub use flatten::{flatten_rows, FlattenOptions, FlattenedRows, RowKind, SiblingOrder, TableRow};

// Export layout and windowing
pub use offsets::{HeightOffsets, RowHeights};
pub use viewport::{compute_window, scroll_to_reveal, ScrollDirection, WindowRanges, WindowRequest};
pub use pagination::{paginate, Page, PageSize, PaginationMode};

// Export transitions and scheduling
pub use transition::{stage_transition, EntryKey, StageOutcome, StagedTransition, TransitionStager, TransitionStatus};
pub use scheduler::{FrameCoalescer, TwoPhaseScheduler};

// Export configuration
pub use config::{StateRenderers, TableConfig, ValidatedConfig};
pub use error::ConfigError;

// Export datasets
pub use dataset::{read_dataset, write_dataset, Dataset, DatasetWriter};
pub use virtual_dataset::VirtualDatasetConfig;

// Export theme support
pub use theme::{Theme, ThemeColors, ThemeManager, hex_to_color32};
