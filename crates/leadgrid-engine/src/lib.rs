// Engine module - pure grid state and derivation (no I/O, no network)
// This layer sits between entity snapshots (types) and the runtime/CLI presentation

pub mod column;
pub mod error;
pub mod export;
pub mod filter;
pub mod grid;
pub mod pagination;
pub mod query;
pub mod selection;
pub mod sort;

pub use column::{Accessor, CellKind, ColumnDescriptor, ColumnModel, ControlKind, HeaderSpec};
pub use error::{Error, Result};
pub use export::{CSV_MIME_TYPE, CsvDownload, export_file_name, rows_to_csv};
pub use filter::{DateRangePreset, FilterState, Predicate};
pub use grid::{
    BodyCell, BodyRow, CellContent, ColumnToggle, DataGrid, EmptyState, FilterChip, GridView,
    HeaderCell, PaginationView,
};
pub use pagination::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS, PaginationState, page_window};
pub use query::{QueryResult, compute};
pub use selection::SelectionState;
pub use sort::{SortDirective, SortIndicator, SortState, compare_directed, compare_values};
