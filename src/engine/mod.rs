//! Tabular data presentation engine
//!
//! Takes caller-owned rows plus column and facet declarations and produces a
//! searched, filtered, sorted, paginated, selectable and exportable view.
//! Nothing here renders; [`table::TableView`] hands a [`table::TableViewModel`]
//! to whatever draws it.

pub mod column;
pub mod comparator;
pub mod export;
pub mod filter;
pub mod pagination;
pub mod persistence;
pub mod selection;
pub mod table;
pub mod value;
pub mod visibility;

pub use column::{Align, Column};
pub use comparator::{build_comparator, SortOrder};
pub use export::{build_file_name, ExportArtifact, ExportFormat};
pub use filter::{ActiveFilters, FacetOption, FilterFacet};
pub use pagination::{PageRequest, Pagination, RemotePage};
pub use persistence::{
    FileStore, MemoryStore, PersistedSnapshot, PersistenceAdapter, PersistenceError,
    PreferenceStore,
};
pub use selection::{PageSelection, SelectionTracker};
pub use table::{
    EmptyState, Notification, PageRow, TableMode, TableOptions, TableView, TableViewModel,
    TableViewState, ToolbarAction,
};
pub use value::{Row, RowId, Value};
pub use visibility::ColumnVisibility;
