//! Table orchestrator
//!
//! [`TableView`] owns one table's [`TableViewState`] and the caller's rows
//! and columns. Every operation is an explicit command: it updates the state,
//! re-runs the `filter -> sort -> paginate` pipeline when one of its inputs
//! changed, saves preferences when a persisted field changed, and returns the
//! notifications the caller should handle.

use super::column::{declared_columns, Column};
use super::comparator::{sort_indices, SortOrder};
use super::export::{self, ExportArtifact, ExportFormat};
use super::filter::{self, ActiveFilters, FilterFacet};
use super::pagination::{PageRequest, Pagination, RemotePage};
use super::persistence::{PersistedSnapshot, PersistenceAdapter, PreferenceStore};
use super::selection::{PageSelection, SelectionTracker};
use super::value::{Row, RowId, Value};
use super::visibility::ColumnVisibility;
use log::debug;
use serde::Deserialize;
use std::collections::BTreeSet;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_PAGE_SIZE_OPTIONS: [usize; 4] = [5, 10, 25, 50];

// ═══════════════════════════════════════════════════════════════════════════════
// Options
// ═══════════════════════════════════════════════════════════════════════════════

/// Descriptor for the state shown when the table has no rows
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct EmptyState {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub action_label: Option<String>,
}

/// A caller-declared toolbar button
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ToolbarAction {
    pub label: String,
}

/// Everything the caller declares when creating a table
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Title used for export file names
    pub title: String,
    pub columns: Vec<Column>,
    pub filters: Vec<FilterFacet>,
    pub persist_key: Option<String>,
    pub default_sort_field: Option<String>,
    pub default_sort_order: SortOrder,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    /// Present when the caller pages on the server side
    pub remote_page: Option<RemotePage>,
    pub empty_state: Option<EmptyState>,
    pub toolbar_actions: Vec<ToolbarAction>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            columns: Vec::new(),
            filters: Vec::new(),
            persist_key: None,
            default_sort_field: None,
            default_sort_order: SortOrder::Asc,
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
            remote_page: None,
            empty_state: None,
            toolbar_actions: Vec::new(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// State
// ═══════════════════════════════════════════════════════════════════════════════

/// Something the caller should react to
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    SelectionChanged(Vec<RowId>),
    Search(String),
    /// External mode: the caller should load this page
    PageChange(usize),
    /// External mode: the caller should change the page size
    RowsPerPageChange(usize),
}

impl From<PageRequest> for Notification {
    fn from(request: PageRequest) -> Self {
        match request {
            PageRequest::Page(page) => Notification::PageChange(page),
            PageRequest::RowsPerPage(size) => Notification::RowsPerPageChange(size),
        }
    }
}

/// Which body the table renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableMode {
    Loading,
    Empty,
    Populated,
}

/// The entire mutable state of one table instance
#[derive(Debug, Clone)]
pub struct TableViewState {
    pub order_by: String,
    pub order: SortOrder,
    pub selection: SelectionTracker,
    pub pagination: Pagination,
    pub search_query: String,
    pub active_filters: ActiveFilters,
    pub expanded: BTreeSet<RowId>,
    pub visibility: ColumnVisibility,
}

/// A row on the current page
#[derive(Debug, Clone)]
pub struct PageRow<'a> {
    pub id: RowId,
    pub row: &'a Row,
    pub selected: bool,
    pub expanded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSummary {
    pub selected_count: usize,
    pub page_state: PageSelection,
}

/// Derived view handed to the rendering layer
#[derive(Debug, Clone)]
pub struct TableViewModel<'a> {
    pub mode: TableMode,
    pub visible_columns: Vec<&'a Column>,
    pub page_rows: Vec<PageRow<'a>>,
    /// Number of skeleton rows to draw while loading
    pub placeholder_rows: usize,
    pub selection: SelectionSummary,
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
    pub rows_per_page: usize,
    pub row_count_label: String,
    pub order_by: &'a str,
    pub order: SortOrder,
    pub empty_state: Option<&'a EmptyState>,
    pub toolbar_actions: Vec<&'a ToolbarAction>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TableView
// ═══════════════════════════════════════════════════════════════════════════════

pub struct TableView {
    options: TableOptions,
    rows: Vec<Row>,
    loading: bool,
    state: TableViewState,
    persistence: PersistenceAdapter,
    last_saved: Option<PersistedSnapshot>,
    /// Indices into `rows` after filtering and sorting
    processed: Vec<usize>,
}

impl TableView {
    /// Create a table, seeding state from the persisted snapshot when one
    /// exists under `options.persist_key`, else from the option defaults.
    pub fn new(options: TableOptions, store: Option<Box<dyn PreferenceStore>>) -> Self {
        let persistence = PersistenceAdapter::new(options.persist_key.clone(), store);
        let restored = persistence.load();

        let default_page_size = if options.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            options.page_size
        };

        let (order, order_by, rows_per_page, active_filters, visibility) = match &restored {
            Some(snapshot) => (
                snapshot.order,
                snapshot.order_by.clone(),
                if snapshot.rows_per_page > 0 {
                    snapshot.rows_per_page
                } else {
                    default_page_size
                },
                snapshot.filters.clone(),
                ColumnVisibility::restore(snapshot.hidden_columns.clone(), &options.columns),
            ),
            None => (
                options.default_sort_order,
                options.default_sort_field.clone().unwrap_or_default(),
                default_page_size,
                ActiveFilters::new(),
                ColumnVisibility::new(),
            ),
        };

        let pagination = match options.remote_page {
            Some(remote) => Pagination::external(remote),
            None => Pagination::internal(rows_per_page),
        };

        let mut table = Self {
            options,
            rows: Vec::new(),
            loading: false,
            state: TableViewState {
                order_by,
                order,
                selection: SelectionTracker::new(),
                pagination,
                search_query: String::new(),
                active_filters,
                expanded: BTreeSet::new(),
                visibility,
            },
            persistence,
            last_saved: restored,
            processed: Vec::new(),
        };

        table.ensure_sort_field();
        table.rederive();
        table.persist_if_changed();
        table
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> &TableViewState {
        &self.state
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn columns(&self) -> &[Column] {
        &self.options.columns
    }

    pub fn facets(&self) -> &[FilterFacet] {
        &self.options.filters
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn mode(&self) -> TableMode {
        if self.loading {
            TableMode::Loading
        } else if self.rows.is_empty() && self.options.empty_state.is_some() {
            TableMode::Empty
        } else {
            TableMode::Populated
        }
    }

    pub fn visible_columns(&self) -> Vec<&Column> {
        self.state.visibility.visible_columns(&self.options.columns)
    }

    /// Filtered and sorted rows, across all pages
    pub fn processed_rows(&self) -> Vec<&Row> {
        self.processed.iter().map(|&i| &self.rows[i]).collect()
    }

    pub fn filtered_count(&self) -> usize {
        self.processed.len()
    }

    pub fn page_ids(&self) -> Vec<RowId> {
        self.page_indices()
            .iter()
            .map(|&i| self.rows[i].id_or_index(i))
            .collect()
    }

    pub fn selected_ids(&self) -> Vec<RowId> {
        self.state.selection.ids()
    }

    pub fn row_count_label(&self) -> String {
        self.state.pagination.label(self.processed.len())
    }

    pub fn page_count(&self) -> usize {
        self.state.pagination.page_count(self.processed.len())
    }

    /// Toolbar actions to render. In the empty state an action sharing its
    /// label with the empty-state action is suppressed.
    pub fn toolbar_actions(&self) -> Vec<&ToolbarAction> {
        let duplicate = match (self.mode(), &self.options.empty_state) {
            (TableMode::Empty, Some(empty)) => empty.action_label.as_deref(),
            _ => None,
        };
        self.options
            .toolbar_actions
            .iter()
            .filter(|action| Some(action.label.as_str()) != duplicate)
            .collect()
    }

    /// Durable subset of the current state
    pub fn snapshot(&self) -> PersistedSnapshot {
        PersistedSnapshot {
            order: self.state.order,
            order_by: self.state.order_by.clone(),
            rows_per_page: self.state.pagination.rows_per_page(),
            filters: self.state.active_filters.clone(),
            hidden_columns: self.state.visibility.hidden().cloned().collect(),
        }
    }

    pub fn view(&self) -> TableViewModel<'_> {
        let mode = self.mode();
        let page_rows: Vec<PageRow<'_>> = if mode == TableMode::Populated {
            self.page_indices()
                .iter()
                .map(|&i| {
                    let id = self.rows[i].id_or_index(i);
                    PageRow {
                        selected: self.state.selection.is_selected(&id),
                        expanded: self.state.expanded.contains(&id),
                        row: &self.rows[i],
                        id,
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        let page_ids: Vec<RowId> = page_rows.iter().map(|r| r.id.clone()).collect();
        let pagination = &self.state.pagination;

        TableViewModel {
            mode,
            visible_columns: self.visible_columns(),
            placeholder_rows: if mode == TableMode::Loading {
                pagination.rows_per_page()
            } else {
                0
            },
            selection: SelectionSummary {
                selected_count: self.state.selection.len(),
                page_state: self.state.selection.page_state(&page_ids),
            },
            page_rows,
            total: pagination.total(self.processed.len()),
            page: pagination.page(),
            page_count: self.page_count(),
            rows_per_page: pagination.rows_per_page(),
            row_count_label: self.row_count_label(),
            order_by: &self.state.order_by,
            order: self.state.order,
            empty_state: if mode == TableMode::Empty {
                self.options.empty_state.as_ref()
            } else {
                None
            },
            toolbar_actions: self.toolbar_actions(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the caller's rows. Selection and expansion are reconciled
    /// against the new ids.
    pub fn set_rows(&mut self, rows: Vec<Row>) -> Vec<Notification> {
        self.rows = rows;
        self.rederive();

        let valid: BTreeSet<RowId> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| row.id_or_index(i))
            .collect();
        self.state.expanded.retain(|id| valid.contains(id));

        match self.state.selection.reconcile(&valid) {
            Some(ids) => vec![Notification::SelectionChanged(ids)],
            None => Vec::new(),
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Replace the column declarations. Hidden entries for removed columns
    /// are pruned and the sort field falls back if it disappeared.
    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.options.columns = columns;
        self.state.visibility.prune(&self.options.columns);
        self.ensure_sort_field();
        self.rederive();
        self.persist_if_changed();
    }

    /// Update the caller-owned page state in external mode
    pub fn set_remote_page(&mut self, remote: RemotePage) -> bool {
        self.state.pagination.update_remote(remote)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sorting
    // ─────────────────────────────────────────────────────────────────────────

    /// Sort by `field`: the active field flips direction, a new field starts
    /// ascending. Hidden, unknown and non-sortable fields are rejected.
    pub fn request_sort(&mut self, field: &str) -> bool {
        let order = if self.state.order_by == field {
            self.state.order.toggled()
        } else {
            SortOrder::Asc
        };
        self.set_sort(field, order)
    }

    pub fn set_sort(&mut self, field: &str, order: SortOrder) -> bool {
        let sortable = self
            .visible_columns()
            .iter()
            .any(|c| c.field == field && c.sortable);
        if !sortable {
            debug!("Ignoring sort request for field '{}'", field);
            return false;
        }
        if self.state.order_by == field && self.state.order == order {
            return false;
        }

        self.state.order_by = field.to_string();
        self.state.order = order;
        self.rederive();
        self.persist_if_changed();
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search & filters
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_search(&mut self, query: &str) -> Vec<Notification> {
        if self.state.search_query == query {
            return Vec::new();
        }
        self.state.search_query = query.to_string();

        let mut notifications = vec![Notification::Search(query.to_string())];
        notifications.extend(self.state.pagination.reset_page().map(Notification::from));
        self.rederive();
        notifications
    }

    /// Select `value` for facet `key`. A null or empty value clears the facet.
    pub fn set_filter(&mut self, key: &str, value: Value) -> Vec<Notification> {
        let clears = match &value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        };
        if clears {
            return self.clear_filter(key);
        }
        if self.state.active_filters.get(key) == Some(&value) {
            return Vec::new();
        }

        self.state.active_filters.insert(key.to_string(), value);
        self.after_filter_change()
    }

    pub fn clear_filter(&mut self, key: &str) -> Vec<Notification> {
        if self.state.active_filters.remove(key).is_none() {
            return Vec::new();
        }
        self.after_filter_change()
    }

    pub fn clear_filters(&mut self) -> Vec<Notification> {
        if self.state.active_filters.is_empty() {
            return Vec::new();
        }
        self.state.active_filters.clear();
        self.after_filter_change()
    }

    fn after_filter_change(&mut self) -> Vec<Notification> {
        let notifications: Vec<Notification> = self
            .state
            .pagination
            .reset_page()
            .map(Notification::from)
            .into_iter()
            .collect();
        self.rederive();
        self.persist_if_changed();
        notifications
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection & expansion
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_selection(&mut self, id: RowId) -> Vec<Notification> {
        if self.loading {
            return Vec::new();
        }
        vec![Notification::SelectionChanged(self.state.selection.toggle(id))]
    }

    /// Select exactly the rows on the current page
    pub fn select_all_visible(&mut self) -> Vec<Notification> {
        if self.loading {
            return Vec::new();
        }
        let page_ids = self.page_ids();
        vec![Notification::SelectionChanged(
            self.state.selection.select_all_visible(&page_ids),
        )]
    }

    /// Page-level checkbox: checked selects the page, unchecked clears
    pub fn toggle_select_all(&mut self, checked: bool) -> Vec<Notification> {
        if checked {
            self.select_all_visible()
        } else {
            self.clear_selection()
        }
    }

    pub fn clear_selection(&mut self) -> Vec<Notification> {
        if self.loading {
            return Vec::new();
        }
        vec![Notification::SelectionChanged(self.state.selection.clear())]
    }

    pub fn toggle_expanded(&mut self, id: RowId) -> bool {
        if self.loading {
            return false;
        }
        if !self.state.expanded.remove(&id) {
            self.state.expanded.insert(id);
        }
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Column visibility
    // ─────────────────────────────────────────────────────────────────────────

    pub fn hide_column(&mut self, field: &str) -> bool {
        let changed = self.state.visibility.hide(field, &self.options.columns);
        self.after_visibility_change(changed)
    }

    pub fn show_column(&mut self, field: &str) -> bool {
        let changed = self.state.visibility.show(field);
        self.after_visibility_change(changed)
    }

    pub fn toggle_column(&mut self, field: &str) -> bool {
        let changed = self.state.visibility.toggle(field, &self.options.columns);
        self.after_visibility_change(changed)
    }

    pub fn reset_columns(&mut self) -> bool {
        let changed = self.state.visibility.reset();
        self.after_visibility_change(changed)
    }

    fn after_visibility_change(&mut self, changed: bool) -> bool {
        if changed {
            self.ensure_sort_field();
            self.rederive();
            self.persist_if_changed();
        }
        changed
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pagination
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_page(&mut self, page: usize) -> Vec<Notification> {
        let page = page.min(self.page_count() - 1);
        if page == self.state.pagination.page() {
            return Vec::new();
        }
        self.state
            .pagination
            .set_page(page)
            .map(Notification::from)
            .into_iter()
            .collect()
    }

    pub fn next_page(&mut self) -> Vec<Notification> {
        self.set_page(self.state.pagination.page() + 1)
    }

    pub fn previous_page(&mut self) -> Vec<Notification> {
        self.set_page(self.state.pagination.page().saturating_sub(1))
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: usize) -> Vec<Notification> {
        if rows_per_page == 0 || rows_per_page == self.state.pagination.rows_per_page() {
            return Vec::new();
        }
        let notifications: Vec<Notification> = self
            .state
            .pagination
            .set_rows_per_page(rows_per_page)
            .map(Notification::from)
            .into_iter()
            .collect();
        self.persist_if_changed();
        notifications
    }

    /// Advance to the next entry of `page_size_options`, wrapping around
    pub fn cycle_rows_per_page(&mut self) -> Vec<Notification> {
        let options = &self.options.page_size_options;
        if options.is_empty() {
            return Vec::new();
        }
        let current = self.state.pagination.rows_per_page();
        let next = options
            .iter()
            .copied()
            .find(|&size| size > current)
            .unwrap_or(options[0]);
        self.set_rows_per_page(next)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    /// Export the whole filtered and sorted row set. `None` while loading or
    /// when there is nothing eligible to export.
    pub fn export(&self, format: ExportFormat) -> Option<ExportArtifact> {
        if self.loading {
            return None;
        }
        let rows = self.processed_rows();
        export::export(&rows, &self.options.columns, format, &self.options.title)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Pipeline
    // ─────────────────────────────────────────────────────────────────────────

    fn page_indices(&self) -> &[usize] {
        self.state.pagination.slice(&self.processed)
    }

    /// Recompute the filtered and sorted indices from the current inputs
    fn rederive(&mut self) {
        let visible = self.state.visibility.visible_columns(&self.options.columns);
        let searchable = if visible.is_empty() {
            declared_columns(&self.options.columns)
        } else {
            visible
        };

        let mut indices = filter::apply(
            &self.rows,
            &self.state.active_filters,
            &self.state.search_query,
            &searchable,
        );
        if !self.state.order_by.is_empty() {
            sort_indices(&self.rows, &mut indices, self.state.order, &self.state.order_by);
        }

        debug!(
            "Recomputed table view: {} of {} rows",
            indices.len(),
            self.rows.len()
        );
        self.processed = indices;
        self.state.pagination.clamp(self.processed.len());
    }

    /// Move the sort field to the first visible column when it is hidden or
    /// no longer declared
    fn ensure_sort_field(&mut self) {
        let visible = self.state.visibility.visible_columns(&self.options.columns);
        if visible.iter().any(|c| c.field == self.state.order_by) {
            return;
        }
        let fallback = visible
            .first()
            .map(|c| c.field.clone())
            .unwrap_or_default();
        debug!(
            "Sort field '{}' unavailable, falling back to '{}'",
            self.state.order_by, fallback
        );
        self.state.order_by = fallback;
    }

    fn persist_if_changed(&mut self) {
        if !self.persistence.is_enabled() {
            return;
        }
        let snapshot = self.snapshot();
        if self.last_saved.as_ref() == Some(&snapshot) {
            return;
        }
        self.persistence.save(&snapshot);
        self.last_saved = Some(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::persistence::MemoryStore;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("id", "ID"),
            Column::new("name", "Name"),
            Column::new("status", "Status"),
        ]
    }

    fn numbered_rows(count: i64) -> Vec<Row> {
        (1..=count)
            .map(|i| {
                Row::new()
                    .with("id", i)
                    .with("name", format!("row {:02}", i))
                    .with("status", if i % 2 == 0 { "active" } else { "paused" })
            })
            .collect()
    }

    fn table(options: TableOptions) -> TableView {
        TableView::new(options, None)
    }

    fn ids(range: std::ops::RangeInclusive<i64>) -> Vec<RowId> {
        range.map(RowId::Int).collect()
    }

    #[test]
    fn test_defaults_without_snapshot() {
        let view = table(TableOptions {
            columns: columns(),
            default_sort_field: Some("name".to_string()),
            ..Default::default()
        });

        assert_eq!(view.state().order_by, "name");
        assert_eq!(view.state().order, SortOrder::Asc);
        assert_eq!(view.state().pagination.rows_per_page(), DEFAULT_PAGE_SIZE);
        assert_eq!(view.state().pagination.page(), 0);
    }

    #[test]
    fn test_default_sort_falls_back_to_first_visible_column() {
        let view = table(TableOptions {
            columns: columns(),
            default_sort_field: Some("created_at".to_string()),
            ..Default::default()
        });
        assert_eq!(view.state().order_by, "id");
    }

    #[test]
    fn test_request_sort_toggles_direction() {
        let mut view = table(TableOptions {
            columns: columns(),
            ..Default::default()
        });
        view.set_rows(vec![
            Row::new().with("id", 1).with("name", "b"),
            Row::new().with("id", 2).with("name", "a"),
        ]);

        assert!(view.request_sort("name"));
        let order: Vec<RowId> = view.page_ids();
        assert_eq!(order, vec![RowId::Int(2), RowId::Int(1)]);

        assert!(view.request_sort("name"));
        assert_eq!(view.state().order, SortOrder::Desc);
        assert_eq!(view.page_ids(), vec![RowId::Int(1), RowId::Int(2)]);
    }

    #[test]
    fn test_sort_rejects_non_sortable_and_hidden_fields() {
        let mut view = table(TableOptions {
            columns: vec![
                Column::new("id", "ID"),
                Column::new("notes", "Notes").sortable(false),
                Column::new("name", "Name"),
            ],
            ..Default::default()
        });

        assert!(!view.request_sort("notes"));
        assert!(!view.request_sort("missing"));
        view.hide_column("name");
        assert!(!view.request_sort("name"));
        assert_eq!(view.state().order_by, "id");
    }

    #[test]
    fn test_hiding_sort_column_moves_sort_field() {
        let mut view = table(TableOptions {
            columns: columns(),
            default_sort_field: Some("id".to_string()),
            ..Default::default()
        });

        assert!(view.hide_column("id"));
        assert_eq!(view.state().order_by, "name");
    }

    #[test]
    fn test_show_column_updates_snapshot() {
        let mut view = table(TableOptions {
            columns: columns(),
            ..Default::default()
        });
        view.hide_column("status");
        assert_eq!(view.snapshot().hidden_columns, vec!["status".to_string()]);

        assert!(view.show_column("status"));
        assert!(!view.show_column("status"));
        assert!(view.snapshot().hidden_columns.is_empty());
        assert_eq!(view.visible_columns().len(), 3);
    }

    #[test]
    fn test_row_count_label_follows_page() {
        let mut view = table(TableOptions {
            columns: columns(),
            ..Default::default()
        });
        assert_eq!(view.row_count_label(), "0–0 of 0");

        view.set_rows(numbered_rows(25));
        assert_eq!(view.row_count_label(), "1–10 of 25");
        view.set_page(2);
        assert_eq!(view.row_count_label(), "21–25 of 25");
    }

    #[test]
    fn test_removing_columns_prunes_hidden_and_sort() {
        let mut view = table(TableOptions {
            columns: columns(),
            default_sort_field: Some("status".to_string()),
            ..Default::default()
        });
        view.hide_column("name");

        view.set_columns(vec![Column::new("id", "ID")]);
        assert_eq!(view.state().visibility.hidden().count(), 0);
        assert_eq!(view.state().order_by, "id");
    }

    #[test]
    fn test_search_emits_and_resets_page() {
        let mut view = table(TableOptions {
            columns: columns(),
            ..Default::default()
        });
        view.set_rows(numbered_rows(25));
        view.set_page(2);
        assert_eq!(view.state().pagination.page(), 2);

        let notifications = view.set_search("row 1");
        assert_eq!(notifications, vec![Notification::Search("row 1".to_string())]);
        assert_eq!(view.state().pagination.page(), 0);
        assert_eq!(view.filtered_count(), 10);

        assert!(view.set_search("row 1").is_empty());
    }

    #[test]
    fn test_search_ignores_hidden_columns() {
        let mut view = table(TableOptions {
            columns: columns(),
            ..Default::default()
        });
        view.set_rows(numbered_rows(4));
        view.hide_column("status");

        view.set_search("paused");
        assert_eq!(view.filtered_count(), 0);
    }

    #[test]
    fn test_filter_then_clear() {
        let mut view = table(TableOptions {
            columns: columns(),
            ..Default::default()
        });
        view.set_rows(numbered_rows(6));

        view.set_filter("status", Value::from("ACTIVE"));
        assert_eq!(view.filtered_count(), 3);

        view.set_filter("status", Value::from(""));
        assert_eq!(view.filtered_count(), 6);
        assert!(view.state().active_filters.is_empty());
    }

    #[test]
    fn test_select_all_is_page_scoped() {
        let mut view = table(TableOptions {
            columns: columns(),
            ..Default::default()
        });
        view.set_rows(numbered_rows(25));
        view.set_page(1);

        let notifications = view.select_all_visible();
        assert_eq!(notifications, vec![Notification::SelectionChanged(ids(11..=20))]);
        assert_eq!(view.view().selection.page_state, PageSelection::All);

        view.set_page(0);
        assert_eq!(view.view().selection.page_state, PageSelection::None);
        assert_eq!(view.view().selection.selected_count, 10);
    }

    #[test]
    fn test_data_refresh_reconciles_selection_once() {
        let mut view = table(TableOptions {
            columns: columns(),
            ..Default::default()
        });
        view.set_rows(numbered_rows(5));
        view.toggle_selection(RowId::Int(2));
        view.toggle_selection(RowId::Int(5));
        view.toggle_expanded(RowId::Int(5));

        let notifications = view.set_rows(numbered_rows(3));
        assert_eq!(
            notifications,
            vec![Notification::SelectionChanged(vec![RowId::Int(2)])]
        );
        assert!(view.state().expanded.is_empty());

        assert!(view.set_rows(numbered_rows(3)).is_empty());
    }

    #[test]
    fn test_rows_without_id_use_index() {
        let mut view = table(TableOptions {
            columns: vec![Column::new("name", "Name")],
            ..Default::default()
        });
        view.set_rows(vec![Row::new().with("name", "x"), Row::new().with("name", "y")]);

        assert_eq!(view.page_ids(), vec![RowId::Index(0), RowId::Index(1)]);
    }

    #[test]
    fn test_loading_mode_disables_identity_operations() {
        let mut view = table(TableOptions {
            columns: columns(),
            page_size: 5,
            ..Default::default()
        });
        view.set_rows(numbered_rows(3));
        view.set_loading(true);

        let model = view.view();
        assert_eq!(model.mode, TableMode::Loading);
        assert_eq!(model.placeholder_rows, 5);
        assert!(model.page_rows.is_empty());

        assert!(view.toggle_selection(RowId::Int(1)).is_empty());
        assert!(view.select_all_visible().is_empty());
        assert!(!view.toggle_expanded(RowId::Int(1)));
        assert!(view.export(ExportFormat::Csv).is_none());
    }

    #[test]
    fn test_empty_mode_suppresses_duplicate_toolbar_action() {
        let mut view = table(TableOptions {
            columns: columns(),
            empty_state: Some(EmptyState {
                title: "No jobs yet".to_string(),
                description: String::new(),
                action_label: Some("Create job".to_string()),
            }),
            toolbar_actions: vec![
                ToolbarAction {
                    label: "Create job".to_string(),
                },
                ToolbarAction {
                    label: "Import".to_string(),
                },
            ],
            ..Default::default()
        });

        assert_eq!(view.mode(), TableMode::Empty);
        let labels: Vec<&str> = view
            .toolbar_actions()
            .iter()
            .map(|a| a.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Import"]);
        assert!(view.view().empty_state.is_some());

        view.set_rows(numbered_rows(1));
        assert_eq!(view.mode(), TableMode::Populated);
        assert_eq!(view.toolbar_actions().len(), 2);
    }

    #[test]
    fn test_external_pagination_delegates() {
        let mut view = table(TableOptions {
            columns: columns(),
            remote_page: Some(RemotePage {
                page: 0,
                rows_per_page: 10,
                total: 95,
            }),
            ..Default::default()
        });
        view.set_rows(numbered_rows(10));

        assert_eq!(view.view().page_rows.len(), 10);
        assert_eq!(view.row_count_label(), "1–10 of 95");
        assert_eq!(view.set_page(3), vec![Notification::PageChange(3)]);
        assert_eq!(view.state().pagination.page(), 0);
        assert_eq!(
            view.set_rows_per_page(25),
            vec![Notification::RowsPerPageChange(25)]
        );

        let notifications = view.set_search("row");
        assert_eq!(
            notifications,
            vec![
                Notification::Search("row".to_string()),
                Notification::PageChange(0)
            ]
        );

        assert!(view.set_remote_page(RemotePage {
            page: 3,
            rows_per_page: 10,
            total: 95,
        }));
        assert_eq!(view.state().pagination.page(), 3);
    }

    #[test]
    fn test_oversized_remote_page_keeps_label_in_range() {
        let mut view = table(TableOptions {
            columns: columns(),
            remote_page: Some(RemotePage {
                page: 0,
                rows_per_page: 10,
                total: 5,
            }),
            ..Default::default()
        });
        view.set_rows(numbered_rows(5));
        view.set_remote_page(RemotePage {
            page: usize::MAX / 2,
            rows_per_page: 10,
            total: 5,
        });

        assert_eq!(view.row_count_label(), "5–5 of 5");
        assert_eq!(view.view().total, 5);
    }

    #[test]
    fn test_large_numeric_ids_select_one_row() {
        let mut view = table(TableOptions {
            columns: columns(),
            ..Default::default()
        });
        view.set_rows(vec![Row::new().with("id", 1e20), Row::new().with("id", 2e20)]);

        let ids = view.page_ids();
        assert_ne!(ids[0], ids[1]);
        view.toggle_selection(ids[0].clone());
        let selected: Vec<bool> = view.view().page_rows.iter().map(|r| r.selected).collect();
        assert_eq!(selected, vec![true, false]);
    }

    #[test]
    fn test_page_clamped_after_rows_shrink() {
        let mut view = table(TableOptions {
            columns: columns(),
            ..Default::default()
        });
        view.set_rows(numbered_rows(30));
        view.set_page(2);

        view.set_rows(numbered_rows(12));
        assert_eq!(view.state().pagination.page(), 1);
        assert_eq!(view.view().page_rows.len(), 2);
    }

    #[test]
    fn test_cycle_rows_per_page() {
        let mut view = table(TableOptions {
            columns: columns(),
            page_size: 10,
            page_size_options: vec![10, 25, 50],
            ..Default::default()
        });
        view.cycle_rows_per_page();
        assert_eq!(view.state().pagination.rows_per_page(), 25);
        view.cycle_rows_per_page();
        view.cycle_rows_per_page();
        assert_eq!(view.state().pagination.rows_per_page(), 10);
    }

    #[test]
    fn test_preferences_restored_by_next_instance() {
        let store = MemoryStore::new();
        let options = TableOptions {
            columns: columns(),
            persist_key: Some("jobs".to_string()),
            ..Default::default()
        };

        let mut first = TableView::new(options.clone(), Some(Box::new(store.clone())));
        first.request_sort("name");
        first.request_sort("name");
        first.set_rows_per_page(25);
        first.set_filter("status", Value::from("active"));
        first.hide_column("status");
        first.set_search("not persisted");
        drop(first);

        let second = TableView::new(options, Some(Box::new(store)));
        let state = second.state();
        assert_eq!(state.order_by, "name");
        assert_eq!(state.order, SortOrder::Desc);
        assert_eq!(state.pagination.rows_per_page(), 25);
        assert_eq!(state.active_filters.get("status"), Some(&Value::from("active")));
        assert!(state.visibility.is_hidden("status"));
        assert!(state.search_query.is_empty());
    }

    #[test]
    fn test_export_uses_full_processed_set() {
        let mut view = table(TableOptions {
            title: "Job Runs".to_string(),
            columns: columns(),
            page_size: 5,
            ..Default::default()
        });
        view.set_rows(numbered_rows(12));
        view.set_filter("status", Value::from("active"));

        let artifact = view.export(ExportFormat::Csv).unwrap();
        assert_eq!(artifact.file_name, "job_runs.csv");
        assert_eq!(artifact.mime_type, "text/csv;charset=utf-8");
        assert_eq!(artifact.contents.lines().count(), 7);

        view.set_search("nothing matches");
        assert!(view.export(ExportFormat::Json).is_none());
    }
}
