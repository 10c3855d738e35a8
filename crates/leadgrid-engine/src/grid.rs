use std::collections::BTreeSet;
use std::sync::Arc;

use leadgrid_types::{CellValue, GridRow};
use serde::Serialize;
use tracing::debug;

use crate::column::{CellKind, ColumnDescriptor, ColumnModel, ControlKind, HeaderSpec};
use crate::export::{CSV_MIME_TYPE, CsvDownload, export_file_name, rows_to_csv};
use crate::filter::{FilterState, Predicate};
use crate::pagination::{PAGE_SIZE_OPTIONS, PaginationState, page_window};
use crate::query::{QueryResult, filter_and_sort};
use crate::selection::SelectionState;
use crate::sort::{SortDirective, SortIndicator, SortState};
use crate::{Error, Result};

// ============================================================================
// View model
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridView {
    pub title: String,
    pub search: String,
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<BodyRow>,
    pub empty: Option<EmptyState>,
    pub pagination: PaginationView,
    pub filters: Vec<FilterChip>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderCell {
    pub column_id: String,
    pub label: String,
    pub sortable: bool,
    pub sort: SortIndicator,
    /// Present on the select-all header; true when the whole page is selected
    pub select_all: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyRow {
    pub row_id: String,
    pub selected: bool,
    pub cells: Vec<BodyCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyCell {
    pub column_id: String,
    pub content: CellContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellContent {
    Empty,
    Text { text: String },
    Badge { text: String },
    /// Placeholder text such as "N/A" or "Unassigned"
    Muted { text: String },
    Checkbox { checked: bool },
    Link { label: String, path: String },
    /// Resolved by the runtime's cell behaviors
    Control { control: ControlKind, value: String },
}

impl CellContent {
    /// Plain text of the cell for console output.
    pub fn plain(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Text { text }
            | CellContent::Badge { text }
            | CellContent::Muted { text } => text.clone(),
            CellContent::Checkbox { checked: true } => "[x]".to_string(),
            CellContent::Checkbox { checked: false } => "[ ]".to_string(),
            CellContent::Link { label, .. } => label.clone(),
            CellContent::Control { value, .. } => value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum EmptyState {
    /// The snapshot has no rows at all
    NoData(String),
    /// Rows exist but the filters exclude all of them
    NoMatches(String),
}

impl EmptyState {
    pub fn message(&self) -> &str {
        match self {
            EmptyState::NoData(msg) | EmptyState::NoMatches(msg) => msg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationView {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub selected_rows: usize,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub can_previous: bool,
    pub can_next: bool,
    pub window: Vec<usize>,
}

impl PaginationView {
    pub fn summary(&self) -> String {
        format!(
            "{} of {} row(s) selected. Page {} of {}",
            self.selected_rows, self.total_rows, self.current_page, self.total_pages
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterChip {
    pub column_id: String,
    pub prefix: String,
    pub value: String,
}

impl FilterChip {
    pub fn text(&self) -> String {
        format!("{}: {}", self.prefix, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnToggle {
    pub column_id: String,
    pub label: String,
    pub visible: bool,
}

// ============================================================================
// Controller
// ============================================================================

/// Owns a snapshot plus all grid state and derives the visible window.
pub struct DataGrid<T> {
    title: String,
    noun: String,
    columns: ColumnModel<T>,
    rows: Arc<Vec<T>>,
    filter: FilterState,
    sort: SortState,
    pagination: PaginationState,
    selection: SelectionState,
    hidden: BTreeSet<String>,
    result: QueryResult,
}

impl<T: GridRow> DataGrid<T> {
    pub fn new(title: impl Into<String>, columns: ColumnModel<T>) -> Self {
        let title = title.into();
        let noun = title.to_lowercase();
        Self {
            title,
            noun,
            columns,
            rows: Arc::new(Vec::new()),
            filter: FilterState::default(),
            sort: SortState::default(),
            pagination: PaginationState::default(),
            selection: SelectionState::default(),
            hidden: BTreeSet::new(),
            result: QueryResult::default(),
        }
    }

    /// Entity noun used by the empty-state messages.
    pub fn noun(mut self, noun: impl Into<String>) -> Self {
        self.noun = noun.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Result<Self> {
        self.pagination = PaginationState::new(page_size)?;
        self.refresh();
        Ok(self)
    }

    pub fn with_rows(mut self, rows: Arc<Vec<T>>) -> Self {
        self.set_rows(rows);
        self
    }

    // --- accessors ---

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> &Arc<Vec<T>> {
        &self.rows
    }

    pub fn columns(&self) -> &ColumnModel<T> {
        &self.columns
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn result(&self) -> &QueryResult {
        &self.result
    }

    pub fn page_count(&self) -> usize {
        self.result.page_count
    }

    pub fn total_filtered(&self) -> usize {
        self.result.total_filtered
    }

    pub fn visible_rows(&self) -> Vec<&T> {
        self.result.visible.iter().map(|&i| &self.rows[i]).collect()
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.rows.iter().find(|row| row.row_id() == id)
    }

    // --- snapshot ---

    /// Replace the snapshot, keeping filters and clamping the page.
    pub fn set_rows(&mut self, rows: Arc<Vec<T>>) {
        debug!(rows = rows.len(), title = %self.title, "snapshot replaced");
        self.rows = rows;
        self.refresh();
    }

    // --- filtering ---

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.global_text = text.into();
        self.pagination.page_index = 0;
        self.refresh();
    }

    pub fn set_predicate(&mut self, column_id: &str, predicate: Predicate) -> Result<()> {
        self.columns.require(column_id)?;
        self.filter.set(column_id, predicate);
        self.pagination.page_index = 0;
        self.refresh();
        Ok(())
    }

    pub fn remove_filter(&mut self, column_id: &str) -> bool {
        let removed = self.filter.remove(column_id);
        if removed {
            self.pagination.page_index = 0;
            self.refresh();
        }
        removed
    }

    /// Reset every predicate and the search text.
    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.pagination.page_index = 0;
        self.refresh();
    }

    pub fn active_filter_chips(&self) -> Vec<FilterChip> {
        self.filter
            .active()
            .map(|(column_id, predicate)| FilterChip {
                column_id: column_id.to_string(),
                prefix: self
                    .columns
                    .get(column_id)
                    .map(|c| c.chip_label().to_string())
                    .unwrap_or_else(|| column_id.to_string()),
                value: predicate.describe(),
            })
            .collect()
    }

    // --- sorting ---

    /// Advance the sort cycle of a column. Returns false for columns that
    /// cannot be sorted.
    pub fn toggle_sort(&mut self, column_id: &str) -> bool {
        let sortable = self
            .columns
            .get(column_id)
            .is_some_and(ColumnDescriptor::is_sortable);
        if !sortable {
            return false;
        }
        self.sort.toggle(column_id);
        self.pagination.page_index = 0;
        self.refresh();
        true
    }

    pub fn set_sort(&mut self, directive: Option<SortDirective>) -> Result<()> {
        if let Some(d) = &directive {
            let column = self.columns.require(&d.column_id)?;
            if !column.is_sortable() {
                return Err(Error::UnknownColumn(d.column_id.clone()));
            }
        }
        self.sort.directive = directive;
        self.pagination.page_index = 0;
        self.refresh();
        Ok(())
    }

    // --- paging ---

    pub fn set_page_index(&mut self, page_index: usize) {
        self.pagination.page_index = page_index;
        self.pagination.clamp(self.result.total_filtered);
        self.reslice();
    }

    pub fn first_page(&mut self) {
        self.set_page_index(0);
    }

    pub fn previous_page(&mut self) {
        if self.pagination.can_previous() {
            self.set_page_index(self.pagination.page_index - 1);
        }
    }

    pub fn next_page(&mut self) {
        if self.pagination.can_next(self.result.total_filtered) {
            self.set_page_index(self.pagination.page_index + 1);
        }
    }

    pub fn last_page(&mut self) {
        self.set_page_index(self.result.page_count.saturating_sub(1));
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        self.pagination
            .resize(page_size, self.result.total_filtered)?;
        self.reslice();
        Ok(())
    }

    // --- selection ---

    pub fn toggle_row(&mut self, id: &str) -> bool {
        self.selection.toggle(id)
    }

    pub fn set_row_selected(&mut self, id: &str, selected: bool) {
        self.selection.set(id, selected);
    }

    /// Select or clear the rows of the current page only.
    pub fn set_page_selected(&mut self, selected: bool) {
        let ids: Vec<&str> = self
            .result
            .visible
            .iter()
            .map(|&i| self.rows[i].row_id())
            .collect();
        self.selection.set_many(ids, selected);
    }

    pub fn is_page_selected(&self) -> bool {
        !self.result.visible.is_empty()
            && self
                .result
                .visible
                .iter()
                .all(|&i| self.selection.contains(self.rows[i].row_id()))
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selection.ids().map(str::to_string).collect()
    }

    pub fn selected_rows(&self) -> Vec<&T> {
        self.rows
            .iter()
            .filter(|row| self.selection.contains(row.row_id()))
            .collect()
    }

    /// Selected rows that survive the current filters.
    pub fn selected_filtered_count(&self) -> usize {
        self.result
            .ordered
            .iter()
            .filter(|&&i| self.selection.contains(self.rows[i].row_id()))
            .count()
    }

    /// Drop selected ids that the current filters exclude.
    pub fn prune_selection(&mut self) -> usize {
        let keep: Vec<&str> = self
            .result
            .ordered
            .iter()
            .map(|&i| self.rows[i].row_id())
            .collect();
        self.selection.retain(keep)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Overwrite the selection with an externally owned set.
    pub fn set_selection<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.selection.replace(ids);
    }

    // --- visibility ---

    /// Show or hide a column. Returns whether visibility changed; pinned
    /// columns never change.
    pub fn set_column_visible(&mut self, column_id: &str, visible: bool) -> Result<bool> {
        let column = self.columns.require(column_id)?;
        if !column.hideable {
            return Ok(false);
        }
        Ok(if visible {
            self.hidden.remove(column_id)
        } else {
            self.hidden.insert(column_id.to_string())
        })
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        !self.hidden.contains(column_id)
    }

    pub fn toggleable_columns(&self) -> Vec<ColumnToggle> {
        self.columns
            .iter()
            .filter(|c| c.hideable)
            .map(|c| ColumnToggle {
                column_id: c.id.clone(),
                label: c.header.label().to_string(),
                visible: self.is_column_visible(&c.id),
            })
            .collect()
    }

    fn visible_columns(&self) -> impl Iterator<Item = &ColumnDescriptor<T>> {
        self.columns
            .iter()
            .filter(|c| !c.hideable || !self.hidden.contains(&c.id))
    }

    // --- export ---

    pub fn export_file_name(&self) -> String {
        export_file_name(&self.title)
    }

    /// CSV of the whole loaded snapshot, ignoring filters and paging.
    pub fn export_csv(&self) -> Result<CsvDownload> {
        let content = rows_to_csv(self.rows.as_slice())?;
        Ok(CsvDownload {
            file_name: self.export_file_name(),
            mime_type: CSV_MIME_TYPE,
            content,
        })
    }

    // --- rendering ---

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.rows.is_empty() {
            Some(EmptyState::NoData(format!("No {} found.", self.noun)))
        } else if self.result.total_filtered == 0 {
            Some(EmptyState::NoMatches(format!(
                "No {} match your filters.",
                self.noun
            )))
        } else {
            None
        }
    }

    pub fn pagination_view(&self) -> PaginationView {
        let total_rows = self.result.total_filtered;
        PaginationView {
            current_page: self.pagination.page_index + 1,
            total_pages: self.result.page_count.max(1),
            total_rows,
            selected_rows: self.selected_filtered_count(),
            page_size: self.pagination.page_size,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
            can_previous: self.pagination.can_previous(),
            can_next: self.pagination.can_next(total_rows),
            window: page_window(self.pagination.page_index, self.result.page_count),
        }
    }

    pub fn render(&self) -> GridView {
        let page_selected = self.is_page_selected();
        let headers = self
            .visible_columns()
            .map(|c| HeaderCell {
                column_id: c.id.clone(),
                label: c.header.label().to_string(),
                sortable: c.is_sortable(),
                sort: self.sort.indicator(&c.id),
                select_all: matches!(c.header, HeaderSpec::SelectAll).then_some(page_selected),
            })
            .collect();

        let rows = self
            .result
            .visible
            .iter()
            .map(|&i| {
                let row = &self.rows[i];
                let selected = self.selection.contains(row.row_id());
                BodyRow {
                    row_id: row.row_id().to_string(),
                    selected,
                    cells: self
                        .visible_columns()
                        .map(|c| BodyCell {
                            column_id: c.id.clone(),
                            content: render_cell(c, row, selected),
                        })
                        .collect(),
                }
            })
            .collect();

        GridView {
            title: self.title.clone(),
            search: self.filter.global_text.clone(),
            headers,
            rows,
            empty: self.empty_state(),
            pagination: self.pagination_view(),
            filters: self.active_filter_chips(),
        }
    }

    // --- derivation ---

    fn refresh(&mut self) {
        let ordered = filter_and_sort(&self.rows, &self.columns, &self.filter, &self.sort);
        self.pagination.clamp(ordered.len());
        self.result.total_filtered = ordered.len();
        self.result.page_count = self.pagination.page_count(ordered.len());
        self.result.ordered = ordered;
        self.reslice();
    }

    fn reslice(&mut self) {
        self.result.visible = self
            .result
            .ordered
            .iter()
            .skip(self.pagination.offset())
            .take(self.pagination.page_size)
            .copied()
            .collect();
        self.result.page_count = self.pagination.page_count(self.result.total_filtered);
    }
}

fn render_cell<T: GridRow>(column: &ColumnDescriptor<T>, row: &T, selected: bool) -> CellContent {
    let value = column.value(row).unwrap_or_default();
    match &column.cell {
        CellKind::Text => match value {
            CellValue::Null => CellContent::Empty,
            other => CellContent::Text {
                text: other.display(),
            },
        },
        CellKind::Date => match value {
            CellValue::Date(_) => CellContent::Text {
                text: value.display(),
            },
            _ => CellContent::Muted {
                text: "N/A".to_string(),
            },
        },
        CellKind::Badge { empty_label } => {
            let text = value.display();
            if text.trim().is_empty() {
                CellContent::Muted {
                    text: empty_label.clone(),
                }
            } else {
                CellContent::Badge { text }
            }
        }
        CellKind::Select => CellContent::Checkbox { checked: selected },
        CellKind::ViewDetails { route } => CellContent::Link {
            label: "View Details".to_string(),
            path: route.replace("{id}", row.row_id()),
        },
        CellKind::Control(control) => CellContent::Control {
            control: *control,
            value: value.display(),
        },
    }
}
