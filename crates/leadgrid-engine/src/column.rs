use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use leadgrid_types::CellValue;
use serde::Serialize;

use crate::{Error, Result};

/// Pure projection from a row to the value a column filters, sorts and shows.
pub type Accessor<T> = Arc<dyn Fn(&T) -> CellValue + Send + Sync>;

/// How a column header is presented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "label", rename_all = "snake_case")]
pub enum HeaderSpec {
    Label(String),
    /// Label that toggles the sort cycle when activated
    SortableLabel(String),
    /// Page-wide select checkbox
    SelectAll,
}

impl HeaderSpec {
    pub fn label(&self) -> &str {
        match self {
            HeaderSpec::Label(label) | HeaderSpec::SortableLabel(label) => label,
            HeaderSpec::SelectAll => "",
        }
    }
}

/// Interactive cell behaviors that live outside the engine.
///
/// The grid renders these as [`crate::CellContent::Control`] and the runtime
/// resolves them against its own editors, menus and contact actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
    StageEditor,
    StatusEditor,
    ContactActions,
    ActionMenu,
}

/// Cell behavior of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "options", rename_all = "snake_case")]
pub enum CellKind {
    Text,
    /// Formatted date, `"N/A"` when absent
    Date,
    /// Pill with a placeholder when the value is empty
    Badge { empty_label: String },
    /// Per-row selection checkbox
    Select,
    /// Link to the detail route; `{id}` is replaced with the row id
    ViewDetails { route: String },
    Control(ControlKind),
}

/// One column of a grid over rows of type `T`.
pub struct ColumnDescriptor<T> {
    pub id: String,
    pub header: HeaderSpec,
    pub accessor: Option<Accessor<T>>,
    pub cell: CellKind,
    pub sortable: bool,
    pub hideable: bool,
    /// Prefix for active-filter chips; defaults to the header label
    pub filter_label: Option<String>,
}

impl<T> ColumnDescriptor<T> {
    /// Data column backed by an accessor. Sortable and hideable by default.
    pub fn accessor<F>(id: impl Into<String>, label: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            header: HeaderSpec::Label(label.into()),
            accessor: Some(Arc::new(accessor)),
            cell: CellKind::Text,
            sortable: true,
            hideable: true,
            filter_label: None,
        }
    }

    /// Display-only column without an accessor (actions, checkboxes).
    pub fn display(id: impl Into<String>, header: HeaderSpec, cell: CellKind) -> Self {
        Self {
            id: id.into(),
            header,
            accessor: None,
            cell,
            sortable: false,
            hideable: true,
            filter_label: None,
        }
    }

    pub fn cell(mut self, cell: CellKind) -> Self {
        self.cell = cell;
        self
    }

    /// Render the header as a sort toggle.
    pub fn sortable_header(mut self) -> Self {
        let label = self.header.label().to_string();
        self.header = HeaderSpec::SortableLabel(label);
        self.sortable = true;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        if let HeaderSpec::SortableLabel(label) = &self.header {
            self.header = HeaderSpec::Label(label.clone());
        }
        self
    }

    pub fn pinned(mut self) -> Self {
        self.hideable = false;
        self
    }

    pub fn filter_label(mut self, label: impl Into<String>) -> Self {
        self.filter_label = Some(label.into());
        self
    }

    /// Whether the grid accepts sort directives for this column.
    pub fn is_sortable(&self) -> bool {
        self.sortable && self.accessor.is_some()
    }

    pub fn value(&self, row: &T) -> Option<CellValue> {
        self.accessor.as_ref().map(|accessor| accessor(row))
    }

    pub fn chip_label(&self) -> &str {
        self.filter_label
            .as_deref()
            .unwrap_or_else(|| self.header.label())
    }
}

impl<T> Clone for ColumnDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            accessor: self.accessor.clone(),
            cell: self.cell.clone(),
            sortable: self.sortable,
            hideable: self.hideable,
            filter_label: self.filter_label.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("has_accessor", &self.accessor.is_some())
            .field("cell", &self.cell)
            .field("sortable", &self.sortable)
            .field("hideable", &self.hideable)
            .finish()
    }
}

/// Ordered, id-unique set of columns.
pub struct ColumnModel<T> {
    columns: Vec<ColumnDescriptor<T>>,
}

impl<T> ColumnModel<T> {
    pub fn new(columns: Vec<ColumnDescriptor<T>>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                return Err(Error::DuplicateColumn(column.id.clone()));
            }
        }
        Ok(Self { columns })
    }

    pub fn get(&self, id: &str) -> Option<&ColumnDescriptor<T>> {
        self.columns.iter().find(|c| c.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&ColumnDescriptor<T>> {
        self.get(id).ok_or_else(|| Error::UnknownColumn(id.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor<T>> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<T> Clone for ColumnModel<T> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<T> fmt::Debug for ColumnModel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.columns.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        name: String,
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = ColumnModel::new(vec![
            ColumnDescriptor::accessor("name", "Name", |r: &Row| r.name.as_str().into()),
            ColumnDescriptor::accessor("name", "Other", |r: &Row| r.name.as_str().into()),
        ]);
        assert!(matches!(result, Err(Error::DuplicateColumn(id)) if id == "name"));
    }

    #[test]
    fn test_display_columns_are_not_sortable() {
        let column: ColumnDescriptor<Row> = ColumnDescriptor::display(
            "actions",
            HeaderSpec::Label("Actions".into()),
            CellKind::Control(ControlKind::ActionMenu),
        );
        assert!(!column.is_sortable());
        assert!(column.value(&Row { name: "x".into() }).is_none());
    }

    #[test]
    fn test_sortable_header_keeps_label() {
        let column =
            ColumnDescriptor::accessor("name", "Lead Name", |r: &Row| r.name.as_str().into())
                .sortable_header()
                .filter_label("Name");
        assert_eq!(column.header, HeaderSpec::SortableLabel("Lead Name".into()));
        assert_eq!(column.chip_label(), "Name");
    }
}
