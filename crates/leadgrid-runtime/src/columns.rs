use leadgrid_engine::{CellKind, ColumnDescriptor, ColumnModel, ControlKind, HeaderSpec};
use leadgrid_types::{CellValue, Department, Lead};

use crate::Result;
use crate::navigation::Route;

fn badge(empty_label: &str) -> CellKind {
    CellKind::Badge {
        empty_label: empty_label.to_string(),
    }
}

/// Columns of the "My Leads" table.
pub fn lead_columns() -> Result<ColumnModel<Lead>> {
    let columns = vec![
        ColumnDescriptor::display("select", HeaderSpec::SelectAll, CellKind::Select).pinned(),
        ColumnDescriptor::accessor("name", "Name", |l: &Lead| l.name.as_str().into())
            .sortable_header()
            .pinned(),
        ColumnDescriptor::accessor("createdAt", "Created On", |l: &Lead| l.created_at.into())
            .cell(CellKind::Date),
        ColumnDescriptor::accessor("contact", "Contact", |l: &Lead| {
            l.reachable_phone().into()
        })
        .cell(CellKind::Control(ControlKind::ContactActions))
        .unsortable(),
        ColumnDescriptor::accessor("source", "Source", |l: &Lead| l.source.as_str().into())
            .cell(badge("N/A")),
        ColumnDescriptor::accessor("stage", "Stage", |l: &Lead| l.stage.as_str().into())
            .sortable_header()
            .cell(CellKind::Control(ControlKind::StageEditor)),
        ColumnDescriptor::accessor("status", "Status", |l: &Lead| l.status.as_str().into())
            .sortable_header()
            .cell(CellKind::Control(ControlKind::StatusEditor)),
        ColumnDescriptor::display(
            "view_details",
            HeaderSpec::Label("View More".to_string()),
            CellKind::ViewDetails {
                route: Route::LEAD_DETAIL_TEMPLATE.to_string(),
            },
        ),
        ColumnDescriptor::accessor("lastContacted", "Last Activity", |l: &Lead| {
            l.last_contacted.into()
        })
        .cell(CellKind::Date),
        ColumnDescriptor::accessor("assignedTo", "Assigned To", |l: &Lead| {
            l.assignee_display().into()
        })
        .sortable_header()
        .cell(badge("Unassigned"))
        .filter_label("Assignee"),
        ColumnDescriptor::accessor("department", "Department", |l: &Lead| {
            l.department.as_deref().into()
        })
        .cell(badge("N/A")),
        ColumnDescriptor::accessor("leadCategory", "Category", |l: &Lead| {
            l.lead_category.as_deref().into()
        })
        .cell(badge("N/A")),
        ColumnDescriptor::accessor("tags", "Tags", |l: &Lead| {
            CellValue::List(l.tags.clone())
        }),
        ColumnDescriptor::display(
            "actions",
            HeaderSpec::Label(String::new()),
            CellKind::Control(ControlKind::ActionMenu),
        )
        .pinned(),
    ];
    Ok(ColumnModel::new(columns)?)
}

/// Columns of the departments admin table.
pub fn department_columns() -> Result<ColumnModel<Department>> {
    let columns = vec![
        ColumnDescriptor::accessor("id", "ID", |d: &Department| d.id.as_str().into()),
        ColumnDescriptor::accessor("name", "Name", |d: &Department| d.name.as_str().into())
            .sortable_header()
            .pinned(),
        ColumnDescriptor::accessor("description", "Description", |d: &Department| {
            d.description.as_str().into()
        }),
        ColumnDescriptor::accessor("kind", "Type", |d: &Department| {
            CellValue::from(if d.is_predefined { "System" } else { "Custom" })
        })
        .cell(badge("Custom")),
        ColumnDescriptor::accessor("isActive", "Status", |d: &Department| {
            CellValue::from(if d.is_active { "Active" } else { "Inactive" })
        })
        .cell(badge("Inactive")),
        ColumnDescriptor::accessor("userCount", "Users", |d: &Department| {
            d.user_count.into()
        }),
    ];
    Ok(ColumnModel::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lead_columns_are_unique_and_pin_controls() -> Result<()> {
        let columns = lead_columns()?;
        let pinned: Vec<_> = columns
            .iter()
            .filter(|c| !c.hideable)
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(pinned, vec!["select", "name", "actions"]);
        assert!(columns.get("actions").is_some_and(|c| !c.sortable));
        Ok(())
    }

    #[test]
    fn test_department_columns() -> Result<()> {
        let columns = department_columns()?;
        assert_eq!(columns.len(), 6);
        assert!(columns.get("name").is_some_and(|c| c.is_sortable()));
        Ok(())
    }
}
