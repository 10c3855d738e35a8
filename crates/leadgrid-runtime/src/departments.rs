use std::collections::BTreeMap;

use leadgrid_engine::DataGrid;
use leadgrid_types::{Department, DepartmentDraft, DepartmentList};
use tracing::warn;

use crate::Result;
use crate::api::ApiClient;
use crate::cells::DeleteOutcome;
use crate::columns::department_columns;
use crate::gateway::{MutationError, RowGateway};
use crate::interaction::Confirmer;
use crate::notify::{Notification, NotificationRelay};
use crate::rest::DepartmentGateway;
use crate::snapshot::SnapshotCache;

#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    /// Local validation failed; field → message
    Invalid(BTreeMap<&'static str, &'static str>),
    Created(Department),
    Failed(MutationError),
}

/// Field errors of a department form, empty when valid.
pub fn validate(draft: &DepartmentDraft) -> BTreeMap<&'static str, &'static str> {
    let mut errors = BTreeMap::new();
    if draft.name.trim().is_empty() {
        errors.insert("name", "Department name is required");
    }
    if draft.description.trim().is_empty() {
        errors.insert("description", "Description is required");
    }
    errors
}

/// Departments admin screen state.
#[derive(Debug, Default)]
pub struct DepartmentAdmin {
    cache: SnapshotCache<Department>,
}

impl DepartmentAdmin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn departments(&self) -> std::sync::Arc<Vec<Department>> {
        self.cache.snapshot()
    }

    /// Total / predefined / custom counters for the dashboard cards.
    pub fn summary(&self) -> DepartmentList {
        DepartmentList::from_departments(self.cache.snapshot().as_ref().clone())
    }

    /// Searchable, sortable table over the current snapshot.
    pub fn grid(&self) -> Result<DataGrid<Department>> {
        Ok(DataGrid::new("Departments", department_columns()?)
            .noun("departments")
            .with_rows(self.cache.snapshot()))
    }

    pub async fn refresh<C, R>(&mut self, gateway: &DepartmentGateway<C>, relay: &R) -> bool
    where
        C: ApiClient,
        R: NotificationRelay + ?Sized,
    {
        let ticket = self.cache.begin_fetch();
        match gateway.list().await {
            Ok(rows) => self.cache.resolve(ticket, rows),
            Err(err) => {
                warn!(error = %err, "department list failed");
                relay.notify(
                    Notification::error("Failed to load departments").titled("Loading Error"),
                );
                false
            }
        }
    }

    pub fn load(&mut self, departments: Vec<Department>) {
        let ticket = self.cache.begin_fetch();
        self.cache.resolve(ticket, departments);
    }

    pub async fn create<G, R>(
        &mut self,
        draft: DepartmentDraft,
        gateway: &G,
        relay: &R,
    ) -> CreateOutcome
    where
        G: RowGateway<Row = Department, Draft = DepartmentDraft> + ?Sized,
        R: NotificationRelay + ?Sized,
    {
        let errors = validate(&draft);
        if !errors.is_empty() {
            let message = errors.values().copied().collect::<Vec<_>>().join(", ");
            relay.notify(Notification::error(message).titled("Validation Error"));
            return CreateOutcome::Invalid(errors);
        }

        let draft = DepartmentDraft {
            name: draft.name.trim().to_string(),
            description: draft.description.trim().to_string(),
            is_active: draft.is_active,
        };
        let name = draft.name.clone();
        match gateway.create(draft).await {
            Ok(department) => {
                relay.notify(
                    Notification::success(format!("Department \"{}\" created successfully!", name))
                        .titled("Department Created"),
                );
                self.cache.apply_insert(department.clone());
                CreateOutcome::Created(department)
            }
            Err(err) => {
                warn!(error = %err, "department create failed");
                relay.notify(
                    Notification::error("Failed to create department. Please try again.")
                        .titled("Creation Failed"),
                );
                CreateOutcome::Failed(err)
            }
        }
    }

    /// Delete after confirmation; predefined departments are refused locally.
    pub async fn delete<K, G, R>(
        &mut self,
        department: &Department,
        confirmer: &K,
        gateway: &G,
        relay: &R,
    ) -> DeleteOutcome
    where
        K: Confirmer + ?Sized,
        G: RowGateway<Row = Department> + ?Sized,
        R: NotificationRelay + ?Sized,
    {
        if department.is_predefined {
            relay.notify(
                Notification::error("Predefined departments cannot be deleted")
                    .titled("Deletion Failed"),
            );
            return DeleteOutcome::Cancelled;
        }
        let confirmed = confirmer
            .confirm(
                "Delete Department",
                &format!(
                    "Are you sure you want to delete \"{}\"? This action cannot be undone.",
                    department.name
                ),
            )
            .await;
        if !confirmed {
            return DeleteOutcome::Cancelled;
        }

        match gateway.delete(&department.id).await {
            Ok(()) => {
                relay.notify(
                    Notification::success(format!(
                        "Department \"{}\" deleted successfully!",
                        department.name
                    ))
                    .titled("Department Deleted"),
                );
                self.cache.apply_delete(&department.id);
                DeleteOutcome::Deleted
            }
            Err(err) => {
                warn!(error = %err, "department delete failed");
                relay.notify(
                    Notification::error("Failed to delete department. Please try again.")
                        .titled("Deletion Failed"),
                );
                DeleteOutcome::Failed(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_name_and_description() {
        let errors = validate(&DepartmentDraft {
            name: "  ".into(),
            description: String::new(),
            is_active: true,
        });
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name"), Some(&"Department name is required"));
    }

    fn department(id: &str, name: &str, predefined: bool, users: u32) -> Department {
        Department {
            id: id.into(),
            name: name.into(),
            description: format!("{} team", name),
            is_active: !predefined || users > 0,
            is_predefined: predefined,
            user_count: users,
        }
    }

    #[test]
    fn test_grid_searches_and_sorts_snapshot() -> Result<()> {
        let mut admin = DepartmentAdmin::new();
        admin.load(vec![
            department("1", "Sales", true, 3),
            department("2", "Visa", false, 0),
            department("3", "Admissions", true, 5),
        ]);

        let mut grid = admin.grid()?;
        assert_eq!(grid.title(), "Departments");
        assert_eq!(grid.total_filtered(), 3);

        assert!(grid.toggle_sort("name"));
        let names: Vec<&str> = grid.visible_rows().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Admissions", "Sales", "Visa"]);

        grid.set_search("visa");
        assert_eq!(grid.total_filtered(), 1);
        assert_eq!(grid.export_file_name(), "departments_export.csv");
        assert!(grid.export_csv()?.content.contains("Visa team"));
        Ok(())
    }

    #[test]
    fn test_summary_counts() {
        let mut admin = DepartmentAdmin::new();
        admin.load(vec![
            Department {
                id: "1".into(),
                name: "Sales".into(),
                description: String::new(),
                is_active: true,
                is_predefined: true,
                user_count: 3,
            },
            Department {
                id: "2".into(),
                name: "Visa".into(),
                description: String::new(),
                is_active: true,
                is_predefined: false,
                user_count: 0,
            },
        ]);
        let summary = admin.summary();
        assert_eq!(
            (summary.total_count, summary.predefined_count, summary.custom_count),
            (2, 1, 1)
        );
    }
}
