use serde::{Deserialize, Serialize};

use crate::GridRow;

/// Organizational department managed from the admin screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Predefined (system) departments cannot be deleted by admins.
    #[serde(default)]
    pub is_predefined: bool,
    #[serde(default)]
    pub user_count: u32,
}

fn default_active() -> bool {
    true
}

impl GridRow for Department {
    fn row_id(&self) -> &str {
        &self.id
    }
}

/// Payload for creating a department
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentDraft {
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

/// Departments listing with the counters shown on the admin dashboard cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentList {
    pub departments: Vec<Department>,
    #[serde(default)]
    pub total_count: usize,
    #[serde(default)]
    pub predefined_count: usize,
    #[serde(default)]
    pub custom_count: usize,
}

impl DepartmentList {
    /// Build a listing, deriving the counters from the rows.
    pub fn from_departments(departments: Vec<Department>) -> Self {
        let predefined_count = departments.iter().filter(|d| d.is_predefined).count();
        Self {
            total_count: departments.len(),
            custom_count: departments.len() - predefined_count,
            predefined_count,
            departments,
        }
    }
}
