use serde::{Deserialize, Serialize};

/// Which classification field of a lead an editor mutates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Stage,
    Status,
}

impl Classification {
    /// Lowercase noun used inside messages ("stage").
    pub fn noun(&self) -> &'static str {
        match self {
            Classification::Stage => "stage",
            Classification::Status => "status",
        }
    }

    /// Capitalized noun used in titles ("Stage").
    pub fn title(&self) -> &'static str {
        match self {
            Classification::Stage => "Stage",
            Classification::Status => "Status",
        }
    }

    /// Column id carrying this classification in the leads grid.
    pub fn column_id(&self) -> &'static str {
        self.noun()
    }
}

/// One selectable stage or status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationOption {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl ClassificationOption {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            color: None,
            sort_order: 0,
            is_active: true,
        }
    }
}

/// Resolve the display name for a classification value, falling back to the raw value.
pub fn display_name_for<'a>(options: &'a [ClassificationOption], value: &'a str) -> &'a str {
    options
        .iter()
        .find(|opt| opt.name == value)
        .map(|opt| opt.display_name.as_str())
        .unwrap_or(value)
}

/// `GET /stages/active` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagesResponse {
    pub stages: Vec<ClassificationOption>,
}

/// `GET /statuses/active` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusesResponse {
    pub statuses: Vec<ClassificationOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let options = vec![ClassificationOption::new("counselling", "Counselling")];
        assert_eq!(display_name_for(&options, "counselling"), "Counselling");
        assert_eq!(display_name_for(&options, "unknown"), "unknown");
    }
}
