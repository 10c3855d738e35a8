use std::cmp::Ordering;
use std::str::FromStr;

use leadgrid_types::CellValue;
use serde::{Deserialize, Serialize};

/// A single sort directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDirective {
    pub column_id: String,
    pub descending: bool,
}

impl SortDirective {
    pub fn asc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            descending: false,
        }
    }

    pub fn desc(column_id: impl Into<String>) -> Self {
        Self {
            column_id: column_id.into(),
            descending: true,
        }
    }
}

/// Parses `column` or `column:asc` / `column:desc`.
impl FromStr for SortDirective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (column, direction) = match s.split_once(':') {
            Some((column, direction)) => (column, direction),
            None => (s, "asc"),
        };
        if column.is_empty() {
            return Err(format!("Invalid sort directive: {}", s));
        }
        match direction {
            "asc" => Ok(SortDirective::asc(column)),
            "desc" => Ok(SortDirective::desc(column)),
            _ => Err(format!("Unknown sort direction: {}", direction)),
        }
    }
}

/// Header indicator for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortIndicator {
    Unsorted,
    Ascending,
    Descending,
}

impl SortIndicator {
    pub fn arrow(&self) -> &'static str {
        match self {
            SortIndicator::Unsorted => "↕",
            SortIndicator::Ascending => "↑",
            SortIndicator::Descending => "↓",
        }
    }
}

/// At most one active sort directive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub directive: Option<SortDirective>,
}

impl SortState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by(directive: SortDirective) -> Self {
        Self {
            directive: Some(directive),
        }
    }

    /// Advance the cycle unsorted → ascending → descending → unsorted.
    /// Another column replaces the current directive.
    pub fn toggle(&mut self, column_id: &str) {
        self.directive = match self.directive.take() {
            Some(current) if current.column_id == column_id => {
                if current.descending {
                    None
                } else {
                    Some(SortDirective::desc(column_id))
                }
            }
            _ => Some(SortDirective::asc(column_id)),
        };
    }

    pub fn clear(&mut self) {
        self.directive = None;
    }

    pub fn indicator(&self, column_id: &str) -> SortIndicator {
        match &self.directive {
            Some(d) if d.column_id == column_id && d.descending => SortIndicator::Descending,
            Some(d) if d.column_id == column_id => SortIndicator::Ascending,
            _ => SortIndicator::Unsorted,
        }
    }
}

fn type_rank(value: &CellValue) -> u8 {
    match value {
        CellValue::Bool(_) => 0,
        CellValue::Number(_) => 1,
        CellValue::Date(_) => 2,
        CellValue::Text(_) => 3,
        CellValue::List(_) => 4,
        CellValue::Null => 5,
    }
}

/// Ascending comparison of two non-null cell values.
///
/// Text compares case-insensitively, dates chronologically and numbers
/// numerically; mixed kinds fall back to a fixed kind order.
pub fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Text(a), CellValue::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
        (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
        (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
        (CellValue::List(a), CellValue::List(b)) => {
            a.join(",").to_lowercase().cmp(&b.join(",").to_lowercase())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Directional comparison with nulls placed last regardless of direction.
pub fn compare_directed(a: &CellValue, b: &CellValue, descending: bool) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = compare_values(a, b);
            if descending { ord.reverse() } else { ord }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_cycle() {
        let mut sort = SortState::new();
        sort.toggle("name");
        assert_eq!(sort.indicator("name"), SortIndicator::Ascending);
        sort.toggle("name");
        assert_eq!(sort.indicator("name"), SortIndicator::Descending);
        sort.toggle("name");
        assert_eq!(sort.directive, None);
    }

    #[test]
    fn test_other_column_replaces_directive() {
        let mut sort = SortState::by(SortDirective::desc("name"));
        sort.toggle("createdAt");
        assert_eq!(sort.directive, Some(SortDirective::asc("createdAt")));
        assert_eq!(sort.indicator("name"), SortIndicator::Unsorted);
    }

    #[test]
    fn test_nulls_last_both_directions() {
        let null = CellValue::Null;
        let text = CellValue::from("b");
        assert_eq!(compare_directed(&null, &text, false), Ordering::Greater);
        assert_eq!(compare_directed(&null, &text, true), Ordering::Greater);
    }

    #[test]
    fn test_text_compares_case_insensitively() {
        assert_eq!(
            compare_values(&"alpha".into(), &"Beta".into()),
            Ordering::Less
        );
    }

    #[test]
    fn test_parse_directive() {
        assert_eq!("name".parse(), Ok(SortDirective::asc("name")));
        assert_eq!("createdAt:desc".parse(), Ok(SortDirective::desc("createdAt")));
        assert!("name:sideways".parse::<SortDirective>().is_err());
    }
}
