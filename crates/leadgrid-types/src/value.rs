use chrono::{DateTime, Utc};
use serde::Serialize;

/// Value produced by a column accessor.
///
/// Accessors are pure projections of a row; anything interactive lives in
/// the column's cell behavior instead.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Text(String),
    Number(f64),
    Date(DateTime<Utc>),
    List(Vec<String>),
    Bool(bool),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Borrow the text payload of a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Plain rendering used by text cells and filter chips.
    pub fn display(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    n.to_string()
                }
            }
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::List(items) => items.join(", "),
            CellValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<&String> for CellValue {
    fn from(s: &String) -> Self {
        CellValue::Text(s.clone())
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(d: DateTime<Utc>) -> Self {
        CellValue::Date(d)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<Vec<String>> for CellValue {
    fn from(items: Vec<String>) -> Self {
        CellValue::List(items)
    }
}
