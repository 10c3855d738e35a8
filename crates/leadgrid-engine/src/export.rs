use serde::Serialize;
use serde_json::Value;

use crate::{Error, Result};

pub const CSV_MIME_TYPE: &str = "text/csv";

/// A ready-to-save CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CsvDownload {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
}

/// `<lowercased title>_export.csv`
pub fn export_file_name(title: &str) -> String {
    format!("{}_export.csv", title.to_lowercase())
}

/// Serialize rows to CSV.
///
/// The header is the field names of the first row, in declaration order;
/// later rows are projected onto that header. Nulls and missing fields are
/// empty, lists are comma-joined, and fields containing a delimiter, quote
/// or newline are double-quoted.
pub fn rows_to_csv<T: Serialize>(rows: &[T]) -> Result<String> {
    let first = rows.first().ok_or(Error::EmptyExport)?;
    let headers: Vec<String> = match serde_json::to_value(first)? {
        Value::Object(map) => map.keys().cloned().collect(),
        _ => return Err(Error::Export("rows must serialize to objects".to_string())),
    };

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(&headers)?;

    for row in rows {
        let value = serde_json::to_value(row)?;
        let Value::Object(map) = value else {
            return Err(Error::Export("rows must serialize to objects".to_string()));
        };
        let record: Vec<String> = headers
            .iter()
            .map(|h| map.get(h).map(field_text).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Export(e.error().to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Export(e.to_string()))
}

fn field_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(field_text).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Row {
        id: u32,
        full_name: &'static str,
        city: Option<&'static str>,
        tags: Vec<&'static str>,
    }

    #[test]
    fn test_header_from_first_row_and_quoting() {
        let rows = vec![
            Row { id: 1, full_name: "Rao, Asha", city: None, tags: vec!["vip", "hot"] },
            Row { id: 2, full_name: "Dev", city: Some("Pune"), tags: vec![] },
        ];
        let csv = rows_to_csv(&rows).unwrap();
        assert_eq!(
            csv,
            "id,fullName,city,tags\n1,\"Rao, Asha\",,\"vip,hot\"\n2,Dev,Pune,\n"
        );
    }

    #[test]
    fn test_empty_collection_is_an_error() {
        let rows: Vec<Row> = Vec::new();
        assert!(matches!(rows_to_csv(&rows), Err(Error::EmptyExport)));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(export_file_name("Leads"), "leads_export.csv");
        assert_eq!(export_file_name("Departments"), "departments_export.csv");
    }
}
