use serde::Serialize;

/// A record that can be displayed as one grid row.
///
/// The identifier must be stable for the lifetime of the record. Everything
/// else is read through column accessors, and `Serialize` supplies the field
/// names and values used by CSV export.
pub trait GridRow: Serialize {
    fn row_id(&self) -> &str;
}
