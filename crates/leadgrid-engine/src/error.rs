use std::fmt;

/// Result type for leadgrid-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the grid engine
#[derive(Debug)]
pub enum Error {
    /// Two columns registered with the same id
    DuplicateColumn(String),

    /// Column id not present in the model
    UnknownColumn(String),

    /// Page size must be at least one row
    InvalidPageSize(usize),

    /// Nothing loaded to export
    EmptyExport,

    /// Row could not be flattened into CSV fields
    Export(String),

    /// CSV writer failure
    Csv(csv::Error),

    /// Row serialization failure
    Json(serde_json::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateColumn(id) => write!(f, "Duplicate column id: {}", id),
            Error::UnknownColumn(id) => write!(f, "Unknown column: {}", id),
            Error::InvalidPageSize(size) => write!(f, "Invalid page size: {}", size),
            Error::EmptyExport => write!(f, "No data to export"),
            Error::Export(msg) => write!(f, "Export error: {}", msg),
            Error::Csv(err) => write!(f, "CSV error: {}", err),
            Error::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Csv(err) => Some(err),
            Error::Json(err) => Some(err),
            Error::DuplicateColumn(_)
            | Error::UnknownColumn(_)
            | Error::InvalidPageSize(_)
            | Error::EmptyExport
            | Error::Export(_) => None,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Csv(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}
