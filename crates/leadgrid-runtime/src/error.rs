use std::fmt;

use crate::gateway::MutationError;

/// Result type for leadgrid-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the runtime layer
#[derive(Debug)]
pub enum Error {
    /// Grid engine error
    Engine(leadgrid_engine::Error),

    /// Entity decoding error
    Types(leadgrid_types::Error),

    /// Gateway call failed
    Mutation(MutationError),

    /// IO operation failed
    Io(std::io::Error),

    /// Configuration error
    Config(String),

    /// Persisted session could not be read or written
    Session(String),

    /// Invalid operation or state
    InvalidOperation(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Engine(err) => write!(f, "Grid error: {}", err),
            Error::Types(err) => write!(f, "Data error: {}", err),
            Error::Mutation(err) => write!(f, "Request failed: {}", err),
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Session(msg) => write!(f, "Session error: {}", msg),
            Error::InvalidOperation(msg) => write!(f, "Invalid operation: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Engine(err) => Some(err),
            Error::Types(err) => Some(err),
            Error::Mutation(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Config(_) | Error::Session(_) | Error::InvalidOperation(_) => None,
        }
    }
}

impl From<leadgrid_engine::Error> for Error {
    fn from(err: leadgrid_engine::Error) -> Self {
        Error::Engine(err)
    }
}

impl From<leadgrid_types::Error> for Error {
    fn from(err: leadgrid_types::Error) -> Self {
        Error::Types(err)
    }
}

impl From<MutationError> for Error {
    fn from(err: MutationError) -> Self {
        Error::Mutation(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Session(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}
