pub mod api;
pub mod domain;
pub mod error;
pub mod row;
pub mod value;

pub use api::*;
pub use domain::*;
pub use error::{Error, Result};
pub use row::GridRow;
pub use value::CellValue;
