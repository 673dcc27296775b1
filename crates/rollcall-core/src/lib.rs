pub mod domain;
pub mod error;
pub mod schema;

pub use domain::*;
pub use error::CoreError;
pub use schema::{detect_columns, ColumnRoles, KeywordSet, SchemaKeywords, StatusColumn};
