//! Shared configuration types.

mod base;
mod schema;

pub use base::ValidationError;
pub use schema::{ColumnList, SchemaConfig, TableConfig};
