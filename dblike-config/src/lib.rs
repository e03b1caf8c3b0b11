//! Configuration for dblike schemas.
//!
//! Schema declarations (table names and primary key columns) can be written in YAML or JSON and
//! loaded with [`load_schema_config`] or [`load_schema_config_from_file`].

mod load;
mod shared;

pub use load::{LoadConfigError, load_schema_config, load_schema_config_from_file};
pub use shared::{ColumnList, SchemaConfig, TableConfig, ValidationError};
