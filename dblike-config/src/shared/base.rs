use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The schema declares no tables.
    #[error("`tables` must declare at least one table")]
    NoTables,
    /// A table has an empty name.
    #[error("table #{0} has an empty `name`")]
    EmptyTableName(usize),
    /// Two tables share a name.
    #[error("table `{0}` is declared more than once")]
    DuplicateTable(String),
    /// A table has no primary key columns.
    #[error("table `{0}` has an empty `primary_key`")]
    EmptyPrimaryKey(String),
    /// A primary key column name is blank or contains whitespace.
    #[error("table `{table}` has an invalid primary key column name `{column}`")]
    InvalidColumnName { table: String, column: String },
}
