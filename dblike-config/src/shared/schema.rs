use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::shared::ValidationError;

/// Declaration of every table of a schema.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchemaConfig {
    /// Tables in declaration order.
    pub tables: Vec<TableConfig>,
}

impl SchemaConfig {
    /// Validates the declarations.
    ///
    /// Ensures there is at least one table, table names are non-empty and unique, and every
    /// primary key names at least one column.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tables.is_empty() {
            return Err(ValidationError::NoTables);
        }

        let mut seen = HashSet::with_capacity(self.tables.len());
        for (position, table) in self.tables.iter().enumerate() {
            if table.name.trim().is_empty() {
                return Err(ValidationError::EmptyTableName(position));
            }
            if !seen.insert(table.name.as_str()) {
                return Err(ValidationError::DuplicateTable(table.name.clone()));
            }
            table.validate()?;
        }

        Ok(())
    }
}

/// Declaration of one table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TableConfig {
    /// Name used to look the table up.
    pub name: String,
    /// Primary key columns, either `"a b"` or `["a", "b"]`.
    pub primary_key: ColumnList,
}

impl TableConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        let names = self.primary_key.names();
        if names.is_empty() {
            return Err(ValidationError::EmptyPrimaryKey(self.name.clone()));
        }

        if let ColumnList::Names(columns) = &self.primary_key {
            if let Some(column) = columns
                .iter()
                .find(|column| column.is_empty() || column.contains(char::is_whitespace))
            {
                return Err(ValidationError::InvalidColumnName {
                    table: self.name.clone(),
                    column: column.clone(),
                });
            }
        }

        Ok(())
    }
}

/// A list of column names, written either as one whitespace-delimited string or as a list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnList {
    Delimited(String),
    Names(Vec<String>),
}

impl ColumnList {
    /// Returns the column names in order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            ColumnList::Delimited(columns) => columns.split_whitespace().collect(),
            ColumnList::Names(columns) => columns.iter().map(String::as_str).collect(),
        }
    }
}
