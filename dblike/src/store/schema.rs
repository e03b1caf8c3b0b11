use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Weak};

use dblike_config::SchemaConfig;
use tracing::info;

use crate::bail;
use crate::error::{DbResult, ErrorKind};
use crate::store::Table;
use crate::types::ColumnSpec;

/// Declaration of one table: its name and primary key columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDef {
    pub name: String,
    pub primary_key: ColumnSpec,
}

impl TableDef {
    pub fn new(name: impl Into<String>, primary_key: impl Into<ColumnSpec>) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.into(),
        }
    }
}

/// Tables of a schema, in declaration order.
#[derive(Debug)]
struct Inner {
    tables: Vec<Table>,
    positions: HashMap<String, usize>,
}

/// A fixed, named set of tables.
///
/// [`Schema`] is a cheap-to-clone handle: clones share the same tables. The set of tables is
/// fixed at construction time. Tables, rows and value cells reach back to their schema through
/// a non-owning [`SchemaHandle`], which they only use to resolve table names.
#[derive(Clone)]
pub struct Schema {
    inner: Arc<Inner>,
}

impl Schema {
    /// Creates a schema with one empty table per declaration.
    ///
    /// Fails with [`ErrorKind::ContractViolation`] if a table name is empty or declared twice,
    /// or if a primary key has no columns.
    pub fn new(table_defs: Vec<TableDef>) -> DbResult<Self> {
        let mut seen = HashSet::with_capacity(table_defs.len());
        for table_def in &table_defs {
            if table_def.name.is_empty() {
                bail!(ErrorKind::ContractViolation, "Table name is empty");
            }
            if !seen.insert(table_def.name.as_str()) {
                bail!(
                    ErrorKind::ContractViolation,
                    "Table is declared more than once",
                    format!("table: {}", table_def.name)
                );
            }
            if table_def.primary_key.is_empty() {
                bail!(
                    ErrorKind::ContractViolation,
                    "Primary key has no columns",
                    format!("table: {}", table_def.name)
                );
            }
        }

        let inner = Arc::new_cyclic(|weak| {
            let handle = SchemaHandle {
                inner: weak.clone(),
            };

            let mut tables = Vec::with_capacity(table_defs.len());
            let mut positions = HashMap::with_capacity(table_defs.len());
            for (position, table_def) in table_defs.into_iter().enumerate() {
                positions.insert(table_def.name.clone(), position);
                tables.push(Table::attached(
                    handle.clone(),
                    &table_def.name,
                    table_def.primary_key,
                ));
            }

            Inner { tables, positions }
        });

        info!(tables = inner.tables.len(), "schema created");

        Ok(Self { inner })
    }

    /// Creates a schema from a validated [`SchemaConfig`].
    pub fn from_config(config: &SchemaConfig) -> DbResult<Self> {
        config.validate()?;

        let table_defs = config
            .tables
            .iter()
            .map(|table| {
                TableDef::new(
                    table.name.clone(),
                    ColumnSpec::from_names(table.primary_key.names()),
                )
            })
            .collect();

        Self::new(table_defs)
    }

    /// Returns the table named `name`.
    pub fn table(&self, name: &str) -> DbResult<&Table> {
        match self.inner.positions.get(name) {
            Some(&position) => Ok(&self.inner.tables[position]),
            None => bail!(
                ErrorKind::TableNotFound,
                "Table is not declared in the schema",
                format!("table: {name}, declared: [{}]", self.table_names().join(", "))
            ),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.positions.contains_key(name)
    }

    /// Returns all tables in declaration order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.inner.tables.iter()
    }

    /// Returns all table names in declaration order.
    pub fn table_names(&self) -> Vec<&str> {
        self.inner.tables.iter().map(Table::name).collect()
    }

    /// Returns a non-owning handle to this schema.
    pub fn handle(&self) -> SchemaHandle {
        SchemaHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("tables", &self.table_names())
            .finish()
    }
}

/// Non-owning reference from a table, row or value cell back to its [`Schema`].
///
/// A handle never keeps the schema alive. Resolving it after every [`Schema`] clone has been
/// dropped fails with [`ErrorKind::SchemaDropped`], as does resolving a detached handle.
#[derive(Clone, Default)]
pub struct SchemaHandle {
    inner: Weak<Inner>,
}

impl SchemaHandle {
    /// Returns a handle that is not attached to any schema.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Resolves the handle to its schema.
    pub fn upgrade(&self) -> DbResult<Schema> {
        match self.inner.upgrade() {
            Some(inner) => Ok(Schema { inner }),
            None => bail!(
                ErrorKind::SchemaDropped,
                "The schema is not available for name resolution"
            ),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl fmt::Debug for SchemaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}
