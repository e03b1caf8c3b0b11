use std::fmt;
use std::sync::Arc;

use crate::bail;
use crate::error::{DbResult, ErrorKind};
use crate::store::{RowRef, SchemaHandle};
use crate::types::{ColumnSpec, CompositeKey, Value};

/// Table and primary key of the row a cell belongs to, shared by all cells of that row.
#[derive(Debug)]
pub(crate) struct RowOrigin {
    pub(crate) table: Arc<str>,
    pub(crate) primary_key: ColumnSpec,
    /// `None` when the row lacks one of its primary key columns.
    pub(crate) key: Option<CompositeKey>,
}

impl fmt::Display for RowOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) ", self.table, self.primary_key)?;
        match &self.key {
            Some(key) => write!(f, "{key}"),
            None => f.write_str("?"),
        }
    }
}

/// One column value of a row, resolvable as a key into another table.
pub struct ValueCell {
    schema: SchemaHandle,
    origin: Arc<RowOrigin>,
    column: Arc<str>,
    value: Value,
}

impl ValueCell {
    pub(crate) fn new(
        schema: SchemaHandle,
        origin: Arc<RowOrigin>,
        column: Arc<str>,
        value: Value,
    ) -> Self {
        Self {
            schema,
            origin,
            column,
            value,
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn schema(&self) -> &SchemaHandle {
        &self.schema
    }

    /// See [`Value::is_truthy`].
    pub fn is_truthy(&self) -> bool {
        self.value.is_truthy()
    }

    /// Returns the row of table `table` whose primary key is this value.
    ///
    /// Fails with [`ErrorKind::FalsyReference`] when the value is falsy, since an unset reference
    /// must not resolve to anything. Fails with [`ErrorKind::TableNotFound`] if the schema has no
    /// such table and with [`ErrorKind::BrokenReference`] if the table has no such row.
    pub fn deref(&self, table: &str) -> DbResult<RowRef> {
        if !self.value.is_truthy() {
            bail!(
                ErrorKind::FalsyReference,
                "Cannot dereference a falsy value",
                format!(
                    "source: {}, column: {} = {}, target: {table}",
                    self.origin, self.column, self.value
                )
            );
        }

        let schema = self.schema.upgrade()?;
        let target = schema.table(table)?;
        let key = CompositeKey::new(vec![self.value.clone()]);

        match target.get_by_key(&key) {
            Ok(row) => Ok(row),
            Err(err) if err.kind() == ErrorKind::RowNotFound => bail!(
                ErrorKind::BrokenReference,
                "Referenced row does not exist",
                format!(
                    "source: {}, column: {} = {}, target: {table} ({}) {key}",
                    self.origin,
                    self.column,
                    self.value,
                    target.primary_key()
                )
            ),
            Err(err) => Err(err),
        }
    }
}

impl fmt::Debug for ValueCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCell")
            .field("column", &self.column)
            .field("value", &self.value)
            .finish()
    }
}
