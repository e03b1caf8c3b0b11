use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use crate::bail;
use crate::error::{DbResult, ErrorKind};
use crate::store::cell::RowOrigin;
use crate::store::{SchemaHandle, ValueCell};
use crate::types::{ColumnSpec, CompositeKey, RowId, Value};

/// A set of rows, compared by row identity.
pub type RowSet = HashSet<RowRef>;

/// One record: named column values addressed by a primary key.
///
/// Rows are immutable once built. The primary key tuple is read from the cells on demand, in the
/// order of the owning table's primary key columns.
pub struct Row {
    schema: SchemaHandle,
    origin: Arc<RowOrigin>,
    cells: HashMap<Arc<str>, ValueCell>,
}

impl Row {
    /// Builds a row that belongs to no table or schema.
    ///
    /// Useful for inspecting column values; dereferences and reverse lookups fail with
    /// [`ErrorKind::SchemaDropped`].
    pub fn new<I, K, V>(primary_key: impl Into<ColumnSpec>, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::attached(
            SchemaHandle::detached(),
            Arc::from(""),
            primary_key.into(),
            values,
        )
    }

    pub(crate) fn attached<I, K, V>(
        schema: SchemaHandle,
        table: Arc<str>,
        primary_key: ColumnSpec,
        values: I,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let values: Vec<(Arc<str>, Value)> = values
            .into_iter()
            .map(|(column, value)| {
                let column: String = column.into();
                (Arc::from(column), value.into())
            })
            .collect();

        let key = primary_key
            .iter()
            .map(|name| {
                values
                    .iter()
                    .rev()
                    .find(|(column, _)| &**column == name)
                    .map(|(_, value)| value.clone())
            })
            .collect::<Option<Vec<_>>>()
            .map(CompositeKey::new);

        let origin = Arc::new(RowOrigin {
            table,
            primary_key,
            key,
        });

        let cells = values
            .into_iter()
            .map(|(column, value)| {
                let cell = ValueCell::new(schema.clone(), origin.clone(), column.clone(), value);
                (column, cell)
            })
            .collect();

        Self {
            schema,
            origin,
            cells,
        }
    }

    /// Returns the name of the table this row was added to, empty for detached rows.
    pub fn table_name(&self) -> &str {
        &self.origin.table
    }

    pub fn primary_key(&self) -> &ColumnSpec {
        &self.origin.primary_key
    }

    pub fn schema(&self) -> &SchemaHandle {
        &self.schema
    }

    /// Returns the cell of column `name`.
    ///
    /// Fails with [`ErrorKind::ColumnNotFound`], listing the available columns in the detail.
    pub fn column(&self, name: &str) -> DbResult<&ValueCell> {
        match self.cells.get(name) {
            Some(cell) => Ok(cell),
            None => bail!(
                ErrorKind::ColumnNotFound,
                "Row has no such column",
                format!(
                    "column: {name}, table: {}, available: [{}]",
                    self.origin.table,
                    self.columns().join(", ")
                )
            ),
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.cells.contains_key(name)
    }

    /// Returns the column names of this row, sorted.
    pub fn columns(&self) -> Vec<&str> {
        let mut columns: Vec<&str> = self.cells.keys().map(|column| &**column).collect();
        columns.sort_unstable();
        columns
    }

    /// Returns the raw values of `columns`, in the given order.
    ///
    /// A column repeated in `columns` is repeated in the output.
    pub fn column_values(&self, columns: impl Into<ColumnSpec>) -> DbResult<CompositeKey> {
        let columns = columns.into();
        let values = columns
            .iter()
            .map(|name| self.column(name).map(|cell| cell.value().clone()))
            .collect::<DbResult<Vec<_>>>()?;

        Ok(CompositeKey::new(values))
    }

    /// Returns the primary key tuple of this row.
    pub fn primary_key_value(&self) -> DbResult<CompositeKey> {
        self.column_values(&self.origin.primary_key)
    }

    /// Returns the identifier under which the owning table exposes this row.
    pub fn row_id(&self) -> DbResult<RowId> {
        Ok(self.primary_key_value()?.to_row_id())
    }

    /// Dereferences the value of `column` into table `table`.
    ///
    /// Shorthand for `row.column(column)?.deref(table)`.
    pub fn deref_column(&self, column: &str, table: &str) -> DbResult<RowRef> {
        self.column(column)?.deref(table)
    }

    /// Returns the rows of `table` whose values under `columns` equal this row's primary key.
    ///
    /// This is the reverse of [`ValueCell::deref`]: it answers "which rows point at me".
    /// `columns` must have as many columns as this row's primary key.
    pub fn find_refs(&self, table: &str, columns: impl Into<ColumnSpec>) -> DbResult<RowSet> {
        self.schema
            .upgrade()?
            .table(table)?
            .find_rows(columns, self.primary_key_value()?)
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut cells: Vec<_> = self.cells.iter().collect();
        cells.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));

        f.debug_struct("Row")
            .field("table", &self.origin.table)
            .field("primary_key", &self.origin.primary_key.to_string())
            .field(
                "cells",
                &DebugCells {
                    cells: cells.as_slice(),
                },
            )
            .finish()
    }
}

struct DebugCells<'a> {
    cells: &'a [(&'a Arc<str>, &'a ValueCell)],
}

impl fmt::Debug for DebugCells<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.cells.iter().map(|(column, cell)| (column, cell.value())))
            .finish()
    }
}

/// Shared handle to a stored [`Row`].
///
/// Equality and hashing use the identity of the row, not its values: two distinct rows with
/// identical columns are different members of a [`RowSet`].
#[derive(Clone)]
pub struct RowRef(Arc<Row>);

impl RowRef {
    pub(crate) fn new(row: Row) -> Self {
        Self(Arc::new(row))
    }
}

impl Deref for RowRef {
    type Target = Row;

    fn deref(&self) -> &Row {
        &self.0
    }
}

impl PartialEq for RowRef {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for RowRef {}

impl Hash for RowRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
