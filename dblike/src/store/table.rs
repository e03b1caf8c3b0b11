use std::collections::HashMap;
use std::error;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, trace};

use crate::bail;
use crate::db_error;
use crate::error::{DbResult, ErrorKind};
use crate::index::{IndexStats, SecondaryIndex};
use crate::store::{Row, RowRef, RowSet, SchemaHandle};
use crate::types::{ColumnSpec, CompositeKey, RowId, Value};

/// How [`Table::find_rows_with`] evaluates an equality filter.
///
/// Both strategies return the same rows for the same table state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LookupStrategy {
    /// Use the cached secondary index for the filter columns, building it first if needed.
    #[default]
    Index,
    /// Compare every row against the filter, leaving the index cache untouched.
    Scan,
}

/// Both rows involved in an insert rejected because of a primary key collision.
///
/// Attached as the source of [`ErrorKind::DuplicateKey`] errors, see
/// [`crate::error::DbError::duplicate_row`].
#[derive(Debug, Clone)]
pub struct DuplicateRow {
    pub table: String,
    pub key: CompositeKey,
    pub existing: RowRef,
    pub rejected: RowRef,
}

impl fmt::Display for DuplicateRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "duplicate row in table `{}` for key {}: existing {:?}, rejected {:?}",
            self.table, self.key, self.existing, self.rejected
        )
    }
}

impl error::Error for DuplicateRow {}

/// Rows and derived state of a [`Table`].
#[derive(Debug, Default)]
struct Inner {
    rows: HashMap<CompositeKey, RowRef>,
    /// Secondary indexes keyed by their filter columns. Cleared on every insert.
    indexes: HashMap<ColumnSpec, SecondaryIndex>,
    stats: IndexStats,
}

impl Inner {
    /// Drops every cached index.
    fn clear_indexes(&mut self, table: &str) {
        if self.indexes.is_empty() {
            return;
        }

        debug!(table, indexes = self.indexes.len(), "invalidating secondary indexes");
        self.indexes.clear();
        self.stats.invalidation_count += 1;
    }

    fn build_index(&mut self, table: &str, columns: &ColumnSpec) -> DbResult<()> {
        let index = SecondaryIndex::build(columns.clone(), self.rows.values())?;

        debug!(
            table,
            columns = %columns,
            buckets = index.len(),
            rows = self.rows.len(),
            "built secondary index"
        );

        self.indexes.insert(columns.clone(), index);
        self.stats.build_count += 1;

        Ok(())
    }

    fn index_find_rows(
        &mut self,
        table: &str,
        columns: &ColumnSpec,
        key: &CompositeKey,
    ) -> DbResult<RowSet> {
        let Some(index) = self.indexes.get(columns) else {
            bail!(
                ErrorKind::IndexNotFound,
                "No secondary index exists for the columns",
                format!("table: {table}, columns: {columns}")
            );
        };

        self.stats.lookup_count += 1;
        match index.get(key) {
            Some(rows) => Ok(rows.clone()),
            None => {
                self.stats.lookup_miss_count += 1;
                Ok(RowSet::new())
            }
        }
    }

    fn scan_find_rows(&mut self, columns: &ColumnSpec, key: &CompositeKey) -> DbResult<RowSet> {
        self.stats.scan_count += 1;

        let mut found = RowSet::new();
        for row in self.rows.values() {
            if row.column_values(columns)? == *key {
                found.insert(row.clone());
            }
        }

        Ok(found)
    }
}

/// A keyed collection of rows with lazily built secondary indexes.
///
/// Rows are unique by primary key and are never updated or removed. Equality queries go through
/// a per-column-spec index that is built on first use and discarded whenever a row is added.
pub struct Table {
    name: Arc<str>,
    primary_key: ColumnSpec,
    schema: SchemaHandle,
    inner: RwLock<Inner>,
}

impl Table {
    /// Creates an empty table that does not belong to any schema.
    ///
    /// Rows of a detached table can be queried, but dereferences and reverse lookups from them
    /// fail with [`ErrorKind::SchemaDropped`].
    pub fn new(name: impl Into<String>, primary_key: impl Into<ColumnSpec>) -> DbResult<Self> {
        let primary_key = primary_key.into();
        if primary_key.is_empty() {
            bail!(ErrorKind::ContractViolation, "Primary key has no columns");
        }

        let name: String = name.into();
        Ok(Self::attached(SchemaHandle::detached(), &name, primary_key))
    }

    pub(crate) fn attached(schema: SchemaHandle, name: &str, primary_key: ColumnSpec) -> Self {
        Self {
            name: Arc::from(name),
            primary_key,
            schema,
            inner: RwLock::new(Inner::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key(&self) -> &ColumnSpec {
        &self.primary_key
    }

    pub fn schema(&self) -> &SchemaHandle {
        &self.schema
    }

    pub fn len(&self) -> usize {
        self.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().rows.is_empty()
    }

    /// Adds a row built from `(column, value)` pairs and returns it.
    ///
    /// Every cached secondary index is dropped first. Fails with
    /// [`ErrorKind::ContractViolation`] if a primary key column is missing from the values and
    /// with [`ErrorKind::DuplicateKey`] if another row already has the same primary key; in both
    /// cases no row is stored.
    pub fn add_row<I, K, V>(&self, values: I) -> DbResult<RowRef>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let row = Row::attached(
            self.schema.clone(),
            self.name.clone(),
            self.primary_key.clone(),
            values,
        );

        let key = match row.primary_key_value() {
            Ok(key) => key,
            Err(err) if err.kind() == ErrorKind::ColumnNotFound => {
                bail!(
                    ErrorKind::ContractViolation,
                    "Row is missing a primary key column",
                    format!(
                        "table: {}, primary key: {}, columns: [{}]",
                        self.name,
                        self.primary_key,
                        row.columns().join(", ")
                    )
                );
            }
            Err(err) => return Err(err),
        };

        let row = RowRef::new(row);

        let mut inner = self.write();
        inner.clear_indexes(&self.name);

        if let Some(existing) = inner.rows.get(&key) {
            let duplicate = DuplicateRow {
                table: self.name.to_string(),
                key: key.clone(),
                existing: existing.clone(),
                rejected: row,
            };

            return Err(db_error!(
                ErrorKind::DuplicateKey,
                "A row with the same primary key already exists",
                detail = format!("table: {}, primary key: {}, key: {key}", self.name, self.primary_key),
                source: duplicate
            ));
        }

        trace!(table = %self.name, key = %key, "row added");
        inner.rows.insert(key, row.clone());

        Ok(row)
    }

    /// Returns the row identified by `row_id`.
    ///
    /// Fails with [`ErrorKind::ContractViolation`] for a one-element [`RowId::Composite`] and
    /// with [`ErrorKind::RowNotFound`] if no row has that primary key.
    pub fn get(&self, row_id: impl Into<RowId>) -> DbResult<RowRef> {
        let key = row_id.into().into_key()?;
        self.get_by_key(&key)
    }

    /// Returns the row whose primary key tuple equals `key`.
    pub fn get_by_key(&self, key: &CompositeKey) -> DbResult<RowRef> {
        match self.read().rows.get(key) {
            Some(row) => Ok(row.clone()),
            None => bail!(
                ErrorKind::RowNotFound,
                "No row has the requested primary key",
                format!(
                    "table: {}, primary key: {}, key: {key}",
                    self.name, self.primary_key
                )
            ),
        }
    }

    /// Returns whether a row with the primary key `row_id` exists.
    ///
    /// A one-element [`RowId::Composite`] is looked up as the one-element key it spells out.
    pub fn contains(&self, row_id: impl Into<RowId>) -> bool {
        let key = match row_id.into() {
            RowId::Single(value) => CompositeKey::new(vec![value]),
            RowId::Composite(values) => CompositeKey::new(values),
        };

        self.read().rows.contains_key(&key)
    }

    /// Returns all rows whose values under `columns` equal `values`, using the index cache.
    ///
    /// Equivalent to [`Table::find_rows_with`] with [`LookupStrategy::Index`].
    pub fn find_rows(
        &self,
        columns: impl Into<ColumnSpec>,
        values: impl Into<CompositeKey>,
    ) -> DbResult<RowSet> {
        self.find_rows_with(columns, values, LookupStrategy::Index)
    }

    /// Returns all rows whose values under `columns` equal `values`.
    ///
    /// Fails with [`ErrorKind::ContractViolation`] if `columns` is empty or if `columns` and
    /// `values` differ in length, and with [`ErrorKind::ColumnNotFound`] if a row lacks one of
    /// the filter columns.
    pub fn find_rows_with(
        &self,
        columns: impl Into<ColumnSpec>,
        values: impl Into<CompositeKey>,
        strategy: LookupStrategy,
    ) -> DbResult<RowSet> {
        let columns = columns.into();
        let key = values.into();
        validate_filter(&self.name, &columns, &key)?;

        let mut inner = self.write();
        match strategy {
            LookupStrategy::Index => {
                if !inner.indexes.contains_key(&columns) {
                    inner.build_index(&self.name, &columns)?;
                }
                inner.index_find_rows(&self.name, &columns, &key)
            }
            LookupStrategy::Scan => {
                trace!(table = %self.name, columns = %columns, "scanning rows");
                inner.scan_find_rows(&columns, &key)
            }
        }
    }

    /// Returns whether an index for exactly `columns` is cached.
    pub fn index_exists(&self, columns: impl Into<ColumnSpec>) -> bool {
        self.read().indexes.contains_key(&columns.into())
    }

    /// Builds the index for `columns` from the current rows, replacing any cached one.
    pub fn build_index(&self, columns: impl Into<ColumnSpec>) -> DbResult<()> {
        let columns = columns.into();
        if columns.is_empty() {
            bail!(ErrorKind::ContractViolation, "Index columns are empty");
        }

        self.write().build_index(&self.name, &columns)
    }

    /// Looks `values` up in the cached index for `columns`.
    ///
    /// Unlike [`Table::find_rows`] this never builds the index and fails with
    /// [`ErrorKind::IndexNotFound`] when it is not cached.
    pub fn index_find_rows(
        &self,
        columns: impl Into<ColumnSpec>,
        values: impl Into<CompositeKey>,
    ) -> DbResult<RowSet> {
        let columns = columns.into();
        let key = values.into();
        validate_filter(&self.name, &columns, &key)?;

        self.write().index_find_rows(&self.name, &columns, &key)
    }

    /// Drops every cached index.
    pub fn clear_indexes(&self) {
        self.write().clear_indexes(&self.name);
    }

    /// Returns the index and scan counters of this table.
    pub fn index_stats(&self) -> IndexStats {
        self.read().stats.clone()
    }

    /// Returns every row with its identifier.
    ///
    /// Identifiers are [`RowId::Single`] when the primary key has one column. The rows are
    /// collected up front, so the table may be modified while the iterator is alive.
    pub fn iter(&self) -> impl Iterator<Item = (RowId, RowRef)> + use<> {
        let entries: Vec<_> = self
            .read()
            .rows
            .iter()
            .map(|(key, row)| (key.to_row_id(), row.clone()))
            .collect();

        entries.into_iter()
    }

    /// Returns every row without key information.
    pub fn rows(&self) -> Vec<RowRef> {
        self.read().rows.values().cloned().collect()
    }

    // A panic while holding the lock cannot leave a half-inserted row behind, so poisoned
    // locks are recovered.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.read();
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("primary_key", &self.primary_key.to_string())
            .field("rows", &inner.rows.len())
            .field("indexes", &inner.indexes.len())
            .finish()
    }
}

fn validate_filter(table: &str, columns: &ColumnSpec, key: &CompositeKey) -> DbResult<()> {
    if columns.is_empty() {
        bail!(
            ErrorKind::ContractViolation,
            "Filter columns are empty",
            format!("table: {table}")
        );
    }

    if columns.len() != key.len() {
        bail!(
            ErrorKind::ContractViolation,
            "Filter columns and values differ in length",
            format!("table: {table}, columns: {columns}, values: {key}")
        );
    }

    Ok(())
}
