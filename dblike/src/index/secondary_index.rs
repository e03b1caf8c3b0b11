//! Secondary index implementation.

use std::collections::HashMap;

use crate::error::DbResult;
use crate::store::{RowRef, RowSet};
use crate::types::{ColumnSpec, CompositeKey};

/// Counters describing how a table answered its queries.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of indexes built.
    pub build_count: u64,
    /// Number of lookups answered from an index.
    pub lookup_count: u64,
    /// Number of index lookups that matched no bucket.
    pub lookup_miss_count: u64,
    /// Number of queries answered by scanning every row.
    pub scan_count: u64,
    /// Number of times a non-empty index cache was dropped.
    pub invalidation_count: u64,
}

/// Rows grouped by their value tuple under a fixed list of columns.
#[derive(Debug)]
pub struct SecondaryIndex {
    columns: ColumnSpec,
    buckets: HashMap<CompositeKey, RowSet>,
}

impl SecondaryIndex {
    /// Builds an index by reading `columns` from every row once.
    ///
    /// Fails with [`crate::error::ErrorKind::ColumnNotFound`] if a row lacks one of the columns.
    pub fn build<'a, I>(columns: ColumnSpec, rows: I) -> DbResult<Self>
    where
        I: IntoIterator<Item = &'a RowRef>,
    {
        let mut buckets: HashMap<CompositeKey, RowSet> = HashMap::new();
        for row in rows {
            let key = row.column_values(&columns)?;
            buckets.entry(key).or_default().insert(row.clone());
        }

        Ok(Self { columns, buckets })
    }

    /// Returns the columns this index groups by.
    pub fn columns(&self) -> &ColumnSpec {
        &self.columns
    }

    /// Returns the rows whose value tuple equals `key`.
    pub fn get(&self, key: &CompositeKey) -> Option<&RowSet> {
        self.buckets.get(key)
    }

    /// Returns the number of distinct value tuples.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Returns an iterator over all buckets.
    pub fn iter(&self) -> impl Iterator<Item = (&CompositeKey, &RowSet)> {
        self.buckets.iter()
    }
}
