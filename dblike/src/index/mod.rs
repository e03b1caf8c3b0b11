//! In-memory secondary indexes for equality lookups.
//!
//! An index groups the rows of a table by their values under a [`crate::types::ColumnSpec`].
//! Indexes are derived state: a table builds them on demand and drops all of them whenever a
//! row is added.

mod secondary_index;

pub use secondary_index::{IndexStats, SecondaryIndex};
