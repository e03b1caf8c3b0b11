//! The row store: schemas, tables, rows and value cells.
//!
//! A [`Schema`] owns its [`Table`]s. Each table owns its rows, shared out as [`RowRef`]s, and a
//! cache of secondary indexes that is rebuilt lazily. Tables, rows and [`ValueCell`]s keep a
//! [`SchemaHandle`] to resolve other tables by name for dereferences and reverse lookups.

mod cell;
mod row;
mod schema;
mod table;

pub use cell::ValueCell;
pub use row::{Row, RowRef, RowSet};
pub use schema::{Schema, SchemaHandle, TableDef};
pub use table::{DuplicateRow, LookupStrategy, Table};
