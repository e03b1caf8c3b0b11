//! Bulk loading of rows from JSON dumps.
//!
//! A dump is a JSON object mapping table names to arrays of row objects:
//!
//! ```json
//! {
//!     "owners": [{ "owner_id": 1, "owner_name": "Tom" }],
//!     "items": [{ "item_id": 1, "name": "chair", "owner_id": 1 }]
//! }
//! ```
//!
//! Every row object is handed to [`Table::add_row`] as-is. Nested arrays and objects are stored
//! as opaque [`Value::Json`] values.

use std::collections::BTreeMap;
use std::io::Read;

use tracing::{debug, info};

use crate::bail;
use crate::error::{DbResult, ErrorKind};
use crate::store::{Schema, Table};
use crate::types::Value;

/// Number of rows loaded per table.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    rows_per_table: BTreeMap<String, usize>,
}

impl LoadSummary {
    /// Returns the number of rows loaded into `table`.
    pub fn rows_loaded(&self, table: &str) -> usize {
        self.rows_per_table.get(table).copied().unwrap_or(0)
    }

    pub fn total_rows(&self) -> usize {
        self.rows_per_table.values().sum()
    }

    /// Returns `(table, rows)` pairs sorted by table name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.rows_per_table
            .iter()
            .map(|(table, rows)| (table.as_str(), *rows))
    }
}

/// Loads every row of `dump` into the matching tables of `schema`.
///
/// The first failing row aborts the load and its error is returned; rows inserted before it stay
/// in their tables. Fails with [`ErrorKind::InvalidData`] if the dump is not shaped as described
/// in the module documentation and with [`ErrorKind::TableNotFound`] for undeclared tables.
pub fn load_json(schema: &Schema, dump: serde_json::Value) -> DbResult<LoadSummary> {
    let serde_json::Value::Object(tables) = dump else {
        bail!(
            ErrorKind::InvalidData,
            "Dump must be a JSON object keyed by table name"
        );
    };

    let mut summary = LoadSummary::default();
    for (table_name, rows) in tables {
        let table = schema.table(&table_name)?;
        let loaded = load_table_rows(table, rows)?;

        debug!(table = %table_name, rows = loaded, "table rows loaded");
        *summary.rows_per_table.entry(table_name).or_default() += loaded;
    }

    info!(
        tables = summary.rows_per_table.len(),
        rows = summary.total_rows(),
        "dump loaded"
    );

    Ok(summary)
}

/// Parses `dump` as JSON and loads it, see [`load_json`].
pub fn load_json_str(schema: &Schema, dump: &str) -> DbResult<LoadSummary> {
    let dump = serde_json::from_str(dump)?;
    load_json(schema, dump)
}

/// Reads and parses a JSON dump from `reader` and loads it, see [`load_json`].
pub fn load_json_reader<R: Read>(schema: &Schema, reader: R) -> DbResult<LoadSummary> {
    let dump = serde_json::from_reader(reader)?;
    load_json(schema, dump)
}

fn load_table_rows(table: &Table, rows: serde_json::Value) -> DbResult<usize> {
    let serde_json::Value::Array(rows) = rows else {
        bail!(
            ErrorKind::InvalidData,
            "Table entry of a dump must be an array of rows",
            format!("table: {}", table.name())
        );
    };

    let mut loaded = 0;
    for (position, row) in rows.into_iter().enumerate() {
        let serde_json::Value::Object(columns) = row else {
            bail!(
                ErrorKind::InvalidData,
                "Row of a dump must be a JSON object",
                format!("table: {}, position: {position}", table.name())
            );
        };

        table.add_row(
            columns
                .into_iter()
                .map(|(column, value)| (column, Value::from(value))),
        )?;
        loaded += 1;
    }

    Ok(loaded)
}
