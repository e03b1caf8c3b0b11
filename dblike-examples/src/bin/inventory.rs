//! dblike example: load a JSON dump and query it.
//!
//! Declares tables from a schema file, bulk-loads a dump, filters one table by column values and
//! optionally lists the rows of another table that reference each match.
//!
//! ```text
//! cargo run --bin inventory -- \
//!     --schema dblike-examples/data/schema.yaml --dump dblike-examples/data/dump.json \
//!     --table owners --columns owner_name --values '["Tom"]' \
//!     --refs items:owner_id
//! ```

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use dblike::load::load_json_reader;
use dblike::store::Schema;
use dblike::types::{ColumnSpec, CompositeKey, Value};
use dblike_config::load_schema_config_from_file;
use dblike_telemetry::init_tracing;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Schema file (yaml, yml or json).
    #[arg(long)]
    schema: PathBuf,

    /// JSON dump mapping table names to arrays of rows.
    #[arg(long)]
    dump: PathBuf,

    /// Table to query.
    #[arg(long)]
    table: String,

    /// Whitespace-separated filter columns.
    #[arg(long)]
    columns: String,

    /// Filter values as a JSON array, one per column.
    #[arg(long)]
    values: String,

    /// Reverse references to list for each match, as `<table>:<columns>`.
    #[arg(long)]
    refs: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing("inventory=info,dblike=info")?;

    let args = Args::parse();

    let config = load_schema_config_from_file(&args.schema)?;
    let schema = Schema::from_config(&config)?;

    let summary = load_json_reader(&schema, BufReader::new(File::open(&args.dump)?))?;
    for (table, rows) in summary.iter() {
        info!(table, rows, "loaded");
    }

    let values: Vec<serde_json::Value> = serde_json::from_str(&args.values)?;
    let key = CompositeKey::new(values.into_iter().map(Value::from).collect());
    let columns = ColumnSpec::parse(&args.columns);

    let refs = args.refs.as_deref().map(parse_refs).transpose()?;

    let table = schema.table(&args.table)?;
    let rows = table.find_rows(&columns, key.clone())?;
    info!(table = %args.table, columns = %columns, key = %key, matches = rows.len(), "query finished");

    for row in &rows {
        println!("{row:?}");

        if let Some((ref_table, ref_columns)) = &refs {
            for referencing in row.find_refs(ref_table, ref_columns)? {
                println!("  <- {referencing:?}");
            }
        }
    }

    Ok(())
}

fn parse_refs(refs: &str) -> Result<(String, ColumnSpec), String> {
    match refs.split_once(':') {
        Some((table, columns)) if !table.is_empty() && !columns.trim().is_empty() => {
            Ok((table.to_string(), ColumnSpec::parse(columns)))
        }
        _ => Err(format!(
            "invalid --refs value `{refs}`, expected `<table>:<columns>`"
        )),
    }
}
