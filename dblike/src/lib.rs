//! An in-memory, schema-described row store.
//!
//! Imitates a handful of relational concepts (schema, table, row, column value) on top of hash
//! maps, without types, constraints, transactions or persistence. It is meant for bulk-loading
//! semi-structured data once and then querying it with composite-key lookups, equality filters
//! and foreign-key-style dereferences.
//!
//! ```
//! use dblike::store::{Schema, TableDef};
//! use dblike::types::Value;
//!
//! # fn main() -> dblike::error::DbResult<()> {
//! let schema = Schema::new(vec![
//!     TableDef::new("items", "item_id"),
//!     TableDef::new("owners", "owner_id"),
//! ])?;
//!
//! let owners = schema.table("owners")?;
//! owners.add_row([("owner_id", Value::from(1)), ("owner_name", Value::from("Tom"))])?;
//!
//! let items = schema.table("items")?;
//! items.add_row([
//!     ("item_id", Value::from(1)),
//!     ("name", Value::from("chair")),
//!     ("owner_id", Value::from(1)),
//! ])?;
//!
//! let owner = items.get(1)?.column("owner_id")?.deref("owners")?;
//! assert_eq!(owner.column("owner_name")?.value(), &Value::from("Tom"));
//!
//! let owned = owners.get(1)?.find_refs("items", "owner_id")?;
//! assert_eq!(owned.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod index;
pub mod load;
mod macros;
pub mod store;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod types;
