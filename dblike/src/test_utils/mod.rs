//! Fixtures and assertion helpers shared by unit and integration tests.
//!
//! - [`schema`] - the owners/items schema with cross-table references
//! - [`table`] - a standalone four-row table and row set helpers
pub mod schema;
pub mod table;
