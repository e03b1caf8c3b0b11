//! Value and key types shared by every part of the store.

mod column_spec;
mod key;
mod value;

pub use column_spec::ColumnSpec;
pub use key::{CompositeKey, RowId};
pub use value::Value;
