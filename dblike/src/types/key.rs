//! Composite keys and row identifiers.

use std::fmt;

use crate::bail;
use crate::error::{DbResult, ErrorKind};
use crate::types::Value;

/// An ordered tuple of values drawn from one or more columns.
///
/// This is the internal key type for both the primary key map of a table and the buckets of a
/// secondary index. A single-column key is a one-element tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    values: Vec<Value>,
}

impl CompositeKey {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Presents the key the way callers address rows: a bare value for one-element keys.
    pub fn to_row_id(&self) -> RowId {
        match self.values.as_slice() {
            [single] => RowId::Single(single.clone()),
            values => RowId::Composite(values.to_vec()),
        }
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        if self.values.len() == 1 {
            f.write_str(",")?;
        }
        f.write_str(")")
    }
}

impl From<Vec<Value>> for CompositeKey {
    fn from(values: Vec<Value>) -> Self {
        CompositeKey::new(values)
    }
}

impl<V, const N: usize> From<[V; N]> for CompositeKey
where
    V: Into<Value>,
{
    fn from(values: [V; N]) -> Self {
        CompositeKey::new(values.into_iter().map(Into::into).collect())
    }
}

impl From<&CompositeKey> for CompositeKey {
    fn from(key: &CompositeKey) -> Self {
        key.clone()
    }
}

/// Identifies a row by its primary key, as seen by callers.
///
/// Single-column primary keys are addressed with [`RowId::Single`], multi-column ones with
/// [`RowId::Composite`]. A one-element [`RowId::Composite`] is ambiguous and rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowId {
    Single(Value),
    Composite(Vec<Value>),
}

impl RowId {
    /// Converts the identifier into the internal key representation.
    ///
    /// Fails with [`ErrorKind::ContractViolation`] for a one-element composite identifier.
    pub fn into_key(self) -> DbResult<CompositeKey> {
        match self {
            RowId::Single(value) => Ok(CompositeKey::new(vec![value])),
            RowId::Composite(values) if values.len() == 1 => {
                bail!(
                    ErrorKind::ContractViolation,
                    "One-element composite row id is ambiguous, use a single value instead",
                    format!("row id: ({},)", values[0])
                )
            }
            RowId::Composite(values) => Ok(CompositeKey::new(values)),
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Single(value) => write!(f, "{value}"),
            RowId::Composite(values) => write!(f, "{}", CompositeKey::new(values.clone())),
        }
    }
}

impl From<Value> for RowId {
    fn from(value: Value) -> Self {
        RowId::Single(value)
    }
}

impl From<Vec<Value>> for RowId {
    fn from(values: Vec<Value>) -> Self {
        RowId::Composite(values)
    }
}

impl From<&RowId> for RowId {
    fn from(row_id: &RowId) -> Self {
        row_id.clone()
    }
}

/// Scalar conversions shared by [`RowId`] and [`CompositeKey`].
macro_rules! impl_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RowId {
                fn from(value: $ty) -> Self {
                    RowId::Single(Value::from(value))
                }
            }

            impl From<$ty> for CompositeKey {
                fn from(value: $ty) -> Self {
                    CompositeKey::new(vec![Value::from(value)])
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, &str, String
);

impl From<Value> for CompositeKey {
    fn from(value: Value) -> Self {
        CompositeKey::new(vec![value])
    }
}

/// Tuple conversions shared by [`RowId`] and [`CompositeKey`].
macro_rules! impl_from_tuple {
    ($($ty:ident => $var:ident),+) => {
        impl<$($ty),+> From<($($ty,)+)> for RowId
        where
            $($ty: Into<Value>),+
        {
            fn from(($($var,)+): ($($ty,)+)) -> Self {
                RowId::Composite(vec![$($var.into()),+])
            }
        }

        impl<$($ty),+> From<($($ty,)+)> for CompositeKey
        where
            $($ty: Into<Value>),+
        {
            fn from(($($var,)+): ($($ty,)+)) -> Self {
                CompositeKey::new(vec![$($var.into()),+])
            }
        }
    };
}

impl_from_tuple!(A => a, B => b);
impl_from_tuple!(A => a, B => b, C => c);
impl_from_tuple!(A => a, B => b, C => c, D => d);
