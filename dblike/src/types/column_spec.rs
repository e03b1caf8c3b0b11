use std::fmt;
use std::sync::Arc;

/// An ordered list of column names.
///
/// Used for primary keys and for equality filters. Order is significant: `[a, b]` and `[b, a]`
/// select the same columns but produce differently ordered value tuples and are different
/// index identities. Repeated names are allowed and echo the column once per occurrence.
///
/// Cloning is cheap, the names are shared.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnSpec {
    names: Arc<[String]>,
}

impl ColumnSpec {
    /// Builds a spec from a whitespace-delimited string, e.g. `"row_id id_modif"`.
    pub fn parse(delimited: &str) -> Self {
        Self::from_names(delimited.split_whitespace())
    }

    /// Builds a spec from an explicit sequence of names, keeping their order.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl fmt::Display for ColumnSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names.join(" "))
    }
}

impl From<&str> for ColumnSpec {
    fn from(delimited: &str) -> Self {
        ColumnSpec::parse(delimited)
    }
}

impl From<String> for ColumnSpec {
    fn from(delimited: String) -> Self {
        ColumnSpec::parse(&delimited)
    }
}

impl From<&String> for ColumnSpec {
    fn from(delimited: &String) -> Self {
        ColumnSpec::parse(delimited)
    }
}

impl From<&ColumnSpec> for ColumnSpec {
    fn from(spec: &ColumnSpec) -> Self {
        spec.clone()
    }
}

impl From<&[&str]> for ColumnSpec {
    fn from(names: &[&str]) -> Self {
        ColumnSpec::from_names(names.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for ColumnSpec {
    fn from(names: [&str; N]) -> Self {
        ColumnSpec::from_names(names)
    }
}

impl From<Vec<&str>> for ColumnSpec {
    fn from(names: Vec<&str>) -> Self {
        ColumnSpec::from_names(names)
    }
}

impl From<Vec<String>> for ColumnSpec {
    fn from(names: Vec<String>) -> Self {
        ColumnSpec::from_names(names)
    }
}
