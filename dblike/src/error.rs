//! Error types and result definitions for dblike operations.
//!
//! Every fallible operation in this crate returns [`DbResult`]. A [`DbError`] carries an
//! [`ErrorKind`] for programmatic handling, a static description, optional dynamic detail, an
//! optional source error and the callsite where it was raised.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::borrow::Cow;
use std::error;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::panic::Location;
use std::sync::Arc;

use crate::store::DuplicateRow;

/// Convenient result type for dblike operations using [`DbError`] as the error type.
pub type DbResult<T> = Result<T, DbError>;

/// Detailed payload stored for every [`DbError`].
#[derive(Debug, Clone)]
struct ErrorPayload {
    kind: ErrorKind,
    description: Cow<'static, str>,
    detail: Option<Cow<'static, str>>,
    source: Option<Arc<dyn error::Error + Send + Sync>>,
    location: &'static Location<'static>,
    backtrace: Arc<Backtrace>,
}

/// Main error type for dblike operations.
#[derive(Debug, Clone)]
pub struct DbError {
    payload: ErrorPayload,
}

/// Categories of errors raised by the store.
///
/// The lookup kinds ([`ErrorKind::TableNotFound`], [`ErrorKind::RowNotFound`],
/// [`ErrorKind::ColumnNotFound`], [`ErrorKind::IndexNotFound`] and
/// [`ErrorKind::BrokenReference`]) form the not-found family, see [`ErrorKind::is_not_found`].
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // Caller Errors
    ContractViolation,

    // Write Errors
    DuplicateKey,

    // Lookup Errors
    TableNotFound,
    RowNotFound,
    ColumnNotFound,
    IndexNotFound,
    BrokenReference,

    // Reference Errors
    FalsyReference,
    SchemaDropped,

    // Loading Errors
    InvalidData,
    DeserializationError,
    IoError,
    ConfigError,
}

impl ErrorKind {
    /// Returns `true` for kinds reporting that a lookup found no matching entry.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorKind::TableNotFound
                | ErrorKind::RowNotFound
                | ErrorKind::ColumnNotFound
                | ErrorKind::IndexNotFound
                | ErrorKind::BrokenReference
        )
    }
}

impl DbError {
    /// Returns the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        self.payload.kind
    }

    /// Returns the static description of this error.
    pub fn description(&self) -> &str {
        &self.payload.description
    }

    /// Returns the detailed error information if available.
    pub fn detail(&self) -> Option<&str> {
        self.payload.detail.as_deref()
    }

    /// Returns the captured backtrace for this error.
    pub fn backtrace(&self) -> &Backtrace {
        self.payload.backtrace.as_ref()
    }

    /// Returns the captured callsite location for this error.
    pub fn location(&self) -> &'static Location<'static> {
        self.payload.location
    }

    /// Returns both rows involved in a rejected insert.
    ///
    /// Only errors of kind [`ErrorKind::DuplicateKey`] raised by
    /// [`crate::store::Table::add_row`] carry this information.
    pub fn duplicate_row(&self) -> Option<&DuplicateRow> {
        self.payload
            .source
            .as_deref()
            .and_then(|source| source.downcast_ref::<DuplicateRow>())
    }

    /// Attaches an originating [`error::Error`] to this error and returns the modified instance.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: error::Error + Send + Sync + 'static,
    {
        self.payload.source = Some(Arc::new(source));
        self
    }

    /// Creates a [`DbError`] from its components.
    #[track_caller]
    fn from_components(
        kind: ErrorKind,
        description: Cow<'static, str>,
        detail: Option<Cow<'static, str>>,
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    ) -> Self {
        DbError {
            payload: ErrorPayload {
                kind,
                description,
                detail,
                source,
                location: Location::caller(),
                backtrace: Arc::new(Backtrace::capture()),
            },
        }
    }
}

impl PartialEq for DbError {
    fn eq(&self, other: &DbError) -> bool {
        self.payload.kind == other.payload.kind
    }
}

impl Hash for DbError {
    /// Hashes only the kind and the static description.
    ///
    /// Location, detail, source and backtrace are excluded so that errors of the same category
    /// group together.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.payload.kind.hash(state);
        self.payload.description.hash(state);
    }
}

impl fmt::Display for DbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let payload = &self.payload;
        let location = payload.location;
        write!(
            f,
            "[{:?}] {} @ {}:{}:{}",
            payload.kind,
            payload.description,
            location.file(),
            location.line(),
            location.column()
        )?;

        write_detail(payload.detail.as_deref(), f, 1)?;
        write_backtrace(payload.backtrace.as_ref(), f, 1)?;

        Ok(())
    }
}

impl error::Error for DbError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.payload
            .source
            .as_ref()
            .map(|source| source as &(dyn error::Error + 'static))
    }
}

/// Writes the captured backtrace with indentation.
fn write_backtrace(
    backtrace: &Backtrace,
    f: &mut fmt::Formatter<'_>,
    indent: usize,
) -> fmt::Result {
    if backtrace.status() != BacktraceStatus::Captured {
        return Ok(());
    }

    let indent_str = "  ".repeat(indent);
    let rendered_backtrace = format!("{backtrace}");
    if !rendered_backtrace.trim().is_empty() {
        write!(f, "\n{indent_str}Backtrace:")?;
        for line in rendered_backtrace.lines() {
            if line.trim().is_empty() {
                write!(f, "\n{indent_str}  ")?;
            } else {
                write!(f, "\n{indent_str}  {line}")?;
            }
        }
    }

    Ok(())
}

/// Writes the detail block with indentation.
fn write_detail(detail: Option<&str>, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
    if let Some(detail) = detail {
        let indent_str = "  ".repeat(indent);
        if detail.trim().is_empty() {
            write!(f, "\n{indent_str}Detail: <empty>")?;
        } else {
            write!(f, "\n{indent_str}Detail:")?;
            for line in detail.lines() {
                if line.trim().is_empty() {
                    write!(f, "\n{indent_str}  ")?;
                } else {
                    write!(f, "\n{indent_str}  {line}")?;
                }
            }
        }
    }

    Ok(())
}

/// Creates a [`DbError`] from an error kind and static description.
impl From<(ErrorKind, &'static str)> for DbError {
    #[track_caller]
    fn from((kind, desc): (ErrorKind, &'static str)) -> DbError {
        DbError::from_components(kind, Cow::Borrowed(desc), None, None)
    }
}

/// Creates a [`DbError`] from an error kind, static description, and dynamic detail.
impl<D> From<(ErrorKind, &'static str, D)> for DbError
where
    D: Into<Cow<'static, str>>,
{
    #[track_caller]
    fn from((kind, desc, detail): (ErrorKind, &'static str, D)) -> DbError {
        DbError::from_components(kind, Cow::Borrowed(desc), Some(detail.into()), None)
    }
}

/// Converts [`std::io::Error`] to [`DbError`] with [`ErrorKind::IoError`].
impl From<std::io::Error> for DbError {
    #[track_caller]
    fn from(err: std::io::Error) -> DbError {
        let detail = err.to_string();
        DbError::from_components(
            ErrorKind::IoError,
            Cow::Borrowed("I/O operation failed"),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}

/// Converts [`serde_json::Error`] to [`DbError`].
///
/// I/O failures map to [`ErrorKind::IoError`], everything else to
/// [`ErrorKind::DeserializationError`].
impl From<serde_json::Error> for DbError {
    #[track_caller]
    fn from(err: serde_json::Error) -> DbError {
        let (kind, description) = match err.classify() {
            serde_json::error::Category::Io => (ErrorKind::IoError, "JSON I/O operation failed"),
            serde_json::error::Category::Syntax
            | serde_json::error::Category::Data
            | serde_json::error::Category::Eof => (
                ErrorKind::DeserializationError,
                "JSON deserialization failed",
            ),
        };

        let detail = err.to_string();
        DbError::from_components(
            kind,
            Cow::Borrowed(description),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}

/// Converts [`dblike_config::ValidationError`] to [`DbError`] with [`ErrorKind::ConfigError`].
impl From<dblike_config::ValidationError> for DbError {
    #[track_caller]
    fn from(err: dblike_config::ValidationError) -> DbError {
        let detail = err.to_string();
        DbError::from_components(
            ErrorKind::ConfigError,
            Cow::Borrowed("Schema configuration is invalid"),
            Some(Cow::Owned(detail)),
            Some(Arc::new(err)),
        )
    }
}
