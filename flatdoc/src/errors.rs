use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for flatdoc operations.
///
/// Each kind names one category of failure so callers can branch on it
/// without parsing messages.
///
/// # Examples
///
/// ```rust
/// use flatdoc::errors::{ErrorKind, FlatdocError, FlatdocResult};
///
/// fn example() -> FlatdocResult<()> {
///     Err(FlatdocError::new("Unknown stage $bucket", ErrorKind::UnknownStage))
/// }
/// assert_eq!(example().unwrap_err().kind(), &ErrorKind::UnknownStage);
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Query and pipeline errors
    /// A query or pipeline used an operator the evaluator does not know
    UnsupportedOperator,
    /// A pipeline referenced a stage that does not exist
    UnknownStage,
    /// Operator arguments were malformed (bad regex, non-array `$in`, ...)
    FilterError,

    // Validation errors
    /// A record or patch failed schema checks
    ValidationError,
    /// A schema declaration could not be turned into a schema
    SchemaError,
    /// Invalid field name
    InvalidFieldName,

    // Operation errors
    /// The operation is not valid in the current context
    InvalidOperation,

    // IO and storage errors
    /// Generic IO error
    IOError,
    /// The file was not found
    FileNotFound,
    /// Permission denied for file operation
    PermissionDenied,
    /// Error encoding or decoding the snapshot
    EncodingError,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::UnsupportedOperator => write!(f, "Unsupported operator"),
            ErrorKind::UnknownStage => write!(f, "Unknown stage"),
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::SchemaError => write!(f, "Schema error"),
            ErrorKind::InvalidFieldName => write!(f, "Invalid field name"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom flatdoc error type.
///
/// `FlatdocError` carries a message, an [ErrorKind], an optional cause and the
/// backtrace captured where it was created.
///
/// # Examples
///
/// ```rust
/// use flatdoc::errors::{ErrorKind, FlatdocError};
///
/// let cause = FlatdocError::new("disk is full", ErrorKind::IOError);
/// let err = FlatdocError::new_with_cause("Failed to flush store", ErrorKind::IOError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct FlatdocError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<FlatdocError>>,
    backtrace: Atomic<Backtrace>,
}

impl FlatdocError {
    /// Creates a new `FlatdocError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        FlatdocError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `FlatdocError` that wraps an underlying cause.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: FlatdocError) -> Self {
        FlatdocError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&FlatdocError> {
        self.cause.as_deref()
    }
}

impl Display for FlatdocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for FlatdocError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for FlatdocError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for flatdoc operations.
pub type FlatdocResult<T> = Result<T, FlatdocError>;

impl From<std::io::Error> for FlatdocError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IOError,
        };
        FlatdocError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<serde_json::Error> for FlatdocError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            return FlatdocError::new(&format!("IO error: {}", err), ErrorKind::IOError);
        }
        FlatdocError::new(
            &format!("Snapshot encoding error: {}", err),
            ErrorKind::EncodingError,
        )
    }
}

impl From<regex::Error> for FlatdocError {
    fn from(err: regex::Error) -> Self {
        FlatdocError::new(
            &format!("Invalid regex pattern: {}", err),
            ErrorKind::FilterError,
        )
    }
}
