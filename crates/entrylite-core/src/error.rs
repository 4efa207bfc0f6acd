//! Error types for EntryLite.

use std::fmt;

/// Coarse classification of an [`Error`], reported in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A parameter has no binding in the target store
    UnsupportedParameterType,
    /// Parameter list length differs from the placeholder count
    ParameterCount,
    /// Primary key, unique, not-null, check or foreign key violation
    ConstraintViolation,
    /// Malformed SQL or reference to an unknown table/column
    SyntaxError,
    /// The store could not be opened or reached
    ConnectionFailure,
    /// Any other store-reported failure
    UnclassifiedStoreError,
    /// Configuration file or logging setup problem
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UnsupportedParameterType => "unsupported parameter type",
            ErrorKind::ParameterCount => "parameter count mismatch",
            ErrorKind::ConstraintViolation => "constraint violation",
            ErrorKind::SyntaxError => "syntax error",
            ErrorKind::ConnectionFailure => "connection failure",
            ErrorKind::UnclassifiedStoreError => "store error",
            ErrorKind::Configuration => "configuration error",
        };
        f.write_str(name)
    }
}

/// The main error type for EntryLite operations.
#[derive(Debug)]
pub enum Error {
    /// Parameter at `index` (1-based) cannot be bound
    UnsupportedParameterType {
        /// Placeholder position
        index: usize,
        /// Name of the offending type
        type_name: &'static str,
    },

    /// Number of supplied parameters differs from the statement's placeholders
    ParameterCount {
        /// Placeholders in the statement
        expected: usize,
        /// Parameters supplied by the caller
        supplied: usize,
    },

    /// Constraint violation reported by the store
    ConstraintViolation {
        /// Store result code
        code: i32,
        /// Store message
        message: String,
    },

    /// SQL could not be compiled by the store
    Syntax {
        /// Store result code
        code: i32,
        /// Store message
        message: String,
    },

    /// Connection could not be established or was lost
    Connection(String),

    /// Unclassified store error
    Store {
        /// Store result code, when the store reported one
        code: Option<i32>,
        /// Store message
        message: String,
    },

    /// I/O error
    Io(std::io::Error),

    /// Invalid configuration
    Config(String),
}

impl Error {
    /// Classifies this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnsupportedParameterType { .. } => ErrorKind::UnsupportedParameterType,
            Error::ParameterCount { .. } => ErrorKind::ParameterCount,
            Error::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
            Error::Syntax { .. } => ErrorKind::SyntaxError,
            Error::Connection(_) => ErrorKind::ConnectionFailure,
            Error::Store { .. } => ErrorKind::UnclassifiedStoreError,
            Error::Io(_) | Error::Config(_) => ErrorKind::Configuration,
        }
    }

    /// Store result code, if the store reported one.
    pub fn code(&self) -> Option<i32> {
        match self {
            Error::ConstraintViolation { code, .. } | Error::Syntax { code, .. } => Some(*code),
            Error::Store { code, .. } => *code,
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnsupportedParameterType { index, type_name } => {
                write!(f, "Unsupported parameter type at position {}: {}", index, type_name)
            }
            Error::ParameterCount { expected, supplied } => write!(
                f,
                "Statement expects {} parameter(s), {} supplied",
                expected, supplied
            ),
            Error::ConstraintViolation { code, message } => {
                write!(f, "Constraint violation (code {}): {}", code, message)
            }
            Error::Syntax { code, message } => write!(f, "SQL error (code {}): {}", code, message),
            Error::Connection(msg) => write!(f, "Connection error: {}", msg),
            Error::Store {
                code: Some(code),
                message,
            } => write!(f, "Store error (code {}): {}", code, message),
            Error::Store { code: None, message } => write!(f, "Store error: {}", message),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

/// A specialized `Result` type for EntryLite operations.
pub type Result<T> = std::result::Result<T, Error>;
