//! Error types for instat.
//!
//! This module defines all error types used throughout the instat crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for instat operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// A backing file could not be parsed or written as CSV.
    #[error("CSV error in {path}: {source}")]
    Csv {
        /// Path to the backing file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: csv::Error,
    },

    /// A backing file could not be opened, read or written.
    #[error("failed to access {path}: {source}")]
    FileAccess {
        /// Path to the backing file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Input Errors ===
    /// The storage key does not name a known collection.
    #[error("unknown collection '{0}'")]
    UnknownCollection(String),

    /// A required form field was not submitted.
    #[error("missing required field '{field}' for {collection}")]
    MissingField {
        /// Storage key of the collection.
        collection: &'static str,
        /// Name of the missing field.
        field: &'static str,
    },

    /// A submitted record index is not an integer.
    #[error("invalid record index '{0}'")]
    InvalidIndex(String),

    /// A `name=value` field assignment could not be parsed.
    #[error("invalid field assignment '{0}', expected name=value")]
    InvalidAssignment(String),

    /// The submitted action is not add, edit or delete.
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    // === I/O Errors ===
    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for instat operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a CSV error for the given backing file.
    #[must_use]
    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }

    /// Create a file access error for the given backing file.
    #[must_use]
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Create an unknown collection error.
    #[must_use]
    pub fn unknown_collection(key: impl Into<String>) -> Self {
        Self::UnknownCollection(key.into())
    }

    /// Create an invalid index error.
    #[must_use]
    pub fn invalid_index(raw: impl Into<String>) -> Self {
        Self::InvalidIndex(raw.into())
    }

    /// Check if this error was caused by the caller's input rather than storage.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownCollection(_)
                | Self::MissingField { .. }
                | Self::InvalidIndex(_)
                | Self::InvalidAssignment(_)
                | Self::UnknownAction(_)
        )
    }

    /// Check if this error is a malformed backing file.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::Csv { source, .. } if !source.is_io_error())
    }
}
