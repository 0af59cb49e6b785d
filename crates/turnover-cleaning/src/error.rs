//! Custom error types for the cleaning pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Recoverable
//! data problems (unparseable currency strings, columns without a mode, absent
//! salary columns) never surface here; they are handled inside the stages.
//! What remains are the fatal conditions: a missing input file, an unwritable
//! output path, and failures bubbling up from polars or serde.
//!
//! Errors serialize as `{ code, message }` so they can be embedded in the JSON
//! run report.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// The input CSV does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Type conversion failed.
    #[error("Failed to convert column '{column}' to {target_type}: {reason}")]
    TypeConversionFailed {
        column: String,
        target_type: String,
        reason: String,
    },

    /// The cleaned dataset could not be written.
    #[error("Failed to write '{}': {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: Box<CleaningError>,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Wrap an error raised while writing `path`.
    pub fn write_failed(path: impl Into<PathBuf>, source: impl Into<CleaningError>) -> Self {
        CleaningError::WriteFailed {
            path: path.into(),
            source: Box::new(source.into()),
        }
    }

    /// Stable error code, used in the JSON run report.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InputNotFound(_) => "INPUT_NOT_FOUND",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::TypeConversionFailed { .. } => "TYPE_CONVERSION_FAILED",
            Self::WriteFailed { .. } => "WRITE_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from the input side (file missing).
    pub fn is_input_missing(&self) -> bool {
        match self {
            Self::InputNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_input_missing(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for CleaningError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        CleaningError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}
