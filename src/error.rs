//! Error types for the datavow expectation engine.

use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, DatavowError>;

/// Errors that can occur while recording, evaluating, or replaying expectations.
#[derive(Error, Debug)]
pub enum DatavowError {
    /// An expectation argument could not be captured into the suite.
    #[error("Failed to serialize argument `{name}`: {source}")]
    Serialization {
        /// The parameter name that failed to serialize.
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A malformed expectation parameter (bad `mostly`, conflicting bounds,
    /// invalid regex or format string, ...).
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A suite definition references an expectation name with no registered
    /// evaluator.
    #[error("Unknown expectation type: {0}")]
    UnknownExpectation(String),

    /// An evaluator referenced a column the source does not contain.
    #[error("Column not found: {0}")]
    MissingColumn(String),

    /// Arrow ingestion error (CSV reading, record batch conversion).
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Filesystem error while persisting or loading a suite.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error outside argument capture.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DatavowError {
    /// Creates an invalid parameter error with the given message.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Creates a missing column error for the given column name.
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn(column.into())
    }

    /// A stable machine-readable kind, used for failed replay records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Serialization { .. } => "serialization",
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::UnknownExpectation(_) => "unknown_expectation",
            Self::MissingColumn(_) => "missing_column",
            Self::Arrow(_) => "arrow",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}
