//! Error types for shapefile export operations.
//!
//! All fallible operations return [`Result<T>`] with context-rich error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Error type for every stage of an export run.
#[derive(Error, Debug)]
pub enum ExportError {
    /// A designated coordinate attribute could not be read as a number.
    #[error("Cannot parse coordinate '{column}' of node {node_id}: {value:?} is not a number")]
    CoordinateParse {
        /// ID of the node being located
        node_id: String,
        /// Column holding the coordinate
        column: String,
        /// Raw value found in the column (`null` when absent)
        value: String,
    },

    /// Node not found in the preview model
    #[error("Node not found: {node_id}")]
    NodeNotFound {
        /// ID of the missing node
        node_id: String,
    },

    /// Shapefile or dBASE encoding error
    #[error("Shapefile error: {message}")]
    Shapefile {
        /// Detailed error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File system error while staging or committing output
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being touched
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Record does not match the schema it is written against
    #[error("Invalid record: {message}")]
    InvalidRecord {
        /// Description of what went wrong
        message: String,
    },

    /// Output path cannot be split into directory and base name
    #[error("Invalid output path: {path}")]
    InvalidPath {
        /// The rejected path
        path: PathBuf,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error details
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ExportError {
    /// Create a shapefile error from a message and optional source.
    pub fn shapefile<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Shapefile {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Create a serialization error from a message and optional source.
    pub fn serialization<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
