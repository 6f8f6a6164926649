//! Error types for the foliconf pipeline.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced while scanning declarations or generating artifacts.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FoliconfError {
    /// A dotted section path was registered by two definitions.
    #[error("section '{path}' registered twice: {incoming} conflicts with {existing}")]
    DuplicateSection {
        /// The contested dotted path.
        path: String,
        /// Definition that already owns the path.
        existing: String,
        /// Definition whose registration was rejected.
        incoming: String,
    },

    /// A dotted path is used both as a namespace and as a leaf value.
    #[error("path '{path}' is used both as a namespace and as a value")]
    NodeConflict {
        /// The conflicting dotted path.
        path: String,
    },

    /// A declaration file could not be parsed.
    #[error("failed to parse '{path}': {message}")]
    Parse {
        /// File that failed to parse.
        path: Utf8PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// A flat update mapping could not be parsed from JSON.
    #[error("failed to parse updates JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O failure while reading sources or writing artifacts.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path involved in the failed operation.
        path: Utf8PathBuf,
        #[source]
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
