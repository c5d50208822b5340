//! Error types for endpoint discovery.
//!
//! Only fatal conditions are errors. Badly named files or folders and missing
//! declarative nodes are not represented here: they are skipped or leave the
//! dependent manifest field empty.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    /// Enumerating or reading from the file system failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A script could not be parsed into a node tree.
    #[error("Parse error in {} at line {line}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// Two files resolved to the same route and verb.
    #[error("Duplicate endpoint: {verb} {path}")]
    DuplicateEndpoint { path: String, verb: String },

    /// The discovery pass was cancelled before it completed.
    #[error("Discovery cancelled")]
    Cancelled,

    /// The blocking worker running the pass panicked or was aborted.
    #[error("Discovery worker failed: {0}")]
    Worker(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ManifestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ManifestError>;
