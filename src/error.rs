//! Error types for document splitting and per-type generation

use std::path::PathBuf;

use thiserror::Error;

/// Result type for split and generation operations
pub type Result<T> = std::result::Result<T, SplitError>;

/// Split and generation errors
#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Missing section '{section}' in {}", path.display())]
    MissingSection { path: PathBuf, section: String },

    #[error("Invalid JSON document {}: {source}", path.display())]
    InvalidDocument {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Type reference registry not found: {}", .0.display())]
    RegistryNotFound(PathBuf),

    #[error("Invalid type reference registry {}: {source}", path.display())]
    InvalidRegistry {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported document source: {0}")]
    UnsupportedSource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Atomic write failed: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl SplitError {
    /// Shorthand for a missing configuration section
    pub fn missing_section(path: impl Into<PathBuf>, section: impl Into<String>) -> Self {
        SplitError::MissingSection {
            path: path.into(),
            section: section.into(),
        }
    }
}
