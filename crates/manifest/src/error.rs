use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ManifestError>;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Manifest not found at '{0}'")]
    NotFound(PathBuf),

    #[error("IO operation '{operation}' failed on path '{path}': {source}")]
    Io {
        operation: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid manifest at '{path}': {source}")]
    InvalidManifestFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The manifest parsed but lacks a section the patch needs.
    #[error("Invalid manifest: {0}")]
    InvalidShape(String),

    /// The source manifest is not the one this patch expects to start from.
    #[error("Unexpected value for '{field}': expected '{expected}', found {}", display_found(.found))]
    IntegrityMismatch {
        field: String,
        expected: String,
        found: Option<String>,
    },

    #[error("Failed to serialize manifest: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn display_found(found: &Option<String>) -> String {
    match found {
        Some(value) => format!("'{}'", value),
        None => "nothing".to_string(),
    }
}
