use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PublishError>;

/// The stage of the publish flow an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishStep {
    TokenExchange,
    Upload,
    Publish,
}

impl fmt::Display for PublishStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishStep::TokenExchange => write!(f, "token exchange"),
            PublishStep::Upload => write!(f, "upload"),
            PublishStep::Publish => write!(f, "publish request"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PublishError {
    /// Credentials are missing or incomplete.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The package path does not point at a usable package archive.
    #[error("Invalid package '{path}': {reason}")]
    InvalidPackage { path: PathBuf, reason: String },

    #[error("IO operation '{operation}' failed on path '{path}': {source}")]
    Io {
        operation: String,
        path: PathBuf,
        source: std::io::Error,
    },

    /// The request never produced a response.
    #[error("Network error during {step}: {source}")]
    Network {
        step: PublishStep,
        #[source]
        source: TransportError,
    },

    /// The server answered with a body we could not make sense of.
    #[error("Protocol error during {step}: {message}")]
    Protocol { step: PublishStep, message: String },

    #[error("Upload rejected with state '{state}'{}", format_details(.details))]
    UploadRejected { state: String, details: Vec<String> },

    #[error("Publish rejected with status [{}]{}", .status.join(", "), format_details(.details))]
    PublishRejected {
        status: Vec<String>,
        details: Vec<String>,
    },
}

impl PublishError {
    /// Whether the remote service accepted the request but refused the item.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            PublishError::UploadRejected { .. } | PublishError::PublishRejected { .. }
        )
    }

    pub fn step(&self) -> Option<PublishStep> {
        match self {
            PublishError::Network { step, .. } | PublishError::Protocol { step, .. } => {
                Some(*step)
            }
            PublishError::UploadRejected { .. } => Some(PublishStep::Upload),
            PublishError::PublishRejected { .. } => Some(PublishStep::Publish),
            _ => None,
        }
    }
}

fn format_details(details: &[String]) -> String {
    if details.is_empty() {
        String::new()
    } else {
        format!(": {}", details.join("; "))
    }
}

/// Failure reported by an [`HttpExecutor`](crate::http::HttpExecutor).
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request to '{url}' failed: {message}")]
    Request { url: String, message: String },

    #[error("Failed to open request body '{path}': {source}")]
    Body {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read response from '{url}': {message}")]
    Response { url: String, message: String },
}
