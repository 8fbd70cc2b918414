//! Error handling module for external tool invocations

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::errors::DomainError;

/// Failure of an external process or service
#[derive(Error, Debug)]
pub enum ToolError {
    /// Process could not be started
    #[error("Failed to spawn {tool}: {message}")]
    SpawnFailed { tool: String, message: String },

    /// Process exited with an error status
    #[error("{tool} exited with code {code}: {stderr}")]
    NonZeroExit {
        tool: String,
        code: i32,
        stderr: String,
    },

    /// Output could not be understood
    #[error("Failed to parse {tool} output: {message}")]
    ParseError { tool: String, message: String },

    /// Process exceeded its time bound
    #[error("{tool} timed out after {seconds}s on {path}")]
    Timeout {
        tool: String,
        path: PathBuf,
        seconds: u64,
    },

    /// HTTP request to a service failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ToolError> for DomainError {
    fn from(err: ToolError) -> Self {
        match err {
            ToolError::Timeout { path, seconds, .. } => DomainError::ValidationTimeout { path, seconds },
            ToolError::SpawnFailed { ref tool, .. }
            | ToolError::NonZeroExit { ref tool, .. }
            | ToolError::ParseError { ref tool, .. } => DomainError::ExternalToolFailure {
                tool: tool.clone(),
                message: err.to_string(),
            },
            ToolError::Http(e) => DomainError::MetadataFail(e.to_string()),
            ToolError::IoError(e) => DomainError::FsFail(e.to_string()),
        }
    }
}

/// Result type alias for tool invocations
pub type ToolResult<T> = std::result::Result<T, ToolError>;
