// Domain errors - Error types for the domain layer

use std::fmt;
use std::path::PathBuf;

/// Domain-specific error types
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Container introspection failed for a single file
    ExtractionFailure { path: PathBuf, reason: String },
    /// Match sets in a batch do not all have the same number of files
    MismatchedBatchLength {
        primary: PathBuf,
        expected: usize,
        found: usize,
    },
    /// No codec/extension mapping exists for a track
    UnknownCodecOrExtension(String),
    /// Language code failed ISO 639 validation
    InvalidLanguageCode(String),
    /// Operator rejected a confirmation gate or closed the input
    UserAbort,
    /// External tool returned an unexpected outcome
    ExternalToolFailure { tool: String, message: String },
    /// External validator exceeded its time bound
    ValidationTimeout { path: PathBuf, seconds: u64 },
    /// A template violates one of its structural invariants
    TemplateInvariant(String),
    /// A match set has no counterpart for a template track
    TemplateMismatch { path: PathBuf, reason: String },
    /// Nothing to process in the given directory
    NoFilesFound(String),
    /// Invalid arguments provided
    BadArgs(String),
    /// File system operation failed
    FsFail(String),
    /// Metadata service lookup failed
    MetadataFail(String),
}

impl DomainError {
    /// Whether the error ends the whole batch rather than a single file or set.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DomainError::MismatchedBatchLength { .. }
                | DomainError::UserAbort
                | DomainError::TemplateInvariant(_)
                | DomainError::NoFilesFound(_)
                | DomainError::BadArgs(_)
        )
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::ExtractionFailure { path, reason } => {
                write!(f, "Failed to extract track info from {}: {}", path.display(), reason)
            }
            DomainError::MismatchedBatchLength { primary, expected, found } => write!(
                f,
                "Mismatched batch length: {} matched {} file(s), expected {}",
                primary.display(),
                found,
                expected
            ),
            DomainError::UnknownCodecOrExtension(codec) => {
                write!(f, "Unknown codec or extension: {}", codec)
            }
            DomainError::InvalidLanguageCode(code) => write!(f, "Invalid language code: {}", code),
            DomainError::UserAbort => write!(f, "Aborted by user"),
            DomainError::ExternalToolFailure { tool, message } => {
                write!(f, "{} failed: {}", tool, message)
            }
            DomainError::ValidationTimeout { path, seconds } => write!(
                f,
                "Validation of {} timed out after {}s",
                path.display(),
                seconds
            ),
            DomainError::TemplateInvariant(msg) => write!(f, "Invalid track template: {}", msg),
            DomainError::TemplateMismatch { path, reason } => write!(
                f,
                "Template does not apply to {}: {}",
                path.display(),
                reason
            ),
            DomainError::NoFilesFound(msg) => write!(f, "No files found: {}", msg),
            DomainError::BadArgs(msg) => write!(f, "Bad arguments: {}", msg),
            DomainError::FsFail(msg) => write!(f, "File system error: {}", msg),
            DomainError::MetadataFail(msg) => write!(f, "Metadata service error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::FsFail(err.to_string())
    }
}
