// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for container introspection
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Read the ordered tracks of a container, tagging each with `file_id`
    async fn probe_tracks(&self, file_path: &Path, file_id: usize) -> Result<Vec<Track>, DomainError>;
}

/// Port for the external multiplexer
#[async_trait]
pub trait MuxPort: Send + Sync {
    /// Write a new container exactly as described by the plan
    async fn mux(&self, plan: &MuxPlan) -> Result<(), DomainError>;
}

/// Port for in-place track property edits
#[async_trait]
pub trait PropEditPort: Send + Sync {
    /// Apply one track edit to an existing container
    async fn edit_track(&self, file_path: &Path, edit: &PropertyEdit) -> Result<(), DomainError>;
}

/// A single track to write out as a sidecar file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractTarget {
    pub track_id: u64,
    pub output_path: PathBuf,
}

/// Port for single-track extraction
#[async_trait]
pub trait ExtractPort: Send + Sync {
    async fn extract_tracks(&self, file_path: &Path, targets: &[ExtractTarget]) -> Result<(), DomainError>;
}

/// Outcome of a container integrity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub path: PathBuf,
    pub valid: bool,
    /// Cleaned validator output, kept for invalid files
    pub details: String,
}

/// Port for container integrity validation
#[async_trait]
pub trait ValidatorPort: Send + Sync {
    /// Validate a file; exceeding `timeout` yields `DomainError::ValidationTimeout`
    async fn validate(&self, file_path: &Path, timeout: Duration) -> Result<ValidationReport, DomainError>;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if directory exists
    async fn directory_exists(&self, dir_path: &Path) -> Result<bool, DomainError>;

    /// Files directly inside a directory, sorted by path
    async fn list_files(&self, dir_path: &Path) -> Result<Vec<PathBuf>, DomainError>;

    /// Files inside a directory and its immediate subdirectories, sorted by path
    async fn list_files_with_subdirectories(&self, dir_path: &Path) -> Result<Vec<PathBuf>, DomainError>;

    /// Create directory (including parent directories)
    async fn create_directory(&self, dir_path: &Path) -> Result<(), DomainError>;

    /// Create an empty temporary file inside `dir_path` and return its path
    async fn create_temp_file(&self, dir_path: &Path, prefix: &str, suffix: &str) -> Result<PathBuf, DomainError>;

    /// Copy file
    async fn copy_file(&self, from: &Path, to: &Path) -> Result<(), DomainError>;

    /// Move file, replacing the destination
    async fn move_file(&self, from: &Path, to: &Path) -> Result<(), DomainError>;

    /// Delete file
    async fn delete_file(&self, file_path: &Path) -> Result<(), DomainError>;
}

/// Episode details resolved by the metadata service
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EpisodeInfo {
    pub series: Option<String>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub title: Option<String>,
}

/// Port for the media library metadata service
#[async_trait]
pub trait MetadataPort: Send + Sync {
    /// Look up the library entry whose media file has the same basename
    async fn lookup(&self, file_path: &Path) -> Result<Option<EpisodeInfo>, DomainError>;

    /// Ask the service to rescan its libraries
    async fn refresh_libraries(&self) -> Result<(), DomainError>;
}

/// Last library location a lookup succeeded in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryLocation {
    pub section_key: String,
    pub media_key: String,
}

/// Advisory cache owned by a metadata client.
///
/// A miss or a stale entry must only cost a full rescan, never a wrong match.
pub trait LibraryCache: Send + Sync {
    fn get(&self) -> Option<LibraryLocation>;
    fn set(&self, location: LibraryLocation);
    fn invalidate(&self);
}

/// Port for operator interaction.
///
/// The terminal implementation blocks on stdin; scripted implementations
/// answer from a queue so the same prompts can run unattended.
pub trait Console: Send {
    /// Show one line to the operator
    fn print(&mut self, line: &str);

    /// Ask a question; `None` means input is closed
    fn ask(&mut self, prompt: &str) -> Option<String>;
}
