// Batch discovery - primary files and structure filtering shared by interactors

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::matcher::FileMatcher;
use crate::ports::*;

/// Top-level listing of a batch directory and its primary files
#[derive(Debug, Clone)]
pub struct Batch {
    pub matcher: FileMatcher,
    pub top_level: Vec<PathBuf>,
    pub primaries: Vec<PathBuf>,
}

/// List `directory` and pick its primary files
pub async fn discover(fs_port: &Arc<dyn FsPort>, directory: &Path) -> Result<Batch, DomainError> {
    if !fs_port.directory_exists(directory).await? {
        return Err(DomainError::BadArgs(format!(
            "Directory does not exist: {}",
            directory.display()
        )));
    }

    let matcher = FileMatcher::new(directory);
    let top_level = fs_port.list_files(directory).await?;
    let primaries = matcher.primaries(&top_level);
    if primaries.is_empty() {
        return Err(DomainError::NoFilesFound(format!(
            "no mkv, mp4 or avi files in {}",
            directory.display()
        )));
    }
    info!("Found {} primary file(s) in {}", primaries.len(), directory.display());

    Ok(Batch {
        matcher,
        top_level,
        primaries,
    })
}

/// Keep the primaries whose identity key equals the first one's.
///
/// The first primary is the reference: failing to inspect it aborts the
/// batch. Any other unreadable or differently structured file is skipped.
pub async fn filter_by_structure(
    probe_port: &Arc<dyn ProbePort>,
    primaries: &[PathBuf],
) -> Result<Vec<PathBuf>, DomainError> {
    let Some((first, rest)) = primaries.split_first() else {
        return Ok(Vec::new());
    };
    let reference = IdentityKey::of(&probe_port.probe_tracks(first, 0).await?);

    let mut conforming = vec![first.clone()];
    for path in rest {
        match probe_port.probe_tracks(path, 0).await {
            Ok(tracks) if IdentityKey::of(&tracks) == reference => conforming.push(path.clone()),
            Ok(_) => warn!(
                "Skipping {}: track structure differs from {}",
                path.display(),
                first.display()
            ),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }
    Ok(conforming)
}

/// Inspect every member of a match set, file ids following member order
pub async fn inspect_set(probe_port: &Arc<dyn ProbePort>, set: &MatchSet) -> Result<Vec<Track>, DomainError> {
    let mut tracks = Vec::new();
    for (file_id, path) in set.files.iter().enumerate() {
        tracks.extend(probe_port.probe_tracks(path, file_id).await?);
    }
    Ok(tracks)
}
