// Extract interactor - Writes tracks of one type out as sidecar files

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::app::discovery::discover;
use crate::domain::errors::*;
use crate::domain::language::normalize_language;
use crate::domain::model::*;
use crate::domain::rules::CodecCatalog;
use crate::ports::*;
use crate::utils::path::PathUtils;

/// Request for a sidecar extraction batch
#[derive(Debug, Clone)]
pub struct ExtractRequest {
    pub directory: PathBuf,
    pub track_type: TrackType,
    /// Only tracks in this language; `None` or `und` extracts all
    pub language: Option<String>,
}

/// Sidecars written per source file
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractReport {
    pub extracted: Vec<PathBuf>,
    pub skipped_tracks: usize,
    pub failed_files: Vec<PathBuf>,
}

/// Interactor for the extract use case
pub struct ExtractInteractor {
    probe_port: Arc<dyn ProbePort>,
    extract_port: Arc<dyn ExtractPort>,
    fs_port: Arc<dyn FsPort>,
}

/// Plan the sidecar paths for one file's tracks.
///
/// A name already taken earlier in the same file gets `.<trackId>` before
/// its extension. Tracks with an unknown codec are skipped.
pub fn plan_targets(source: &Path, tracks: &[Track]) -> Result<(Vec<ExtractTarget>, usize), DomainError> {
    let mut targets: Vec<ExtractTarget> = Vec::new();
    let mut skipped = 0;

    for track in tracks {
        let extension = match CodecCatalog::extension_for(&track.codec) {
            Ok(extension) => extension,
            Err(e) => {
                warn!("Skipping track {} of {}: {}", track.track_id, source.display(), e);
                skipped += 1;
                continue;
            }
        };
        let language = (!track.has_undetermined_language()).then_some(track.language.as_str());
        let forced = track.track_type == TrackType::Subtitles && track.forced_flag;

        let mut output_path = PathUtils::sidecar_path(source, language, forced, extension)?;
        if targets.iter().any(|target| target.output_path == output_path) {
            output_path = PathUtils::with_suffix_before_extension(&output_path, &track.track_id.to_string());
        }
        targets.push(ExtractTarget {
            track_id: track.track_id,
            output_path,
        });
    }

    Ok((targets, skipped))
}

impl ExtractInteractor {
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        extract_port: Arc<dyn ExtractPort>,
        fs_port: Arc<dyn FsPort>,
    ) -> Self {
        Self {
            probe_port,
            extract_port,
            fs_port,
        }
    }

    pub async fn execute(&self, request: ExtractRequest) -> Result<ExtractReport, DomainError> {
        if !matches!(request.track_type, TrackType::Audio | TrackType::Subtitles) {
            return Err(DomainError::BadArgs(format!(
                "Only audio or subtitles tracks can be extracted, not {}",
                request.track_type
            )));
        }
        let language = match request.language.as_deref() {
            Some(code) if !code.trim().eq_ignore_ascii_case(UNDETERMINED_LANGUAGE) => {
                Some(normalize_language(code)?)
            }
            _ => None,
        };

        let batch = discover(&self.fs_port, &request.directory).await?;
        let mut report = ExtractReport::default();

        for path in &batch.primaries {
            let tracks = match self.probe_port.probe_tracks(path, 0).await {
                Ok(tracks) => tracks,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    report.failed_files.push(path.clone());
                    continue;
                }
            };

            let selected: Vec<Track> = tracks
                .into_iter()
                .filter(|t| t.track_type == request.track_type)
                .filter(|t| match &language {
                    Some(wanted) => normalize_language(&t.language).map_or(false, |code| &code == wanted),
                    None => true,
                })
                .collect();
            if selected.is_empty() {
                info!("No matching {} tracks in {}", request.track_type, path.display());
                continue;
            }

            let (targets, skipped) = plan_targets(path, &selected)?;
            report.skipped_tracks += skipped;
            if targets.is_empty() {
                continue;
            }

            match self.extract_port.extract_tracks(path, &targets).await {
                Ok(()) => {
                    info!("Extracted {} track(s) from {}", targets.len(), path.display());
                    report
                        .extracted
                        .extend(targets.into_iter().map(|target| target.output_path));
                }
                Err(e) => {
                    warn!("Extraction failed for {}: {}", path.display(), e);
                    report.failed_files.push(path.clone());
                }
            }
        }

        Ok(report)
    }
}
