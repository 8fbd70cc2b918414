//! In-memory adapters for driving the interactors without external tools

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

fn poisoned(what: &str) -> DomainError {
    DomainError::FsFail(format!("{} lock poisoned", what))
}

/// Probe answering from a path to track table.
///
/// Tracks are stored as the file's own list; `file_id` and `source_path` are
/// rewritten on every probe like the real inspector does.
#[derive(Debug, Default)]
pub struct MockProbeAdapter {
    tracks: Mutex<HashMap<PathBuf, Vec<Track>>>,
}

impl MockProbeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: impl Into<PathBuf>, tracks: Vec<Track>) -> Self {
        self.set_file(path, tracks);
        self
    }

    pub fn set_file(&self, path: impl Into<PathBuf>, tracks: Vec<Track>) {
        if let Ok(mut table) = self.tracks.lock() {
            table.insert(path.into(), tracks);
        }
    }
}

#[async_trait]
impl ProbePort for MockProbeAdapter {
    async fn probe_tracks(&self, file_path: &Path, file_id: usize) -> Result<Vec<Track>, DomainError> {
        let table = self.tracks.lock().map_err(|_| poisoned("probe"))?;
        let tracks = table.get(file_path).ok_or_else(|| DomainError::ExtractionFailure {
            path: file_path.to_path_buf(),
            reason: "no such file in the probe table".to_string(),
        })?;
        Ok(tracks
            .iter()
            .enumerate()
            .map(|(index, track)| {
                let mut track = track.clone();
                track.file_id = file_id;
                track.source_path = file_path.to_path_buf();
                track.ordinal = index + 1;
                track
            })
            .collect())
    }
}

/// Multiplexer recording every plan and writing an empty output file
#[derive(Debug, Default)]
pub struct MockMuxAdapter {
    plans: Mutex<Vec<MuxPlan>>,
    fail: bool,
}

impl MockMuxAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every mux call fails like a crashed mkvmerge
    pub fn failing() -> Self {
        Self {
            plans: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn plans(&self) -> Vec<MuxPlan> {
        self.plans.lock().map(|plans| plans.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MuxPort for MockMuxAdapter {
    async fn mux(&self, plan: &MuxPlan) -> Result<(), DomainError> {
        self.plans.lock().map_err(|_| poisoned("mux"))?.push(plan.clone());
        if self.fail {
            return Err(DomainError::ExternalToolFailure {
                tool: "mkvmerge".to_string(),
                message: "exited with code 2".to_string(),
            });
        }
        std::fs::write(&plan.output_path, b"")?;
        Ok(())
    }
}

/// Property editor recording `(file, edit)` pairs
#[derive(Debug, Default)]
pub struct MockPropEditAdapter {
    edits: Mutex<Vec<(PathBuf, PropertyEdit)>>,
}

impl MockPropEditAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edits(&self) -> Vec<(PathBuf, PropertyEdit)> {
        self.edits.lock().map(|edits| edits.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PropEditPort for MockPropEditAdapter {
    async fn edit_track(&self, file_path: &Path, edit: &PropertyEdit) -> Result<(), DomainError> {
        self.edits
            .lock()
            .map_err(|_| poisoned("propedit"))?
            .push((file_path.to_path_buf(), edit.clone()));
        Ok(())
    }
}

/// Extractor recording requests and creating the target files
#[derive(Debug, Default)]
pub struct MockExtractAdapter {
    requests: Mutex<Vec<(PathBuf, Vec<ExtractTarget>)>>,
}

impl MockExtractAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<(PathBuf, Vec<ExtractTarget>)> {
        self.requests.lock().map(|requests| requests.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ExtractPort for MockExtractAdapter {
    async fn extract_tracks(&self, file_path: &Path, targets: &[ExtractTarget]) -> Result<(), DomainError> {
        for target in targets {
            std::fs::write(&target.output_path, b"")?;
        }
        self.requests
            .lock()
            .map_err(|_| poisoned("extract"))?
            .push((file_path.to_path_buf(), targets.to_vec()));
        Ok(())
    }
}

/// Validator with per-file verdicts; unknown files are valid
#[derive(Debug, Default)]
pub struct MockValidatorAdapter {
    invalid: Vec<PathBuf>,
    timing_out: Vec<PathBuf>,
}

impl MockValidatorAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_invalid(mut self, path: impl Into<PathBuf>) -> Self {
        self.invalid.push(path.into());
        self
    }

    pub fn with_timeout(mut self, path: impl Into<PathBuf>) -> Self {
        self.timing_out.push(path.into());
        self
    }
}

#[async_trait]
impl ValidatorPort for MockValidatorAdapter {
    async fn validate(&self, file_path: &Path, timeout: Duration) -> Result<ValidationReport, DomainError> {
        if self.timing_out.iter().any(|path| path == file_path) {
            return Err(DomainError::ValidationTimeout {
                path: file_path.to_path_buf(),
                seconds: timeout.as_secs(),
            });
        }
        let valid = !self.invalid.iter().any(|path| path == file_path);
        Ok(ValidationReport {
            path: file_path.to_path_buf(),
            valid,
            details: if valid { String::new() } else { "ERR201: invalid EBML header".to_string() },
        })
    }
}

/// Metadata service keyed by basename, counting refresh requests
#[derive(Debug, Default)]
pub struct MockMetadataAdapter {
    entries: HashMap<String, EpisodeInfo>,
    refreshes: Mutex<usize>,
}

impl MockMetadataAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_episode(mut self, file_name: &str, season: u32, episode: u32) -> Self {
        self.entries.insert(
            file_name.to_string(),
            EpisodeInfo {
                series: None,
                season: Some(season),
                episode: Some(episode),
                title: None,
            },
        );
        self
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes.lock().map(|count| *count).unwrap_or_default()
    }
}

#[async_trait]
impl MetadataPort for MockMetadataAdapter {
    async fn lookup(&self, file_path: &Path) -> Result<Option<EpisodeInfo>, DomainError> {
        let name = file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(self.entries.get(&name).cloned())
    }

    async fn refresh_libraries(&self) -> Result<(), DomainError> {
        *self.refreshes.lock().map_err(|_| poisoned("metadata"))? += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_probe_rewrites_file_identity() {
        let probe = MockProbeAdapter::new().with_file(
            "/d/A.mkv",
            vec![
                Track::new(9, 0, TrackType::Video, "H.264", "/x"),
                Track::new(9, 1, TrackType::Audio, "AAC", "/x"),
            ],
        );
        let tracks = probe.probe_tracks(Path::new("/d/A.mkv"), 2).await.unwrap();
        assert!(tracks.iter().all(|t| t.file_id == 2 && t.source_path == Path::new("/d/A.mkv")));
        assert_eq!(tracks[1].ordinal, 2);
        assert!(matches!(
            probe.probe_tracks(Path::new("/d/B.mkv"), 0).await,
            Err(DomainError::ExtractionFailure { .. })
        ));
    }

    #[tokio::test]
    async fn test_validator_verdicts() {
        let validator = MockValidatorAdapter::new()
            .with_invalid("/d/bad.mkv")
            .with_timeout("/d/slow.mkv");
        let timeout = Duration::from_secs(5);
        assert!(validator.validate(Path::new("/d/ok.mkv"), timeout).await.unwrap().valid);
        assert!(!validator.validate(Path::new("/d/bad.mkv"), timeout).await.unwrap().valid);
        assert_eq!(
            validator.validate(Path::new("/d/slow.mkv"), timeout).await,
            Err(DomainError::ValidationTimeout {
                path: PathBuf::from("/d/slow.mkv"),
                seconds: 5
            })
        );
    }
}
