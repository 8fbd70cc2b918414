// Inspect interactor - Orchestrates media file inspection use case

use std::path::PathBuf;
use std::sync::Arc;

use clap::ValueEnum;
use serde::Serialize;
use tracing::info;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;
use crate::reconciler::render_track_line;

/// Output format of an inspection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum InspectFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

/// Request for inspecting one container
#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub input_path: PathBuf,
    pub format: InspectFormat,
}

/// Normalized tracks and their rendering
#[derive(Debug, Clone, Serialize)]
pub struct InspectResponse {
    pub tracks: Vec<Track>,
    #[serde(skip)]
    pub summary: String,
}

/// Interactor for media file inspection use case
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(probe_port: Arc<dyn ProbePort>) -> Self {
        Self { probe_port }
    }

    /// Execute media file inspection
    pub async fn execute(&self, request: InspectRequest) -> Result<InspectResponse, DomainError> {
        if !request.input_path.is_file() {
            return Err(DomainError::FsFail(format!(
                "Input file does not exist: {}",
                request.input_path.display()
            )));
        }

        let tracks = self.probe_port.probe_tracks(&request.input_path, 0).await?;
        info!("Inspected {}: {} tracks", request.input_path.display(), tracks.len());

        let summary = match request.format {
            InspectFormat::Json => Self::format_as_json(&tracks)?,
            InspectFormat::Yaml => Self::format_as_yaml(&tracks)?,
            InspectFormat::Text => Self::format_as_text(&request, &tracks),
        };

        Ok(InspectResponse { tracks, summary })
    }

    /// Format tracks as JSON
    fn format_as_json(tracks: &[Track]) -> Result<String, DomainError> {
        serde_json::to_string_pretty(tracks)
            .map_err(|e| DomainError::BadArgs(format!("JSON serialization failed: {}", e)))
    }

    /// Format tracks as YAML
    fn format_as_yaml(tracks: &[Track]) -> Result<String, DomainError> {
        serde_yaml::to_string(tracks)
            .map_err(|e| DomainError::BadArgs(format!("YAML serialization failed: {}", e)))
    }

    /// Format tracks as transcript lines
    fn format_as_text(request: &InspectRequest, tracks: &[Track]) -> String {
        let mut output = format!("File: {}\n", request.input_path.display());
        for track in tracks {
            output.push_str(&render_track_line(track, tracks));
            let mut flags = Vec::new();
            if track.default_flag {
                flags.push("default");
            }
            if track.forced_flag {
                flags.push("forced");
            }
            if !flags.is_empty() {
                output.push_str(&format!(" [{}]", flags.join(", ")));
            }
            if let Some(dimensions) = &track.pixel_dimensions {
                output.push_str(&format!(" {}", dimensions));
            }
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::MockProbeAdapter;

    #[tokio::test]
    async fn test_text_and_json_output() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("A.mkv");
        std::fs::write(&file, b"").unwrap();

        let mut audio = Track::new(0, 1, TrackType::Audio, "AAC", "");
        audio.language = "jpn".to_string();
        audio.default_flag = true;
        let probe = MockProbeAdapter::new().with_file(
            &file,
            vec![Track::new(0, 0, TrackType::Video, "H.264", ""), audio],
        );
        let interactor = InspectInteractor::new(Arc::new(probe));

        let text = interactor
            .execute(InspectRequest {
                input_path: file.clone(),
                format: InspectFormat::Text,
            })
            .await
            .unwrap();
        assert!(text
            .summary
            .contains("ID: 0:1, Type: audio, Language: jpn, Codec: AAC, Source filename: A.mkv [default]"));

        let json = interactor
            .execute(InspectRequest {
                input_path: file,
                format: InspectFormat::Json,
            })
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json.summary).unwrap();
        assert_eq!(parsed[1]["language"], "jpn");
        assert_eq!(parsed[0]["type"], "video");
    }

    #[tokio::test]
    async fn test_missing_file() {
        let interactor = InspectInteractor::new(Arc::new(MockProbeAdapter::new()));
        let result = interactor
            .execute(InspectRequest {
                input_path: PathBuf::from("/nonexistent/A.mkv"),
                format: InspectFormat::Text,
            })
            .await;
        assert!(matches!(result, Err(DomainError::FsFail(_))));
    }
}
