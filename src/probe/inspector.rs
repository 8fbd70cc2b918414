//! Track inspection - maps identification output onto `Track` records

use std::path::Path;

use tracing::debug;

use crate::domain::errors::DomainError;
use crate::domain::language::FilenameTags;
use crate::domain::model::{PixelDimensions, Track, TrackType, UNDETERMINED_LANGUAGE};
use crate::domain::rules::CodecCatalog;
use crate::probe::{Identification, IdentifiedTrack};

/// Normalizes multiplexer output into the track schema
pub struct TrackInspector;

impl TrackInspector {
    /// Parse raw `mkvmerge -J` output for `path` into ordered tracks
    pub fn inspect_json(json: &str, path: &Path, file_id: usize) -> Result<Vec<Track>, DomainError> {
        let identification = Identification::parse(json).map_err(|e| DomainError::ExtractionFailure {
            path: path.to_path_buf(),
            reason: format!("malformed identification output: {}", e),
        })?;
        Self::map_tracks(&identification, path, file_id)
    }

    /// Map an identification document onto tracks tagged with `file_id`
    pub fn map_tracks(
        identification: &Identification,
        path: &Path,
        file_id: usize,
    ) -> Result<Vec<Track>, DomainError> {
        if let Some(reason) = identification.unreadable_reason() {
            return Err(DomainError::ExtractionFailure {
                path: path.to_path_buf(),
                reason,
            });
        }

        let tags = path
            .file_stem()
            .map(|stem| FilenameTags::parse(&stem.to_string_lossy()))
            .unwrap_or_default();

        let tracks: Vec<Track> = identification
            .tracks
            .iter()
            .enumerate()
            .map(|(index, raw)| Self::map_track(raw, index + 1, path, file_id, &tags))
            .collect();

        debug!("Inspected {} tracks in {}", tracks.len(), path.display());
        Ok(tracks)
    }

    fn map_track(
        raw: &IdentifiedTrack,
        ordinal: usize,
        path: &Path,
        file_id: usize,
        tags: &FilenameTags,
    ) -> Track {
        let props = &raw.properties;
        let mut track = Track::new(
            file_id,
            raw.id,
            TrackType::from_tool_name(&raw.track_type),
            CodecCatalog::canonical_label(&raw.codec),
            path,
        );

        // The container's own tag wins unless it is missing or undetermined
        track.language = match props.language.as_deref() {
            Some(language) if !language.is_empty() && language != UNDETERMINED_LANGUAGE => {
                language.to_string()
            }
            _ => tags.language_or_undetermined(),
        };

        track.pixel_dimensions = props.pixel_dimensions.as_deref().and_then(PixelDimensions::parse);
        track.default_flag = props.default_track.unwrap_or(false);
        track.forced_flag = props.forced_track.unwrap_or(tags.forced);
        track.flag_original = props.flag_original.unwrap_or(false);
        track.flag_hearing_impaired = props.flag_hearing_impaired.unwrap_or(false);
        track.flag_visual_impaired = props.flag_visual_impaired.unwrap_or(false);
        track.flag_text_descriptions = props.flag_text_descriptions.unwrap_or(false);
        track.flag_commentary = props.flag_commentary.unwrap_or(false);
        track.name = props.track_name.clone().filter(|name| !name.trim().is_empty());
        track.ordinal = ordinal;
        track
    }
}
