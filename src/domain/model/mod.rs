// Domain models - Core types and data structures

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Language sentinel used when a track carries no usable language tag
pub const UNDETERMINED_LANGUAGE: &str = "und";

/// Kind of stream carried by a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackType {
    Video,
    Audio,
    Subtitles,
    Other,
}

impl TrackType {
    /// Map the multiplexer's type string onto a track type
    pub fn from_tool_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "video" => TrackType::Video,
            "audio" => TrackType::Audio,
            "subtitles" | "subtitle" => TrackType::Subtitles,
            _ => TrackType::Other,
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrackType::Video => "video",
            TrackType::Audio => "audio",
            TrackType::Subtitles => "subtitles",
            TrackType::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// `(fileId, trackId)` pair identifying one track inside a match set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GlobalTrackId {
    pub file_id: usize,
    pub track_id: u64,
}

impl GlobalTrackId {
    pub fn new(file_id: usize, track_id: u64) -> Self {
        Self { file_id, track_id }
    }
}

impl fmt::Display for GlobalTrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file_id, self.track_id)
    }
}

impl FromStr for GlobalTrackId {
    type Err = DomainError;

    /// Parse the strict `digits:digits` form, no whitespace allowed
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::BadArgs(format!("'{}' is not of the form int:int", s));

        let (file_part, track_part) = s.split_once(':').ok_or_else(invalid)?;
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(file_part) || !all_digits(track_part) {
            return Err(invalid());
        }

        let file_id = file_part.parse::<usize>().map_err(|_| invalid())?;
        let track_id = track_part.parse::<u64>().map_err(|_| invalid())?;
        Ok(Self { file_id, track_id })
    }
}

/// Frame size reported for video tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelDimensions {
    pub width: u32,
    pub height: u32,
}

impl PixelDimensions {
    /// Parse the `WIDTHxHEIGHT` form used by the multiplexer
    pub fn parse(value: &str) -> Option<Self> {
        let (width, height) = value.trim().split_once('x')?;
        Some(Self {
            width: width.parse().ok()?,
            height: height.parse().ok()?,
        })
    }
}

impl fmt::Display for PixelDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One stream inside one container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Index of the container within its match set
    pub file_id: usize,
    /// Container-local stream identifier
    pub track_id: u64,
    #[serde(rename = "type")]
    pub track_type: TrackType,
    pub codec: String,
    pub pixel_dimensions: Option<PixelDimensions>,
    pub language: String,
    pub default_flag: bool,
    pub forced_flag: bool,
    pub flag_original: bool,
    pub flag_hearing_impaired: bool,
    pub flag_visual_impaired: bool,
    pub flag_text_descriptions: bool,
    pub flag_commentary: bool,
    pub name: Option<String>,
    /// 1-based position; file order from the inspector, template order once reconciled
    pub ordinal: usize,
    /// Container the track was read from
    pub source_path: PathBuf,
}

impl Track {
    /// Create a track with every flag cleared and an undetermined language
    pub fn new(
        file_id: usize,
        track_id: u64,
        track_type: TrackType,
        codec: impl Into<String>,
        source_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            file_id,
            track_id,
            track_type,
            codec: codec.into(),
            pixel_dimensions: None,
            language: UNDETERMINED_LANGUAGE.to_string(),
            default_flag: false,
            forced_flag: false,
            flag_original: false,
            flag_hearing_impaired: false,
            flag_visual_impaired: false,
            flag_text_descriptions: false,
            flag_commentary: false,
            name: None,
            ordinal: 0,
            source_path: source_path.into(),
        }
    }

    pub fn global_id(&self) -> GlobalTrackId {
        GlobalTrackId::new(self.file_id, self.track_id)
    }

    pub fn has_undetermined_language(&self) -> bool {
        self.language == UNDETERMINED_LANGUAGE
    }

    /// The kept video track is the default stream and carries no other flags
    pub fn mark_as_template_video(&mut self) {
        self.default_flag = true;
        self.forced_flag = false;
        self.language = UNDETERMINED_LANGUAGE.to_string();
        self.flag_original = false;
        self.flag_hearing_impaired = false;
        self.flag_visual_impaired = false;
        self.flag_text_descriptions = false;
        self.flag_commentary = false;
    }
}

/// Category of a file derived from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Subtitle,
    Audio,
    /// Raw video elementary stream
    VideoStream,
    /// Multi-track container
    Container,
    Font,
}

impl FileKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "ass" | "ssa" | "srt" | "sub" | "sup" => Some(FileKind::Subtitle),
            "ac3" | "eac3" | "aac" | "dts" | "flac" | "mp3" | "opus" | "ogg" => Some(FileKind::Audio),
            "h264" | "hevc" | "av1" => Some(FileKind::VideoStream),
            "mp4" | "mkv" | "avi" => Some(FileKind::Container),
            "ttf" | "otf" => Some(FileKind::Font),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Whether the multiplexer accepts the file as an input source
    pub fn is_muxable(&self) -> bool {
        !matches!(self, FileKind::Font)
    }

    pub fn is_video(&self) -> bool {
        matches!(self, FileKind::VideoStream | FileKind::Container)
    }
}

/// Ordered files believed to hold one logical content unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchSet {
    pub files: Vec<PathBuf>,
}

impl MatchSet {
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// First member with a video or container extension
    pub fn primary(&self) -> Option<&Path> {
        self.files
            .iter()
            .map(PathBuf::as_path)
            .find(|path| FileKind::from_path(path).map_or(false, |kind| kind.is_video()))
    }
}

/// One `(fileId, trackId, type, language)` tuple of an identity key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityEntry {
    pub id: GlobalTrackId,
    pub track_type: TrackType,
    pub language: String,
}

/// Reduced projection of a track list used to detect no-op remuxes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityKey(pub Vec<IdentityEntry>);

impl IdentityKey {
    pub fn of(tracks: &[Track]) -> Self {
        Self(
            tracks
                .iter()
                .map(|track| IdentityEntry {
                    id: track.global_id(),
                    track_type: track.track_type,
                    language: track.language.clone(),
                })
                .collect(),
        )
    }
}

/// Canonical ordered track list built once per batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackTemplate {
    tracks: Vec<Track>,
    /// Position of each track among its file's tracks of the same type
    slots: Vec<usize>,
}

impl TrackTemplate {
    /// Build a template from reconciled tracks, checking every structural invariant.
    ///
    /// `reference` is the full inspected track list of the reference match set;
    /// it fixes the per-type position each template track is later resolved by.
    pub fn new(tracks: Vec<Track>, reference: &[Track]) -> Result<Self, DomainError> {
        let video_count = tracks
            .iter()
            .filter(|t| t.track_type == TrackType::Video)
            .count();
        if video_count != 1 {
            return Err(DomainError::TemplateInvariant(format!(
                "expected exactly one video track, found {}",
                video_count
            )));
        }

        for track_type in [TrackType::Video, TrackType::Audio, TrackType::Subtitles] {
            let group: Vec<&Track> = tracks.iter().filter(|t| t.track_type == track_type).collect();
            let defaults = group.iter().filter(|t| t.default_flag).count();
            if defaults > 1 {
                return Err(DomainError::TemplateInvariant(format!(
                    "{} {} tracks are marked default",
                    defaults, track_type
                )));
            }
            if track_type != TrackType::Subtitles && !group.is_empty() && defaults != 1 {
                return Err(DomainError::TemplateInvariant(format!(
                    "one {} track must be marked default",
                    track_type
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for (index, track) in tracks.iter().enumerate() {
            if !seen.insert(track.global_id()) {
                return Err(DomainError::TemplateInvariant(format!(
                    "track {} appears more than once",
                    track.global_id()
                )));
            }
            if track.ordinal != index + 1 {
                return Err(DomainError::TemplateInvariant(format!(
                    "track {} has ordinal {}, expected {}",
                    track.global_id(),
                    track.ordinal,
                    index + 1
                )));
            }
        }

        let slots = tracks
            .iter()
            .map(|track| {
                reference
                    .iter()
                    .filter(|r| r.file_id == track.file_id && r.track_type == track.track_type)
                    .position(|r| r.track_id == track.track_id)
                    .ok_or_else(|| {
                        DomainError::TemplateInvariant(format!(
                            "track {} is not part of the reference match set",
                            track.global_id()
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tracks, slots })
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey::of(&self.tracks)
    }

    /// Apply the template to another match set.
    ///
    /// Each template track is matched to the track of `current` with the same
    /// file id and type at the same per-type position; presentation fields come
    /// from the template, stream identity from the match set.
    pub fn resolve(&self, set: &MatchSet, current: &[Track]) -> Result<Vec<Track>, DomainError> {
        self.tracks
            .iter()
            .zip(&self.slots)
            .map(|(template_track, &slot)| {
                let counterpart = current
                    .iter()
                    .filter(|t| {
                        t.file_id == template_track.file_id
                            && t.track_type == template_track.track_type
                    })
                    .nth(slot)
                    .ok_or_else(|| DomainError::TemplateMismatch {
                        path: set
                            .files
                            .get(template_track.file_id)
                            .cloned()
                            .unwrap_or_default(),
                        reason: format!(
                            "no {} track #{} in file {}",
                            template_track.track_type,
                            slot + 1,
                            template_track.file_id
                        ),
                    })?;

                let mut resolved = template_track.clone();
                resolved.track_id = counterpart.track_id;
                resolved.codec = counterpart.codec.clone();
                resolved.pixel_dimensions = counterpart.pixel_dimensions;
                resolved.source_path = counterpart.source_path.clone();
                Ok(resolved)
            })
            .collect()
    }
}

/// Per-type inclusion instruction for one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TypeInclusion {
    /// Keep exactly these container-local track ids
    Include(Vec<u64>),
    /// Drop every track of this type
    Exclude,
}

impl TypeInclusion {
    pub fn from_ids(ids: Vec<u64>) -> Self {
        if ids.is_empty() {
            TypeInclusion::Exclude
        } else {
            TypeInclusion::Include(ids)
        }
    }
}

/// Inclusion lists for one input file of a multiplex
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInclusion {
    pub path: PathBuf,
    pub video: TypeInclusion,
    pub audio: TypeInclusion,
    pub subtitles: TypeInclusion,
}

/// Timing shift for one track, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncOffset {
    pub id: GlobalTrackId,
    pub offset_ms: i64,
}

/// Concrete multiplex instruction for one match set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MuxPlan {
    pub output_path: PathBuf,
    pub track_order: Vec<GlobalTrackId>,
    pub sources: Vec<SourceInclusion>,
    pub attachments: Vec<PathBuf>,
    pub sync: Vec<SyncOffset>,
}

impl MuxPlan {
    /// Sync offsets scoped to the given source file
    pub fn sync_for_file(&self, file_id: usize) -> impl Iterator<Item = &SyncOffset> {
        self.sync.iter().filter(move |offset| offset.id.file_id == file_id)
    }
}

/// Accessibility and origin flags written in additional-flags mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdditionalFlags {
    pub original: bool,
    pub hearing_impaired: bool,
    pub visual_impaired: bool,
    pub text_descriptions: bool,
    pub commentary: bool,
}

/// Post-mux metadata edit for one track, addressed by its final position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyEdit {
    pub track_number: usize,
    pub default_flag: bool,
    pub forced_flag: bool,
    pub language: String,
    pub name: Option<String>,
    pub additional: Option<AdditionalFlags>,
}

/// How an output file is produced for a match set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutputAction {
    /// Structure already conforms; the primary file is copied
    Copy,
    /// Tracks are re-multiplexed following the plan
    Remux,
}
