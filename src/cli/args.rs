//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::app::inspect_interactor::InspectFormat;
use crate::domain::model::TrackType;

/// Arguments for the remux command
#[derive(Args, Debug)]
pub struct RemuxArgs {
    /// Directory holding the primary files
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Second directory whose files are matched to each episode and appended
    #[arg(short = 'd', long)]
    pub second_directory: Option<PathBuf>,

    /// Ask for a language on every track, not only undetermined ones
    #[arg(short = 'l', long)]
    pub force_language_prompt: bool,

    /// Also ask for original, accessibility and commentary flags
    #[arg(short = 'a', long)]
    pub prompt_additional_tags: bool,

    /// Delay applied to every subtitle track, in milliseconds
    #[arg(long, allow_negative_numbers = true)]
    pub subtitle_delay: Option<i64>,

    /// Answer prompts from this file, one answer per line
    #[arg(long)]
    pub answers: Option<PathBuf>,

    /// Ask the metadata service to rescan its libraries afterwards
    #[arg(long)]
    pub refresh_library: bool,
}

/// Arguments for the edit command
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Directory holding the files to edit in place
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Ask for a language on every track, not only undetermined ones
    #[arg(short = 'l', long)]
    pub force_language_prompt: bool,

    /// Also ask for original, accessibility and commentary flags
    #[arg(short = 'a', long)]
    pub prompt_additional_tags: bool,

    /// Answer prompts from this file, one answer per line
    #[arg(long)]
    pub answers: Option<PathBuf>,
}

/// Track types that can be extracted to sidecars
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExtractTrackType {
    Subtitles,
    Audio,
}

impl From<ExtractTrackType> for TrackType {
    fn from(value: ExtractTrackType) -> Self {
        match value {
            ExtractTrackType::Subtitles => TrackType::Subtitles,
            ExtractTrackType::Audio => TrackType::Audio,
        }
    }
}

/// Arguments for the extract command
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Directory holding the files to extract from
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Type of the tracks to extract
    #[arg(long, value_enum, default_value_t = ExtractTrackType::Subtitles)]
    pub track_type: ExtractTrackType,

    /// Only extract tracks in this language ('und' extracts all)
    #[arg(long)]
    pub language: Option<String>,
}

/// Arguments for the verify command
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Directory holding the files to validate
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Seconds allowed per file [default: 30]
    #[arg(long)]
    pub timeout: Option<u64>,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Container to inspect
    pub file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = InspectFormat::Text)]
    pub format: InspectFormat,
}
