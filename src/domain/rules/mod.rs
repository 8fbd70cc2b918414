// Domain rules - Business logic and policies

use crate::domain::errors::DomainError;
use crate::domain::model::*;

/// Decides whether a match set already conforms to the template
pub struct IdentityComparator;

impl IdentityComparator {
    /// Choose between a plain copy and a remux.
    ///
    /// `resolved` is the template applied to the match set, `current` the
    /// freshly inspected tracks of the set's first file. A non-zero subtitle
    /// delay can only be applied by the multiplexer, so it always remuxes.
    pub fn decide(resolved: &[Track], current: &[Track], subtitle_delay_ms: i64) -> OutputAction {
        if subtitle_delay_ms != 0 {
            return OutputAction::Remux;
        }
        if IdentityKey::of(resolved) == IdentityKey::of(current) {
            OutputAction::Copy
        } else {
            OutputAction::Remux
        }
    }
}

/// Canonical codec identity and the sidecar extension it extracts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecEntry {
    pub label: &'static str,
    pub extension: &'static str,
}

const CODEC_TABLE: &[(&str, CodecEntry)] = &[
    ("SubStationAlpha", CodecEntry { label: "SubStationAlpha", extension: "ass" }),
    ("SSA", CodecEntry { label: "SSA", extension: "ssa" }),
    ("SRT", CodecEntry { label: "SRT", extension: "srt" }),
    ("SubRip/SRT", CodecEntry { label: "SRT", extension: "srt" }),
    ("VobSub", CodecEntry { label: "VobSub", extension: "sub" }),
    ("HDMV PGS", CodecEntry { label: "PGS", extension: "sup" }),
    ("PGS", CodecEntry { label: "PGS", extension: "sup" }),
    ("AC-3", CodecEntry { label: "AC-3", extension: "ac3" }),
    ("E-AC-3", CodecEntry { label: "E-AC-3", extension: "eac3" }),
    ("AAC", CodecEntry { label: "AAC", extension: "aac" }),
    ("DTS", CodecEntry { label: "DTS", extension: "dts" }),
    ("FLAC", CodecEntry { label: "FLAC", extension: "flac" }),
    ("MP3", CodecEntry { label: "MP3", extension: "mp3" }),
    ("Opus", CodecEntry { label: "Opus", extension: "opus" }),
    ("Vorbis", CodecEntry { label: "Vorbis", extension: "ogg" }),
    ("H.264", CodecEntry { label: "H.264", extension: "h264" }),
    ("AVC", CodecEntry { label: "H.264", extension: "h264" }),
    ("H.265", CodecEntry { label: "HEVC", extension: "hevc" }),
    ("HEVC", CodecEntry { label: "HEVC", extension: "hevc" }),
    ("AV1", CodecEntry { label: "AV1", extension: "av1" }),
    ("MPEG-4p2", CodecEntry { label: "MPEG-4p2", extension: "mp4" }),
];

/// Maps multiplexer codec strings onto canonical labels and extensions
pub struct CodecCatalog;

impl CodecCatalog {
    /// Look up a codec string that may be a slash-separated list of aliases.
    ///
    /// The whole string is tried first, then each alias from left to right.
    pub fn lookup(codec: &str) -> Option<CodecEntry> {
        let find = |name: &str| {
            CODEC_TABLE
                .iter()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(name.trim()))
                .map(|(_, entry)| *entry)
        };
        find(codec).or_else(|| codec.split('/').find_map(find))
    }

    /// Canonical label, or the raw codec string when it is not in the table
    pub fn canonical_label(codec: &str) -> String {
        Self::lookup(codec)
            .map(|entry| entry.label.to_string())
            .unwrap_or_else(|| codec.to_string())
    }

    /// Extension a sidecar of this codec is written with
    pub fn extension_for(codec: &str) -> Result<&'static str, DomainError> {
        Self::lookup(codec)
            .map(|entry| entry.extension)
            .ok_or_else(|| DomainError::UnknownCodecOrExtension(codec.to_string()))
    }
}

#[cfg(test)]
mod tests;
