// Unit tests for business rules

use super::*;

fn track(track_id: u64, track_type: TrackType, language: &str) -> Track {
    let mut track = Track::new(0, track_id, track_type, "codec", "a.mkv");
    track.language = language.to_string();
    track
}

#[test]
fn test_identical_structure_is_copied() {
    let current = vec![track(0, TrackType::Video, "und"), track(1, TrackType::Audio, "eng")];
    let resolved = current.clone();
    assert_eq!(IdentityComparator::decide(&resolved, &current, 0), OutputAction::Copy);
}

#[test]
fn test_flag_only_differences_still_copy() {
    let current = vec![track(0, TrackType::Video, "und"), track(1, TrackType::Audio, "eng")];
    let mut resolved = current.clone();
    resolved[1].default_flag = true;
    resolved[1].name = Some("Stereo".to_string());
    assert_eq!(IdentityComparator::decide(&resolved, &current, 0), OutputAction::Copy);
}

#[test]
fn test_reordered_tracks_require_remux() {
    let current = vec![
        track(0, TrackType::Video, "und"),
        track(1, TrackType::Audio, "jpn"),
        track(2, TrackType::Audio, "eng"),
    ];
    let resolved = vec![current[0].clone(), current[2].clone(), current[1].clone()];
    assert_eq!(IdentityComparator::decide(&resolved, &current, 0), OutputAction::Remux);
}

#[test]
fn test_language_change_requires_remux() {
    let current = vec![track(0, TrackType::Video, "und"), track(1, TrackType::Audio, "und")];
    let mut resolved = current.clone();
    resolved[1].language = "eng".to_string();
    assert_eq!(IdentityComparator::decide(&resolved, &current, 0), OutputAction::Remux);
}

#[test]
fn test_subtitle_delay_forces_remux() {
    let current = vec![track(0, TrackType::Video, "und"), track(1, TrackType::Subtitles, "eng")];
    assert_eq!(IdentityComparator::decide(&current, &current, 250), OutputAction::Remux);
}

#[test]
fn test_codec_catalog_aliases() {
    assert_eq!(CodecCatalog::extension_for("SubStationAlpha").unwrap(), "ass");
    assert_eq!(CodecCatalog::extension_for("HDMV PGS").unwrap(), "sup");
    assert_eq!(CodecCatalog::extension_for("AVC/H.264/MPEG-4p10").unwrap(), "h264");
    assert_eq!(CodecCatalog::extension_for("HEVC/H.265/MPEG-H").unwrap(), "hevc");
    assert_eq!(CodecCatalog::canonical_label("SubRip/SRT"), "SRT");
    assert_eq!(CodecCatalog::canonical_label("HEVC/H.265/MPEG-H"), "HEVC");
}

#[test]
fn test_codec_catalog_unknown() {
    assert!(matches!(
        CodecCatalog::extension_for("RealVideo"),
        Err(DomainError::UnknownCodecOrExtension(_))
    ));
    assert_eq!(CodecCatalog::canonical_label("RealVideo"), "RealVideo");
}
