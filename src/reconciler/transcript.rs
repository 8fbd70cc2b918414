//! Operator transcript lines

use std::path::Path;

use crate::domain::model::Track;

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Render one track as `ID: f:t, Type: x, Language: l, Codec: c[, Name: n | , Source filename: b]`.
///
/// `context` holds every track on screen; when another file's basename
/// contains this track's basename, the parent directory is prefixed so the
/// two can be told apart.
pub fn render_track_line(track: &Track, context: &[Track]) -> String {
    let mut line = format!(
        "ID: {}, Type: {}, Language: {}, Codec: {}",
        track.global_id(),
        track.track_type,
        track.language,
        track.codec
    );

    match &track.name {
        Some(name) => line.push_str(&format!(", Name: {}", name)),
        None => {
            let file_name = basename(&track.source_path);
            let ambiguous = context
                .iter()
                .filter(|other| other.file_id != track.file_id)
                .any(|other| basename(&other.source_path).contains(&file_name));
            let shown = match track.source_path.parent().and_then(Path::file_name) {
                Some(parent) if ambiguous => format!("{}/{}", parent.to_string_lossy(), file_name),
                _ => file_name,
            };
            line.push_str(&format!(", Source filename: {}", shown));
        }
    }
    line
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Render one reconciled template entry with its position and flags
pub fn render_template_line(track: &Track) -> String {
    let mut line = format!(
        "#{} ID: {}, Type: {}, Language: {}, Codec: {}, Default: {}, Forced: {}",
        track.ordinal,
        track.global_id(),
        track.track_type,
        track.language,
        track.codec,
        yes_no(track.default_flag),
        yes_no(track.forced_flag)
    );

    let markers: Vec<&str> = [
        (track.flag_original, "original"),
        (track.flag_hearing_impaired, "SDH"),
        (track.flag_visual_impaired, "audio description"),
        (track.flag_text_descriptions, "text descriptions"),
        (track.flag_commentary, "commentary"),
    ]
    .into_iter()
    .filter_map(|(set, label)| set.then_some(label))
    .collect();
    if !markers.is_empty() {
        line.push_str(&format!(", Flags: {}", markers.join("+")));
    }

    if let Some(name) = &track.name {
        line.push_str(&format!(", Name: {}", name));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TrackType;

    #[test]
    fn test_track_line_with_name() {
        let mut track = Track::new(0, 1, TrackType::Audio, "AAC", "/d/A.mkv");
        track.language = "jpn".to_string();
        track.name = Some("Stereo".to_string());
        assert_eq!(
            render_track_line(&track, &[]),
            "ID: 0:1, Type: audio, Language: jpn, Codec: AAC, Name: Stereo"
        );
    }

    #[test]
    fn test_track_line_disambiguates_source_filename() {
        let sidecar = Track::new(1, 0, TrackType::Subtitles, "SRT", "/d/subs/A.srt");
        let other = Track::new(2, 0, TrackType::Subtitles, "SRT", "/d/A.srt.bak.srt");
        assert_eq!(
            render_track_line(&sidecar, &[sidecar.clone(), other.clone()]),
            "ID: 1:0, Type: subtitles, Language: und, Codec: SRT, Source filename: subs/A.srt"
        );
        assert_eq!(
            render_track_line(&sidecar, &[sidecar.clone()]),
            "ID: 1:0, Type: subtitles, Language: und, Codec: SRT, Source filename: A.srt"
        );
    }

    #[test]
    fn test_template_line_lists_flags() {
        let mut track = Track::new(0, 2, TrackType::Subtitles, "SRT", "/d/A.mkv");
        track.ordinal = 3;
        track.forced_flag = true;
        track.flag_hearing_impaired = true;
        assert_eq!(
            render_template_line(&track),
            "#3 ID: 0:2, Type: subtitles, Language: und, Codec: SRT, Default: no, Forced: yes, Flags: SDH"
        );
    }
}
