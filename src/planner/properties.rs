//! Post-mux property edits

use crate::domain::model::*;

/// Emits one metadata edit per template track
pub struct PropertyUpdater;

impl PropertyUpdater {
    /// Edits addressed by final track number; additional-flags mode also
    /// writes the origin and accessibility flags.
    pub fn edits(tracks: &[Track], additional_flags: bool) -> Vec<PropertyEdit> {
        tracks
            .iter()
            .map(|track| PropertyEdit {
                track_number: track.ordinal,
                default_flag: track.default_flag,
                forced_flag: track.forced_flag,
                language: track.language.clone(),
                name: track.name.clone(),
                additional: additional_flags.then(|| AdditionalFlags {
                    original: track.flag_original,
                    hearing_impaired: track.flag_hearing_impaired,
                    visual_impaired: track.flag_visual_impaired,
                    text_descriptions: track.flag_text_descriptions,
                    commentary: track.flag_commentary,
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template_tracks() -> Vec<Track> {
        let mut video = Track::new(0, 2, TrackType::Video, "H.264", "/d/A.mkv");
        video.ordinal = 1;
        video.default_flag = true;
        let mut audio = Track::new(0, 0, TrackType::Audio, "AAC", "/d/A.mkv");
        audio.ordinal = 2;
        audio.default_flag = true;
        audio.language = "jpn".to_string();
        audio.flag_original = true;
        audio.name = Some("Japanese".to_string());
        vec![video, audio]
    }

    #[test]
    fn test_one_edit_per_track_by_final_position() {
        let edits = PropertyUpdater::edits(&template_tracks(), false);
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0].track_number, 1);
        assert!(edits[0].default_flag);
        assert_eq!(edits[0].language, "und");
        assert_eq!(edits[0].name, None);
        assert_eq!(edits[1].track_number, 2);
        assert!(edits[1].default_flag);
        assert_eq!(edits[1].name.as_deref(), Some("Japanese"));
        assert!(edits.iter().all(|edit| edit.additional.is_none()));
    }

    #[test]
    fn test_additional_flags_mode() {
        let edits = PropertyUpdater::edits(&template_tracks(), true);
        let flags = edits[1].additional.unwrap();
        assert!(flags.original);
        assert!(!flags.commentary);
        assert!(!edits[0].additional.unwrap().original);
    }
}
