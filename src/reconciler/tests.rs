// Unit tests for the reconciliation protocol

use super::*;
use crate::adapters::console::ScriptedConsole;

fn track(file_id: usize, track_id: u64, track_type: TrackType, language: &str) -> Track {
    let source = if file_id == 0 { "/d/A.mkv" } else { "/d/A.eng.srt" };
    let mut track = Track::new(file_id, track_id, track_type, "codec", source);
    track.language = language.to_string();
    track
}

fn reconcile(
    reference: &[Track],
    answers: &[&str],
    options: ReconcileOptions,
) -> (Result<TrackTemplate, DomainError>, ScriptedConsole) {
    let mut console = ScriptedConsole::new(answers.iter().copied());
    let result = TemplateReconciler::new(&mut console, options).reconcile(reference);
    (result, console)
}

fn ids(template: &TrackTemplate) -> Vec<String> {
    template.tracks().iter().map(|t| t.global_id().to_string()).collect()
}

#[test]
fn test_subtitles_follow_audio_regardless_of_file_order() {
    let reference = vec![
        track(0, 0, TrackType::Audio, "jpn"),
        track(0, 1, TrackType::Subtitles, "eng"),
        track(0, 2, TrackType::Video, "und"),
        track(1, 0, TrackType::Subtitles, "eng"),
    ];
    let answers = ["", "", "0:1", "", "", "", "y"];
    let (result, console) = reconcile(&reference, &answers, ReconcileOptions::default());
    let template = result.unwrap();

    assert_eq!(ids(&template), vec!["0:2", "0:0", "0:1"]);
    let tracks = template.tracks();
    assert_eq!(tracks[0].track_type, TrackType::Video);
    assert!(tracks[0].default_flag);
    assert!(tracks[1].default_flag);
    assert!(!tracks[2].default_flag);
    assert!(!tracks[2].forced_flag);
    assert_eq!(tracks[2].language, "eng");
    assert_eq!(
        tracks.iter().map(|t| t.ordinal).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(console.remaining(), 0);
}

#[test]
fn test_invalid_answers_are_asked_again() {
    let reference = vec![
        track(0, 0, TrackType::Video, "und"),
        track(0, 1, TrackType::Audio, "jpn"),
        track(0, 2, TrackType::Audio, "und"),
    ];
    let answers = [
        "",         // video name
        "0:5",      // not a candidate
        "0-1",      // malformed
        "0:2,0:1",  // order
        "0:1,0:2",  // too many defaults
        "",         // default is mandatory
        "0:2",      // default
        "xx1",      // invalid language
        "eng",      // language for 0:2
        "English",  // name for 0:2
        "",         // name for 0:1
        "yes",
    ];
    let (result, console) = reconcile(&reference, &answers, ReconcileOptions::default());
    let template = result.unwrap();

    assert_eq!(ids(&template), vec!["0:0", "0:2", "0:1"]);
    let english = &template.tracks()[1];
    assert!(english.default_flag);
    assert_eq!(english.language, "eng");
    assert_eq!(english.name.as_deref(), Some("English"));

    let transcript = console.transcript();
    assert!(transcript
        .iter()
        .any(|line| line == "The ID provided, 0:5, is not one of the present IDs. Try again:"));
    assert!(transcript
        .iter()
        .any(|line| line == "The ID provided, 0-1, is not of the form int:int. Try again:"));
    assert!(transcript
        .iter()
        .any(|line| line == "You may only choose one track to be DEFAULT. Try again:"));
    assert!(transcript
        .iter()
        .any(|line| line == "Please input a valid 3-letter language code (e.g. 'eng' or 'jpn')."));
}

#[test]
fn test_extra_video_tracks_are_dropped() {
    let reference = vec![
        track(0, 0, TrackType::Video, "und"),
        track(0, 1, TrackType::Audio, "eng"),
        track(1, 0, TrackType::Video, "eng"),
    ];
    let answers = ["1:0", "", "", "y"];
    let (result, _) = reconcile(&reference, &answers, ReconcileOptions::default());
    let template = result.unwrap();

    assert_eq!(ids(&template), vec!["1:0", "0:1"]);
    assert_eq!(template.tracks()[0].language, "und");
    assert!(template.tracks()[0].default_flag);
}

#[test]
fn test_additional_flags_for_audio() {
    let reference = vec![
        track(0, 0, TrackType::Video, "und"),
        track(0, 1, TrackType::Audio, "jpn"),
        track(0, 2, TrackType::Audio, "eng"),
    ];
    let options = ReconcileOptions {
        additional_flags: true,
        ..ReconcileOptions::default()
    };
    let answers = ["", "0:1,0:2", "0:1", "0:1", "", "0:2", "", "", "y"];
    let (result, _) = reconcile(&reference, &answers, options);
    let template = result.unwrap();

    let tracks = template.tracks();
    assert!(tracks[1].flag_original);
    assert!(!tracks[1].flag_commentary);
    assert!(tracks[2].flag_commentary);
    assert!(!tracks[2].flag_visual_impaired);
}

#[test]
fn test_forced_language_prompt_covers_known_languages() {
    let reference = vec![
        track(0, 0, TrackType::Video, "und"),
        track(0, 1, TrackType::Audio, "jpn"),
        track(0, 2, TrackType::Subtitles, "eng"),
    ];
    let options = ReconcileOptions {
        force_language_prompt: true,
        ..ReconcileOptions::default()
    };
    let answers = [
        "",    // video name
        "spa", // language for 0:1
        "",    // name for 0:1
        "0:2", // subtitle order
        "",    // subtitle default
        "",    // subtitle forced
        "",    // language for 0:2, kept
        "",    // name for 0:2
        "y",
    ];
    let (result, console) = reconcile(&reference, &answers, options);
    let template = result.unwrap();

    assert_eq!(template.tracks()[1].language, "spa");
    assert_eq!(template.tracks()[2].language, "eng");
    assert_eq!(template.tracks()[0].language, "und");
    let language_prompts = console
        .transcript()
        .iter()
        .filter(|line| line.starts_with(LANGUAGE_PROMPT))
        .count();
    assert_eq!(language_prompts, 2);
    assert_eq!(console.remaining(), 0);
}

#[test]
fn test_additional_flags_for_subtitles() {
    let reference = vec![
        track(0, 0, TrackType::Video, "und"),
        track(0, 1, TrackType::Audio, "eng"),
        track(0, 2, TrackType::Subtitles, "eng"),
        track(1, 0, TrackType::Subtitles, "eng"),
    ];
    let options = ReconcileOptions {
        additional_flags: true,
        ..ReconcileOptions::default()
    };
    let answers = [
        "",        // video name
        "0:1",     // audio original language
        "",        // audio description
        "",        // commentary
        "",        // name for 0:1
        "0:2,1:0", // subtitle order
        "",        // subtitle default
        "1:0",     // forced
        "",        // original language
        "0:2",     // SDH
        "1:0",     // text descriptions
        "",        // name for 0:2
        "",        // name for 1:0
        "y",
    ];
    let (result, console) = reconcile(&reference, &answers, options);
    let template = result.unwrap();

    assert_eq!(ids(&template), vec!["0:0", "0:1", "0:2", "1:0"]);
    let tracks = template.tracks();
    assert!(tracks[1].flag_original);
    assert!(tracks[2].flag_hearing_impaired);
    assert!(!tracks[2].flag_text_descriptions);
    assert!(!tracks[2].forced_flag);
    assert!(tracks[3].flag_text_descriptions);
    assert!(!tracks[3].flag_hearing_impaired);
    assert!(tracks[3].forced_flag);
    assert!(!tracks[2].flag_original && !tracks[3].flag_original);
    assert!(console
        .transcript()
        .iter()
        .any(|line| line.contains(SDH_DESCRIPTION)));
    assert_eq!(console.remaining(), 0);
}

#[test]
fn test_declined_confirmation_aborts() {
    let reference = vec![track(0, 0, TrackType::Video, "und"), track(0, 1, TrackType::Audio, "eng")];
    let (result, console) = reconcile(&reference, &["", "", "n"], ReconcileOptions::default());
    assert_eq!(result, Err(DomainError::UserAbort));
    assert_eq!(console.transcript().last().map(String::as_str), Some("Aborting. . ."));
}

#[test]
fn test_closed_input_aborts() {
    let reference = vec![track(0, 0, TrackType::Video, "und"), track(0, 1, TrackType::Audio, "eng")];
    let (result, _) = reconcile(&reference, &[], ReconcileOptions::default());
    assert_eq!(result, Err(DomainError::UserAbort));
}

#[test]
fn test_missing_video_is_rejected() {
    let reference = vec![track(0, 0, TrackType::Audio, "eng")];
    let (result, _) = reconcile(&reference, &[], ReconcileOptions::default());
    assert!(matches!(result, Err(DomainError::TemplateInvariant(_))));
}

#[test]
fn test_in_place_edit_keeps_file_order() {
    let reference: Vec<Track> = vec![
        track(0, 0, TrackType::Video, "und"),
        track(0, 1, TrackType::Audio, "jpn"),
        track(0, 2, TrackType::Subtitles, "eng"),
        track(0, 3, TrackType::Audio, "eng"),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, mut t)| {
        t.ordinal = index + 1;
        t
    })
    .collect();
    let options = ReconcileOptions {
        allow_reordering: false,
        ..ReconcileOptions::default()
    };
    let answers = ["", "0:3", "", "", "", "0:2", "", "y"];
    let (result, _) = reconcile(&reference, &answers, options);
    let template = result.unwrap();

    assert_eq!(ids(&template), vec!["0:0", "0:1", "0:2", "0:3"]);
    assert!(template.tracks()[3].default_flag);
    assert!(template.tracks()[2].forced_flag);
}
