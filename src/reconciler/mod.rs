//! Template reconciliation - the interactive protocol that turns the tracks
//! of the reference match set into a canonical `TrackTemplate`.
//!
//! Every prompt goes through the `Console` port and every answer is checked
//! by `parse_selection`; rejected answers are reported and asked again, while
//! closed input aborts the batch.

use tracing::info;

use crate::domain::errors::DomainError;
use crate::domain::language::normalize_language;
use crate::domain::model::{GlobalTrackId, Track, TrackTemplate, TrackType};
use crate::domain::selection::{parse_selection, SelectionConstraints};
use crate::ports::Console;

pub mod transcript;

pub use transcript::{render_template_line, render_track_line};

const ORDER_PROMPT: &str = "Enter the new ORDER of track IDs (int:int), separated by commas: ";
const VIDEO_PROMPT: &str = "Enter the ID of the video track that should be kept: ";
const LANGUAGE_PROMPT: &str = "Input a LANGUAGE for the above track (press enter to skip): ";
const NAME_PROMPT: &str = "Input a new NAME for the above track (press enter to skip): ";
const CONFIRM_PROMPT: &str = "Go ahead with editing all the tracks to this format? (type 'y' or 'yes'): ";

const ORIGINAL_DESCRIPTION: &str = "marked as being in the ORIGINAL LANGUAGE";
const AUDIO_DESCRIPTION: &str = "marked as being AUDIO DESCRIPTION";
const COMMENTARY_DESCRIPTION: &str = "marked as being COMMENTARY TRACKS";
const SDH_DESCRIPTION: &str = "marked as for the DEAF AND HARD OF HEARING (a.k.a. SDH or CC)";
const TEXT_DESCRIPTION: &str = "marked as containing TEXT DESCRIPTION of on-screen content";

/// Switches that shape the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    /// Ask for a language on every track, not only undetermined ones
    pub force_language_prompt: bool,
    /// Ask for original/accessibility/commentary flags
    pub additional_flags: bool,
    /// Ask for per-type order and video selection; off for in-place edits
    pub allow_reordering: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            force_language_prompt: false,
            additional_flags: false,
            allow_reordering: true,
        }
    }
}

/// Which flag prompts a track group gets
#[derive(Debug, Clone, Copy)]
struct FlagPrompts {
    default_mandatory: bool,
    forced: bool,
    audio_extras: bool,
    subtitle_extras: bool,
}

/// Drives the operator through building the template
pub struct TemplateReconciler<'a> {
    console: &'a mut dyn Console,
    options: ReconcileOptions,
}

fn ids_of(tracks: &[Track]) -> Vec<GlobalTrackId> {
    tracks.iter().map(Track::global_id).collect()
}

fn flag_prompt(constraints: &SelectionConstraints<'_>) -> String {
    format!(
        "Enter the ID of the track{} (int:int){} that should be {}{}: ",
        if constraints.exclusive { "" } else { "s" },
        if constraints.mandatory { "" } else { ", if any," },
        constraints.description,
        if constraints.exclusive { "" } else { ", separated by commas" }
    )
}

impl<'a> TemplateReconciler<'a> {
    pub fn new(console: &'a mut dyn Console, options: ReconcileOptions) -> Self {
        Self { console, options }
    }

    /// Run the full protocol over the reference set's tracks.
    ///
    /// Returns `UserAbort` when the operator declines the assembled template
    /// or input closes, and `TemplateInvariant` when the tracks cannot form a
    /// valid template.
    pub fn reconcile(&mut self, reference: &[Track]) -> Result<TrackTemplate, DomainError> {
        let of_type = |track_type: TrackType| -> Vec<Track> {
            reference
                .iter()
                .filter(|track| track.track_type == track_type)
                .cloned()
                .collect()
        };
        let mut video = of_type(TrackType::Video);
        let mut audio = of_type(TrackType::Audio);
        let mut subtitles = of_type(TrackType::Subtitles);
        let other = of_type(TrackType::Other);

        if video.is_empty() || (video.len() > 1 && !self.options.allow_reordering) {
            return Err(DomainError::TemplateInvariant(format!(
                "expected exactly one video track, found {}",
                video.len()
            )));
        }

        // Video
        if video.len() > 1 {
            self.console.print("There is more than one video track:");
            self.list(&video, reference);
            let candidates = ids_of(&video);
            let constraints = SelectionConstraints::new(&candidates, "kept").exclusive().mandatory();
            let kept = self.select(VIDEO_PROMPT, &constraints)?;
            video.retain(|track| kept.contains(&track.global_id()));
        }
        for track in &mut video {
            track.mark_as_template_video();
        }
        self.prompt_names(&mut video, reference)?;

        // Audio
        if !audio.is_empty() {
            self.console.print("");
            self.console.print("Audio tracks:");
            self.list(&audio, reference);
            if self.options.allow_reordering {
                audio = self.prompt_order(audio, true)?;
                self.list(&audio, reference);
            }
            let prompts = FlagPrompts {
                default_mandatory: true,
                forced: false,
                audio_extras: self.options.additional_flags,
                subtitle_extras: false,
            };
            self.prompt_flags(&mut audio, prompts)?;
            self.prompt_languages(&mut audio, reference)?;
            self.prompt_names(&mut audio, reference)?;
        }

        // Subtitles
        if !subtitles.is_empty() {
            self.console.print("");
            self.console.print("Subtitles tracks:");
            self.list(&subtitles, reference);
            if self.options.allow_reordering {
                subtitles = self.prompt_order(subtitles, false)?;
                self.list(&subtitles, reference);
            }
            if !subtitles.is_empty() {
                let prompts = FlagPrompts {
                    default_mandatory: false,
                    forced: true,
                    audio_extras: false,
                    subtitle_extras: self.options.additional_flags,
                };
                self.prompt_flags(&mut subtitles, prompts)?;
                self.prompt_languages(&mut subtitles, reference)?;
                self.prompt_names(&mut subtitles, reference)?;
            }
        }

        let mut assembled: Vec<Track> = video
            .into_iter()
            .chain(audio)
            .chain(subtitles)
            .chain(other)
            .collect();

        if self.options.allow_reordering {
            for (index, track) in assembled.iter_mut().enumerate() {
                track.ordinal = index + 1;
            }
        } else {
            // In-place edits address tracks by their existing position
            assembled.sort_by_key(|track| track.ordinal);
        }

        let template = TrackTemplate::new(assembled, reference)?;
        self.confirm(&template)?;
        info!("Track template accepted with {} tracks", template.len());
        Ok(template)
    }

    fn list(&mut self, tracks: &[Track], context: &[Track]) {
        for track in tracks {
            self.console.print(&render_track_line(track, context));
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<String, DomainError> {
        self.console
            .ask(prompt)
            .map(|answer| answer.trim().to_string())
            .ok_or(DomainError::UserAbort)
    }

    /// Ask until the answer satisfies the constraints
    fn select(
        &mut self,
        prompt: &str,
        constraints: &SelectionConstraints<'_>,
    ) -> Result<Vec<GlobalTrackId>, DomainError> {
        if let Some(only) = constraints.automatic_choice() {
            return Ok(vec![only]);
        }
        loop {
            let answer = self.ask(prompt)?;
            match parse_selection(&answer, constraints) {
                Ok(selected) => return Ok(selected),
                Err(e) => self.console.print(&format!("{} Try again:", e)),
            }
        }
    }

    /// Ask for the group's new order; tracks left out are dropped
    fn prompt_order(&mut self, tracks: Vec<Track>, mandatory: bool) -> Result<Vec<Track>, DomainError> {
        let candidates = ids_of(&tracks);
        let mut constraints = SelectionConstraints::new(&candidates, "ordered");
        if mandatory {
            constraints = constraints.mandatory();
        }
        let order = self.select(ORDER_PROMPT, &constraints)?;
        Ok(order
            .iter()
            .filter_map(|id| tracks.iter().find(|track| track.global_id() == *id).cloned())
            .collect())
    }

    fn prompt_flag(
        &mut self,
        candidates: &[GlobalTrackId],
        description: &str,
        exclusive: bool,
        mandatory: bool,
    ) -> Result<Vec<GlobalTrackId>, DomainError> {
        let mut constraints = SelectionConstraints::new(candidates, description);
        if exclusive {
            constraints = constraints.exclusive();
        }
        if mandatory {
            constraints = constraints.mandatory();
        }
        let prompt = flag_prompt(&constraints);
        self.select(&prompt, &constraints)
    }

    /// Flags not asked for are cleared
    fn prompt_flags(&mut self, tracks: &mut [Track], prompts: FlagPrompts) -> Result<(), DomainError> {
        let candidates = ids_of(tracks);

        let default_ids = self.prompt_flag(&candidates, "DEFAULT", true, prompts.default_mandatory)?;
        let forced_ids = if prompts.forced {
            self.prompt_flag(&candidates, "FORCED", false, false)?
        } else {
            Vec::new()
        };

        let mut original_ids = Vec::new();
        let mut visual_ids = Vec::new();
        let mut commentary_ids = Vec::new();
        let mut hearing_ids = Vec::new();
        let mut text_ids = Vec::new();
        if prompts.audio_extras {
            original_ids = self.prompt_flag(&candidates, ORIGINAL_DESCRIPTION, false, false)?;
            visual_ids = self.prompt_flag(&candidates, AUDIO_DESCRIPTION, false, false)?;
            commentary_ids = self.prompt_flag(&candidates, COMMENTARY_DESCRIPTION, false, false)?;
        }
        if prompts.subtitle_extras {
            original_ids = self.prompt_flag(&candidates, ORIGINAL_DESCRIPTION, false, false)?;
            hearing_ids = self.prompt_flag(&candidates, SDH_DESCRIPTION, false, false)?;
            text_ids = self.prompt_flag(&candidates, TEXT_DESCRIPTION, false, false)?;
        }

        for track in tracks.iter_mut() {
            let id = track.global_id();
            track.default_flag = default_ids.contains(&id);
            track.forced_flag = forced_ids.contains(&id);
            track.flag_original = original_ids.contains(&id);
            track.flag_visual_impaired = visual_ids.contains(&id);
            track.flag_commentary = commentary_ids.contains(&id);
            track.flag_hearing_impaired = hearing_ids.contains(&id);
            track.flag_text_descriptions = text_ids.contains(&id);
        }
        Ok(())
    }

    /// Blank skips; an invalid code is reported and asked again
    fn prompt_languages(&mut self, tracks: &mut [Track], context: &[Track]) -> Result<(), DomainError> {
        for track in tracks.iter_mut() {
            if !self.options.force_language_prompt && !track.has_undetermined_language() {
                continue;
            }
            loop {
                self.console.print(&render_track_line(track, context));
                let answer = self.ask(LANGUAGE_PROMPT)?;
                if answer.is_empty() {
                    break;
                }
                match normalize_language(&answer) {
                    Ok(code) => {
                        track.language = code;
                        break;
                    }
                    Err(_) => self
                        .console
                        .print("Please input a valid 3-letter language code (e.g. 'eng' or 'jpn')."),
                }
            }
        }
        Ok(())
    }

    fn prompt_names(&mut self, tracks: &mut [Track], context: &[Track]) -> Result<(), DomainError> {
        for track in tracks.iter_mut() {
            self.console.print(&render_track_line(track, context));
            let answer = self.ask(NAME_PROMPT)?;
            if !answer.is_empty() {
                track.name = Some(answer);
            }
        }
        Ok(())
    }

    fn confirm(&mut self, template: &TrackTemplate) -> Result<(), DomainError> {
        self.console.print("");
        self.console
            .print("Using the following template to update tracks info in all files:");
        for track in template.tracks() {
            self.console.print(&render_template_line(track));
        }
        let answer = self.ask(CONFIRM_PROMPT)?.to_lowercase();
        if answer == "y" || answer == "yes" {
            Ok(())
        } else {
            self.console.print("Aborting. . .");
            Err(DomainError::UserAbort)
        }
    }
}

#[cfg(test)]
mod tests;
