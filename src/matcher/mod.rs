//! File matching - groups primaries and sidecars into match sets

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::domain::language::FilenameTags;
use crate::domain::model::{FileKind, MatchSet};
use crate::utils::path::REMUX_DIR_NAME;

pub mod episode;

pub use episode::{extract_episode_number, season_number};

static BRACKET_TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[.*?\]").expect("bracket tag regex should compile"));

/// Strip bracketed tags and trailing language/forced tags from a name
pub fn normalize_name(name: &str) -> String {
    let without_brackets = BRACKET_TAG_PATTERN.replace_all(name, "");
    FilenameTags::parse(without_brackets.trim()).base.trim().to_string()
}

/// Match name of a file: its stem, normalized
pub fn match_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| normalize_name(&stem.to_string_lossy()))
        .unwrap_or_default()
}

/// How strongly a candidate is tied to a primary; lower wins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchStrength {
    SameName,
    SameNamedDirectory,
    SameEpisode,
}

/// Groups the files of one directory into match sets
#[derive(Debug, Clone)]
pub struct FileMatcher {
    root: PathBuf,
}

impl FileMatcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_top_level(&self, path: &Path) -> bool {
        path.parent() == Some(self.root.as_path())
    }

    fn is_in_output_directory(&self, path: &Path) -> bool {
        path.starts_with(self.root.join(REMUX_DIR_NAME))
    }

    /// Top-level containers, sorted
    pub fn primaries(&self, files: &[PathBuf]) -> Vec<PathBuf> {
        let mut primaries: Vec<PathBuf> = files
            .iter()
            .filter(|path| self.is_top_level(path))
            .filter(|path| FileKind::from_path(path) == Some(FileKind::Container))
            .cloned()
            .collect();
        primaries.sort();
        primaries
    }

    /// Top-level font files attached to every output, sorted
    pub fn attachments(&self, files: &[PathBuf]) -> Vec<PathBuf> {
        let mut fonts: Vec<PathBuf> = files
            .iter()
            .filter(|path| self.is_top_level(path))
            .filter(|path| FileKind::from_path(path) == Some(FileKind::Font))
            .cloned()
            .collect();
        fonts.sort();
        fonts
    }

    /// Decide whether `candidate` belongs with `primary`
    pub fn strength(&self, primary: &Path, candidate: &Path) -> Option<MatchStrength> {
        let primary_name = match_name(primary);
        let candidate_name = match_name(candidate);

        if !primary_name.is_empty() && primary_name == candidate_name {
            return Some(MatchStrength::SameName);
        }

        if let Some(directory) = candidate.parent().filter(|dir| *dir != self.root.as_path()) {
            let directory_name = directory
                .file_name()
                .map(|name| normalize_name(&name.to_string_lossy()))
                .unwrap_or_default();
            if !directory_name.is_empty() && directory_name == primary_name {
                return Some(MatchStrength::SameNamedDirectory);
            }
        }

        let primary_episode = extract_episode_number(&primary_name)?;
        let candidate_episode = extract_episode_number(&candidate_name)?;
        let seasons_conflict = match (season_number(&primary_name), season_number(&candidate_name)) {
            (Some(a), Some(b)) => a != b,
            _ => false,
        };
        (primary_episode == candidate_episode && !seasons_conflict).then_some(MatchStrength::SameEpisode)
    }

    /// Build one match set per primary.
    ///
    /// `candidates` is the raw listing of the directory and its immediate
    /// subdirectories. Each sidecar joins the primary it matches most strongly,
    /// the earlier primary winning ties; top-level containers and previous
    /// outputs never join a set.
    pub fn group(&self, primaries: &[PathBuf], candidates: &[PathBuf]) -> Vec<MatchSet> {
        let mut members: Vec<Vec<PathBuf>> = vec![Vec::new(); primaries.len()];

        for candidate in candidates {
            let Some(kind) = FileKind::from_path(candidate) else { continue };
            if !kind.is_muxable()
                || (kind == FileKind::Container && self.is_top_level(candidate))
                || self.is_in_output_directory(candidate)
            {
                continue;
            }

            let best = primaries
                .iter()
                .enumerate()
                .filter_map(|(index, primary)| self.strength(primary, candidate).map(|s| (s, index)))
                .min();

            if let Some((strength, index)) = best {
                debug!(
                    "Matched {} to {} ({:?})",
                    candidate.display(),
                    primaries[index].display(),
                    strength
                );
                members[index].push(candidate.clone());
            }
        }

        primaries
            .iter()
            .zip(members)
            .map(|(primary, mut sidecars)| {
                sidecars.sort();
                let mut files = Vec::with_capacity(sidecars.len() + 1);
                files.push(primary.clone());
                files.extend(sidecars);
                MatchSet::new(files)
            })
            .collect()
    }

    /// Append the second-directory file with the same episode number to each set.
    ///
    /// Sets without a counterpart are left short so the length check rejects the batch.
    pub fn append_counterparts(
        &self,
        sets: &mut [MatchSet],
        set_episodes: &[Option<u32>],
        counterparts: &BTreeMap<u32, PathBuf>,
    ) {
        for (set, episode) in sets.iter_mut().zip(set_episodes) {
            match episode.and_then(|number| counterparts.get(&number)) {
                Some(counterpart) => set.files.push(counterpart.clone()),
                None => warn!(
                    "No counterpart in the second directory for {}",
                    set.files.first().map(|p| p.display().to_string()).unwrap_or_default()
                ),
            }
        }
    }
}

/// Every match set in a batch must have as many members as the first
pub fn ensure_uniform_length(sets: &[MatchSet]) -> Result<(), DomainError> {
    let Some(first) = sets.first() else {
        return Ok(());
    };
    let expected = first.len();
    match sets.iter().find(|set| set.len() != expected) {
        Some(set) => Err(DomainError::MismatchedBatchLength {
            primary: set.files.first().cloned().unwrap_or_default(),
            expected,
            found: set.len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(root: &str, names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|name| Path::new(root).join(name)).collect()
    }

    #[test]
    fn test_match_name_strips_tags_and_brackets() {
        assert_eq!(match_name(Path::new("/d/Show.S01E05.mkv")), "Show.S01E05");
        assert_eq!(match_name(Path::new("/d/Show.S01E05.eng.srt")), "Show.S01E05");
        assert_eq!(match_name(Path::new("/d/Show.S01E05.forced.eng.ass")), "Show.S01E05");
        assert_eq!(match_name(Path::new("/d/[Group] Show - 05 [1080p].en.srt")), "Show - 05");
    }

    #[test]
    fn test_tagged_sidecars_form_one_set() {
        let matcher = FileMatcher::new("/d");
        let files = paths(
            "/d",
            &["Show.S01E05.mkv", "Show.S01E05.eng.srt", "Show.S01E05.forced.eng.ass", "notes.txt"],
        );
        let primaries = matcher.primaries(&files);
        let sets = matcher.group(&primaries, &files);
        assert_eq!(sets.len(), 1);
        assert_eq!(
            sets[0].files,
            paths("/d", &["Show.S01E05.mkv", "Show.S01E05.eng.srt", "Show.S01E05.forced.eng.ass"])
        );
    }

    #[test]
    fn test_primaries_never_join_other_sets() {
        let matcher = FileMatcher::new("/d");
        let files = paths("/d", &["A.mkv", "A.eng.srt", "B.mkv", "B.eng.srt"]);
        let primaries = matcher.primaries(&files);
        let sets = matcher.group(&primaries, &files);
        assert_eq!(sets[0].files, paths("/d", &["A.mkv", "A.eng.srt"]));
        assert_eq!(sets[1].files, paths("/d", &["B.mkv", "B.eng.srt"]));
    }

    #[test]
    fn test_episode_number_and_subdirectory_rules() {
        let matcher = FileMatcher::new("/d");
        let files = vec![
            PathBuf::from("/d/Show - S01E02 - Pilot.mkv"),
            PathBuf::from("/d/Show.S01E02.en.srt"),
            PathBuf::from("/d/Show.S02E02.en.srt"),
            PathBuf::from("/d/Show - S01E02 - Pilot/commentary.ac3"),
            PathBuf::from("/d/remux/Show - S01E02 - Pilot.mkv"),
        ];
        let primaries = matcher.primaries(&files);
        let sets = matcher.group(&primaries, &files);
        assert_eq!(
            sets[0].files,
            vec![
                PathBuf::from("/d/Show - S01E02 - Pilot.mkv"),
                PathBuf::from("/d/Show - S01E02 - Pilot/commentary.ac3"),
                PathBuf::from("/d/Show.S01E02.en.srt"),
            ]
        );
    }

    #[test]
    fn test_fonts_are_attachments_not_members() {
        let matcher = FileMatcher::new("/d");
        let files = paths("/d", &["A.mkv", "A.ttf", "Font.otf"]);
        let primaries = matcher.primaries(&files);
        assert_eq!(matcher.group(&primaries, &files)[0].files, paths("/d", &["A.mkv"]));
        assert_eq!(matcher.attachments(&files), paths("/d", &["A.ttf", "Font.otf"]));
    }

    #[test]
    fn test_counterparts_are_appended_by_episode() {
        let matcher = FileMatcher::new("/d");
        let mut sets = vec![
            MatchSet::new(paths("/d", &["S01E01.mkv"])),
            MatchSet::new(paths("/d", &["S01E02.mkv"])),
        ];
        let counterparts: BTreeMap<u32, PathBuf> =
            [(1, PathBuf::from("/e/one.mkv"))].into_iter().collect();
        matcher.append_counterparts(&mut sets, &[Some(1), Some(2)], &counterparts);
        assert_eq!(sets[0].len(), 2);
        assert_eq!(sets[1].len(), 1);
        assert!(matches!(
            ensure_uniform_length(&sets),
            Err(DomainError::MismatchedBatchLength { expected: 2, found: 1, .. })
        ));
    }

    #[test]
    fn test_uniform_length_accepts_equal_sets() {
        let sets = vec![
            MatchSet::new(paths("/d", &["A.mkv", "A.srt"])),
            MatchSet::new(paths("/d", &["B.mkv", "B.srt"])),
        ];
        assert!(ensure_uniform_length(&sets).is_ok());
        assert!(ensure_uniform_length(&[]).is_ok());
    }
}
