// Language codes and filename tags

use isolang::Language;

use crate::domain::errors::DomainError;
use crate::domain::model::UNDETERMINED_LANGUAGE;

/// Filename tag that marks a forced subtitle sidecar
pub const FORCED_TAG: &str = "forced";

/// Validate a language given as ISO 639 alpha-3, alpha-2 or English name.
///
/// Returns the alpha-3 code the multiplexer expects.
pub fn normalize_language(input: &str) -> Result<String, DomainError> {
    let trimmed = input.trim();
    lookup(trimmed)
        .map(|language| language.to_639_3().to_string())
        .ok_or_else(|| DomainError::InvalidLanguageCode(trimmed.to_string()))
}

pub fn is_valid_language(input: &str) -> bool {
    lookup(input.trim()).is_some()
}

fn lookup(value: &str) -> Option<Language> {
    if value.is_empty() {
        return None;
    }
    let lower = value.to_lowercase();
    let by_code = match lower.len() {
        3 => Language::from_639_3(&lower),
        2 => Language::from_639_1(&lower),
        _ => None,
    };
    by_code
        .or_else(|| Language::from_name(value))
        .or_else(|| Language::from_name(&capitalize(&lower)))
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Language and forced markers encoded as dot-separated filename tags
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilenameTags {
    pub language: Option<String>,
    pub forced: bool,
    /// File stem with the trailing tags removed
    pub base: String,
}

impl FilenameTags {
    /// Split the trailing language/`forced` tags off a file stem.
    ///
    /// `Show.S01E05.forced.eng` yields base `Show.S01E05`, language `eng`,
    /// forced. Scanning stops at the first segment that is neither.
    pub fn parse(stem: &str) -> Self {
        let mut segments: Vec<&str> = stem.split('.').collect();
        let mut tags = FilenameTags::default();

        while segments.len() > 1 {
            let Some(last) = segments.last() else { break };
            let tag = last.trim().to_lowercase();
            if tag == FORCED_TAG {
                tags.forced = true;
            } else if let Ok(code) = normalize_language(&tag) {
                // Innermost language tag wins, matching left-to-right reading
                tags.language = Some(code);
            } else {
                break;
            }
            segments.pop();
        }

        tags.base = segments.join(".");
        tags
    }

    /// Language to fall back on when the container reports none
    pub fn language_or_undetermined(&self) -> String {
        self.language
            .clone()
            .unwrap_or_else(|| UNDETERMINED_LANGUAGE.to_string())
    }
}
