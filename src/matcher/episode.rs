//! Episode number heuristics
//!
//! Each strategy is an independent pure function over a name; the first one
//! that yields a number wins.

use once_cell::sync::Lazy;
use regex::Regex;

static SEASON_EPISODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bs\d{1,2}e(\d{1,3})").expect("season/episode regex should compile")
});

static EPISODE_KEYWORD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:episode|ep|\be)[ _.-]?(\d{1,3})").expect("episode keyword regex should compile")
});

static FREE_NUMBER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(\d{1,3})\b").expect("free number regex should compile")
});

static SEASON_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bs(\d{1,2})e\d{1,3}").expect("season regex should compile"));

/// Signature shared by every episode strategy
pub type EpisodeStrategy = fn(&str) -> Option<u32>;

/// Strategies in the order they are tried
pub const STRATEGIES: &[EpisodeStrategy] = &[season_episode, episode_keyword, sole_number];

/// `S01E05` style markers
pub fn season_episode(name: &str) -> Option<u32> {
    capture_number(&SEASON_EPISODE_PATTERN, name)
}

/// `Episode 12`, `ep.3`, `E07` style markers
pub fn episode_keyword(name: &str) -> Option<u32> {
    capture_number(&EPISODE_KEYWORD_PATTERN, name)
}

/// The only free-standing 1-3 digit number in the name, if there is exactly one
pub fn sole_number(name: &str) -> Option<u32> {
    let mut numbers = FREE_NUMBER_PATTERN.captures_iter(name);
    let first = numbers.next()?;
    if numbers.next().is_some() {
        return None;
    }
    first.get(1)?.as_str().parse().ok()
}

/// Season of an `S01E05` style marker
pub fn season_number(name: &str) -> Option<u32> {
    capture_number(&SEASON_PATTERN, name)
}

/// Run the strategies in order and return the first hit
pub fn extract_episode_number(name: &str) -> Option<u32> {
    STRATEGIES.iter().find_map(|strategy| strategy(name))
}

fn capture_number(pattern: &Regex, name: &str) -> Option<u32> {
    pattern
        .captures(name)
        .and_then(|captures| captures.get(1))
        .and_then(|number| number.as_str().parse().ok())
}
