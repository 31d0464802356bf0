//! Bullet extraction from free-form model output
//!
//! Recognized markers, at the start of a line and followed by whitespace:
//! `-`, `*`, `•`, or a one or two digit ordinal with a period (`1.`, `12.`).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::bullets::MAX_BULLET_WORDS;
use crate::core::util::clip_words;

/// List marker followed by the bullet content.
///
/// The whitespace after the marker may cross a line break, so a bare marker
/// line captures the line below it.
pub static BULLET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?:-\s+|\*\s+|\x{2022}\s+|\d{1,2}\.\s+)(.+)$")
        .expect("Invalid BULLET_RE regex")
});

/// Extract bullet candidates in input order. Candidates longer than
/// [`MAX_BULLET_WORDS`] words are clipped; shorter ones are only trimmed.
pub fn extract_bullets(text: &str) -> Vec<String> {
    BULLET_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            let candidate = m.as_str().trim();
            if candidate.split_whitespace().count() > MAX_BULLET_WORDS {
                clip_words(candidate, MAX_BULLET_WORDS)
            } else {
                candidate.to_string()
            }
        })
        .collect()
}
