//! Comparison form of bullets and summary sentences

use crate::core::util::clean_text;

/// Lower-case, drop ASCII punctuation, collapse whitespace runs, trim.
///
/// Dedupe compares only normalized strings, and both sides must go through
/// this one function.
pub fn normalize(s: &str) -> String {
    let stripped: String = s
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();

    clean_text(&stripped)
}
