//! Sentence splitting heuristic shared by dedupe and fallback synthesis
//!
//! A sentence ends after `.`, `!` or `?` when whitespace follows, so
//! "Dr. Smith" splits and "3.5%" does not.

use once_cell::sync::Lazy;
use regex::Regex;

/// Terminal punctuation followed by a whitespace run
static BOUNDARY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("Invalid BOUNDARY_RE regex"));

/// Split text into sentences. The punctuation stays with its sentence, the
/// whitespace run after it is dropped. Pieces are not otherwise trimmed and
/// may be empty.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in BOUNDARY_RE.find_iter(text) {
        // terminal punctuation is always a single byte
        let end = m.start() + 1;
        sentences.push(&text[start..end]);
        start = m.end();
    }
    sentences.push(&text[start..]);

    sentences
}
