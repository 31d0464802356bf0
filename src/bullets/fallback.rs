//! Fallback bullets synthesized from summary sentences

use once_cell::sync::Lazy;
use regex::Regex;

use crate::bullets::sentences::split_sentences;
use crate::bullets::MAX_BULLET_WORDS;
use crate::core::util::clip_words;

/// Leading attribution such as "Acme Corp said that " or "Reuters reports that ".
/// Case-sensitive and anchored, so mid-sentence attributions survive.
pub static ATTRIBUTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Z][a-z]+ )+(?:said|reports?|announced) that\s+")
        .expect("Invalid ATTRIBUTION_RE regex")
});

/// Derive up to `want` short fragments from the summary's sentences, in order.
///
/// Each fragment loses a leading attribution clause, is clipped to
/// [`MAX_BULLET_WORDS`] words and has trailing `,.;:` removed. Sentences that
/// clip down to nothing (e.g. "...") are skipped.
pub fn fallback_bullets_from_summary(summary: &str, want: usize) -> Vec<String> {
    split_sentences(summary)
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|sentence| {
            let sentence = ATTRIBUTION_RE.replace(sentence, "");
            clip_words(&sentence, MAX_BULLET_WORDS)
        })
        .filter(|fragment| !fragment.is_empty())
        .take(want)
        .collect()
}
