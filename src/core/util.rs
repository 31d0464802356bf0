//! Common utilities

use sha1::{Digest, Sha1};

/// Characters stripped from the end of a clipped bullet or fragment
pub const TRAILING_ARTIFACTS: &[char] = &[',', '.', ';', ':'];

/// SHA-1 hex digest of a string (article ids are the digest of their link)
pub fn sha1_hex(data: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Keep the first `max_words` whitespace-separated words, joined by single
/// spaces, with trailing `,.;:` removed.
pub fn clip_words(s: &str, max_words: usize) -> String {
    let clipped = s
        .split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ");
    clipped.trim_end_matches(TRAILING_ARTIFACTS).to_string()
}

/// Collapse every whitespace run to a single space and trim
pub fn clean_text(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Trim and cap at `max_chars` characters, ending in an ellipsis when cut
pub fn token_trim(s: &str, max_chars: usize) -> String {
    let s = s.trim();
    if s.chars().count() <= max_chars {
        return s.to_string();
    }

    let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Truncate string to max bytes, returning (truncated_string, was_truncated)
pub fn truncate_string(s: &str, max_bytes: usize) -> (String, bool) {
    if s.len() <= max_bytes {
        return (s.to_string(), false);
    }

    // Find a valid UTF-8 boundary
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }

    (s[..end].to_string(), true)
}
