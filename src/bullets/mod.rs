//! Bullets module - Key-takeaway extraction and cleanup
//!
//! Provides:
//! - extract: list-marker bullets from model output
//! - normalize: comparison form shared by all similarity checks
//! - sentences: the sentence boundary heuristic
//! - similarity: fuzzy ratio between two strings
//! - dedupe: drop bullets that echo the summary or each other
//! - fallback: synthesize bullets from summary sentences
//! - api: command handlers

pub mod api;
pub mod dedupe;
pub mod extract;
pub mod fallback;
pub mod normalize;
pub mod sentences;
pub mod similarity;

pub use dedupe::{dedupe_bullets, review_bullets, DedupeOptions, Verdict};
pub use extract::extract_bullets;
pub use fallback::fallback_bullets_from_summary;
pub use normalize::normalize;
pub use sentences::split_sentences;
pub use similarity::ratio;

/// Longest bullet, in words, that extraction and synthesis produce
pub const MAX_BULLET_WORDS: usize = 14;
