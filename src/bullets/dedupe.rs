//! Similarity-based bullet deduplication
//!
//! A bullet is dropped when, after normalization, it
//! 1. is contained in a summary sentence, contains one, or scores at least
//!    `sim` against one, or
//! 2. scores at least `sim` against a bullet kept earlier in the same call.
//!
//! Kept bullets are returned in their original form and input order. The scan
//! stops as soon as `max_count` bullets are kept.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bullets::normalize::normalize;
use crate::bullets::sentences::split_sentences;
use crate::bullets::similarity::ratio;

/// Default cap on kept bullets
pub const DEFAULT_MAX_COUNT: usize = 5;

/// Default near-duplicate threshold
pub const DEFAULT_SIMILARITY: f64 = 0.82;

/// Knobs for [`dedupe_bullets`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DedupeOptions {
    pub max_count: usize,
    pub sim: f64,
}

impl Default for DedupeOptions {
    fn default() -> Self {
        Self {
            max_count: DEFAULT_MAX_COUNT,
            sim: DEFAULT_SIMILARITY,
        }
    }
}

/// Accept a similarity threshold only inside [0, 1]; NaN is rejected
pub fn check_similarity(value: f64) -> Result<f64, String> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("similarity must be between 0 and 1, got {}", value))
    }
}

/// What happened to one candidate bullet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Kept,
    /// Restates summary sentence `sentence` (0-based, blank sentences skipped)
    EchoesSummary { sentence: usize },
    /// Near-duplicate of the kept bullet at input position `bullet`
    DuplicatesBullet { bullet: usize },
    /// Not evaluated because the cap was already reached
    OverCap,
}

/// Decide the fate of every candidate. The result has one verdict per input
/// bullet; candidates after the cap is reached are `OverCap`.
pub fn review_bullets<S: AsRef<str>>(
    summary: &str,
    bullets: &[S],
    opts: DedupeOptions,
) -> Vec<Verdict> {
    let sentences: Vec<String> = split_sentences(summary)
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .map(normalize)
        .collect();

    let mut verdicts = Vec::with_capacity(bullets.len());
    // (input position, normalized text) of kept bullets
    let mut seen: Vec<(usize, String)> = Vec::new();

    for (position, bullet) in bullets.iter().enumerate() {
        if seen.len() >= opts.max_count {
            verdicts.push(Verdict::OverCap);
            continue;
        }

        let nb = normalize(bullet.as_ref());

        let echoes = |s: &String| {
            s.contains(nb.as_str()) || nb.contains(s.as_str()) || ratio(&nb, s) >= opts.sim
        };

        let verdict = if let Some(sentence) = sentences.iter().position(echoes) {
            Verdict::EchoesSummary { sentence }
        } else if let Some(&(kept_at, _)) = seen.iter().find(|(_, x)| ratio(&nb, x) >= opts.sim) {
            Verdict::DuplicatesBullet { bullet: kept_at }
        } else {
            seen.push((position, nb));
            Verdict::Kept
        };

        if verdict != Verdict::Kept {
            debug!("dropping bullet {:?}: {:?}", bullet.as_ref(), verdict);
        }
        verdicts.push(verdict);
    }

    verdicts
}

/// Drop bullets that restate the summary or each other, keeping at most
/// `opts.max_count`.
pub fn dedupe_bullets<S: AsRef<str>>(
    summary: &str,
    bullets: &[S],
    opts: DedupeOptions,
) -> Vec<String> {
    review_bullets(summary, bullets, opts)
        .into_iter()
        .zip(bullets)
        .filter(|(verdict, _)| *verdict == Verdict::Kept)
        .map(|(_, bullet)| bullet.as_ref().to_string())
        .collect()
}
