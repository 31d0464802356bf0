//! Takeaways flow - summary + bullets from raw model output
//!
//! The chain is:
//! 1. extract list-marker bullets from the model output
//! 2. if there are none, synthesize `seed_want` bullets from the summary
//! 3. dedupe against the summary and each other
//! 4. if dedupe left nothing, synthesize `backstop_want` bullets again
//!
//! Step 4 is not deduplicated, so a summary with at least one sentence
//! always yields at least one bullet.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::bullets::{
    dedupe_bullets, extract_bullets, fallback_bullets_from_summary, DedupeOptions,
};
use crate::core::input::{read_input, InputSource};
use crate::core::model::{ResultItem, ResultSet, SourceMode};
use crate::core::render::{RenderConfig, Renderer};

/// Leading lines of model output that make up the summary
pub const DEFAULT_SUMMARY_LINES: usize = 6;

/// Parameters of the takeaway chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TakeawayPolicy {
    /// Fragments synthesized when extraction finds nothing
    pub seed_want: usize,
    pub dedupe: DedupeOptions,
    /// Fragments synthesized when dedupe empties the list
    pub backstop_want: usize,
}

impl Default for TakeawayPolicy {
    fn default() -> Self {
        Self {
            seed_want: 4,
            dedupe: DedupeOptions::default(),
            backstop_want: 3,
        }
    }
}

/// Which stage produced the final bullets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulletOrigin {
    Extracted,
    Synthesized,
    Backstop,
}

impl BulletOrigin {
    pub fn source_mode(self) -> SourceMode {
        match self {
            BulletOrigin::Extracted => SourceMode::Extracted,
            BulletOrigin::Synthesized => SourceMode::Synthesized,
            BulletOrigin::Backstop => SourceMode::Backstop,
        }
    }
}

/// Result of the takeaway chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Takeaways {
    pub summary: String,
    pub bullets: Vec<String>,
    pub origin: BulletOrigin,
}

impl Takeaways {
    /// Summary item followed by one item per bullet
    pub fn to_result_items(&self, path: Option<&str>) -> Vec<ResultItem> {
        let source_mode = self.origin.source_mode();
        let mut items = Vec::with_capacity(self.bullets.len() + 1);
        items.push(ResultItem::summary(&self.summary));
        items.extend(
            self.bullets
                .iter()
                .enumerate()
                .map(|(i, b)| ResultItem::bullet(b, i, source_mode)),
        );

        match path {
            Some(path) => items.into_iter().map(|i| i.with_path(path)).collect(),
            None => items,
        }
    }
}

/// The summary is the first `max_lines` lines of the model output, trimmed,
/// blank ones dropped, joined with spaces. Blank lines still use up the window.
pub fn derive_summary(rewritten: &str, max_lines: usize) -> String {
    rewritten
        .split('\n')
        .take(max_lines)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the takeaway chain on model output and its summary
pub fn compose_takeaways(rewritten: &str, summary: &str, policy: &TakeawayPolicy) -> Takeaways {
    let mut origin = BulletOrigin::Extracted;
    let mut bullets = extract_bullets(rewritten);
    debug!("extracted {} bullet candidate(s)", bullets.len());

    if bullets.is_empty() {
        origin = BulletOrigin::Synthesized;
        bullets = fallback_bullets_from_summary(summary, policy.seed_want);
        debug!("no list in model output, synthesized {}", bullets.len());
    }

    bullets = dedupe_bullets(summary, &bullets, policy.dedupe);

    if bullets.is_empty() {
        origin = BulletOrigin::Backstop;
        bullets = fallback_bullets_from_summary(summary, policy.backstop_want);
        info!("dedupe removed every bullet, using {} backstop bullet(s)", bullets.len());
    }

    Takeaways {
        summary: summary.to_string(),
        bullets,
        origin,
    }
}

/// Derive the summary and run the chain
pub fn takeaways_for(rewritten: &str, summary_lines: usize, policy: &TakeawayPolicy) -> Takeaways {
    let summary = derive_summary(rewritten, summary_lines);
    compose_takeaways(rewritten, &summary, policy)
}

/// Run the takeaways command
pub fn run_takeaways(
    source: &InputSource,
    summary_lines: usize,
    policy: &TakeawayPolicy,
    render_config: RenderConfig,
) -> Result<()> {
    let input = read_input(source)?;
    let takeaways = takeaways_for(&input.content, summary_lines, policy);

    let mut result_set = ResultSet::new();
    let path = match source {
        InputSource::File(_) => Some(input.label.as_str()),
        InputSource::Stdin => None,
    };
    let mut items = takeaways.to_result_items(path);
    if let Some(summary) = items.first_mut() {
        summary.meta.truncated = input.truncated;
        summary
            .errors
            .extend(input.warnings.iter().map(|w| w.to_item_error()));
    }
    result_set.extend(items);

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}
