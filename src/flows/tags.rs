//! Tagging and relevance flows
//!
//! - auto-tags: bucket names whose keywords occur in the text
//! - relevance: keyword score deciding whether an article is worth a rewrite

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::{Config, RevenueFilterConfig, TagBucket};
use crate::core::error::FailOpen;
use crate::core::input::{read_input, InputSource};
use crate::core::model::{Kind, ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};

/// Default cap on auto-tags
pub const DEFAULT_MAX_TAGS: usize = 3;

/// Default snippet length in characters for relevance scoring
pub const DEFAULT_SNIPPET_CHARS: usize = 320;

/// Names of buckets with at least one keyword in `text` (case-insensitive),
/// in bucket order, at most `max_tags`.
pub fn auto_tags(text: &str, buckets: &[TagBucket], max_tags: usize) -> Vec<String> {
    let haystack = text.to_lowercase();
    buckets
        .iter()
        .filter(|bucket| {
            bucket
                .keywords
                .iter()
                .any(|kw| haystack.contains(&kw.to_lowercase()))
        })
        .map(|bucket| bucket.name.clone())
        .take(max_tags)
        .collect()
}

/// +1 for every include keyword present, -2 for every exclude keyword present
pub fn score_text(text: &str, include: &[String], exclude: &[String]) -> i64 {
    let haystack = text.to_lowercase();
    let hits = |words: &[String]| {
        words
            .iter()
            .filter(|w| haystack.contains(&w.to_lowercase()))
            .count() as i64
    };

    hits(include) - 2 * hits(exclude)
}

/// Leading sentences of an article that fit in `max_chars`
pub fn create_snippet(article: &str, max_chars: usize) -> String {
    let mut parts = Vec::new();
    let mut total = 0;

    for sentence in article.split(". ").filter(|s| !s.is_empty()) {
        let need = sentence.chars().count() + 1;
        if total + need > max_chars {
            break;
        }
        parts.push(format!("{}.", sentence.trim_end_matches('.')));
        total += need;
    }

    parts.join(" ")
}

/// Outcome of relevance scoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relevance {
    pub score: i64,
    pub min_score: i64,
    pub kept: bool,
}

/// Score a title plus snippet against the configured filter
pub fn assess_relevance(title: &str, snippet: &str, filter: &RevenueFilterConfig) -> Relevance {
    let score = score_text(
        &format!("{} {}", title, snippet),
        &filter.include_keywords,
        &filter.exclude_keywords,
    );
    debug!("relevance score {} for {:?}", score, title);

    Relevance {
        score,
        min_score: filter.min_score,
        kept: score >= filter.min_score,
    }
}

/// Run the tags command
pub fn run_tags(text: &str, config: &Config, render_config: RenderConfig) -> Result<()> {
    let tags = auto_tags(text, &config.tag_buckets(), DEFAULT_MAX_TAGS);

    let mut result_set = ResultSet::new();
    result_set.push(
        ResultItem::derived(Kind::Tags, tags.join(", ")).with_data(json!({ "tags": tags })),
    );

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}

/// Run the score command. An unreadable snippet is not fatal: the title is
/// scored alone and the item carries the read error.
pub fn run_score(
    title: &str,
    snippet: Option<&InputSource>,
    config: &Config,
    render_config: RenderConfig,
) -> Result<()> {
    let mut errors = Vec::new();
    let snippet_text = match snippet {
        Some(source) => {
            let read = read_input(source);
            if let Err(err) = &read {
                errors.push(err.to_item_error());
            }
            read.map(|input| create_snippet(&input.content, DEFAULT_SNIPPET_CHARS))
                .fail_open("reading snippet (scoring title only)", String::new())
        }
        None => String::new(),
    };

    let relevance = assess_relevance(title, &snippet_text, &config.revenue_filter);

    let mut item = ResultItem::derived(Kind::Relevance, title)
        .with_data(serde_json::to_value(&relevance)?);
    item.errors = errors;

    let mut result_set = ResultSet::new();
    result_set.push(item);

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buckets() -> Vec<TagBucket> {
        vec![
            TagBucket {
                name: "Security".into(),
                keywords: vec!["ransomware".into(), "breach".into()],
            },
            TagBucket {
                name: "AI_Automation".into(),
                keywords: vec!["LLM".into(), "agent".into()],
            },
            TagBucket {
                name: "Cloud".into(),
                keywords: vec!["aws".into()],
            },
            TagBucket {
                name: "Chips".into(),
                keywords: vec!["fab".into()],
            },
        ]
    }

    #[test]
    fn test_auto_tags_bucket_order_and_case() {
        let tags = auto_tags("An LLM agent stopped a Ransomware attack", &buckets(), 3);
        assert_eq!(tags, vec!["Security", "AI_Automation"]);
    }

    #[test]
    fn test_auto_tags_cap() {
        let text = "breach llm aws fab";
        assert_eq!(auto_tags(text, &buckets(), 3).len(), 3);
        assert_eq!(auto_tags(text, &buckets(), 1), vec!["Security"]);
        assert!(auto_tags(text, &[], 3).is_empty());
    }

    #[test]
    fn test_score_text() {
        let include = vec!["ai".to_string(), "cloud".to_string()];
        let exclude = vec!["celebrity".to_string()];
        assert_eq!(score_text("AI in the Cloud", &include, &exclude), 2);
        assert_eq!(score_text("Celebrity uses AI", &include, &exclude), -1);
        assert_eq!(score_text("", &include, &exclude), 0);
    }

    #[test]
    fn test_create_snippet() {
        let article = "First sentence here. Second one. Third is much longer than the budget allows";
        assert_eq!(create_snippet(article, 40), "First sentence here. Second one.");
        assert_eq!(create_snippet(article, 5), "");
    }

    #[test]
    fn test_assess_relevance() {
        let filter = RevenueFilterConfig {
            include_keywords: vec!["ai".into(), "pricing".into()],
            exclude_keywords: vec![],
            min_score: 2,
        };
        let kept = assess_relevance("AI pricing shifts", "", &filter);
        assert_eq!(kept.score, 2);
        assert!(kept.kept);

        let dropped = assess_relevance("Pricing shifts", "", &filter);
        assert!(!dropped.kept);
    }
}
