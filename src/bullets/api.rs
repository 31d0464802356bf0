//! Bullets API - extract, normalize, dedupe, fallback, similarity

use anyhow::Result;
use serde_json::json;

use crate::bullets::dedupe::{review_bullets, DedupeOptions, Verdict};
use crate::bullets::extract::extract_bullets;
use crate::bullets::fallback::fallback_bullets_from_summary;
use crate::bullets::normalize::normalize;
use crate::bullets::similarity::ratio;
use crate::core::input::{read_input, InputSource};
use crate::core::model::{Confidence, Kind, ResultItem, ResultSet, SourceMode};
use crate::core::render::{RenderConfig, Renderer};

/// Bullets found behind list markers in `text`
pub fn extract_set(text: &str) -> ResultSet {
    let mut result_set = ResultSet::new();
    result_set.extend(
        extract_bullets(text)
            .into_iter()
            .enumerate()
            .map(|(i, b)| ResultItem::bullet(b, i, SourceMode::Extracted)),
    );
    result_set
}

/// Kept bullets, or every candidate with its verdict when `explain` is set
pub fn dedupe_set(
    summary: &str,
    bullets: &[String],
    opts: DedupeOptions,
    explain: bool,
) -> Result<ResultSet> {
    let verdicts = review_bullets(summary, bullets, opts);
    let mut result_set = ResultSet::new();

    for (bullet, verdict) in bullets.iter().zip(verdicts) {
        let kept = verdict == Verdict::Kept;
        if !kept && !explain {
            continue;
        }

        let mut item = ResultItem::bullet(bullet, result_set.len(), SourceMode::Extracted);
        if explain {
            item = item.with_data(serde_json::to_value(verdict)?);
        }
        if !kept {
            item = item.with_confidence(Confidence::Low);
        }
        result_set.push(item);
    }

    Ok(result_set)
}

/// Up to `want` bullets synthesized from summary sentences
pub fn fallback_set(summary: &str, want: usize) -> ResultSet {
    let mut result_set = ResultSet::new();
    result_set.extend(
        fallback_bullets_from_summary(summary, want)
            .into_iter()
            .enumerate()
            .map(|(i, b)| ResultItem::bullet(b, i, SourceMode::Synthesized)),
    );
    result_set
}

/// Normalized fuzzy ratio of two strings
pub fn similarity_item(a: &str, b: &str, sim: f64) -> ResultItem {
    let (na, nb) = (normalize(a), normalize(b));
    let score = ratio(&na, &nb);

    ResultItem::derived(Kind::Similarity, format!("{:.4}", score)).with_data(json!({
        "ratio": score,
        "a": na,
        "b": nb,
        "near_duplicate": score >= sim,
    }))
}

fn print(result_set: &ResultSet, render_config: RenderConfig) {
    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(result_set));
}

/// Run bullets extract command
pub fn run_extract(source: &InputSource, render_config: RenderConfig) -> Result<()> {
    let input = read_input(source)?;
    let mut result_set = extract_set(&input.content);

    if let InputSource::File(_) = source {
        for item in &mut result_set.items {
            item.path = Some(input.label.clone());
        }
    }
    for warning in &input.warnings {
        result_set.push(ResultItem::error(warning.to_item_error()).with_path(&input.label));
    }

    print(&result_set, render_config);
    Ok(())
}

/// Run bullets normalize command
pub fn run_normalize(text: &str, render_config: RenderConfig) -> Result<()> {
    let mut result_set = ResultSet::new();
    result_set.push(ResultItem::derived(Kind::Normalized, normalize(text)));

    print(&result_set, render_config);
    Ok(())
}

/// Run bullets dedupe command
pub fn run_dedupe(
    summary: &str,
    bullets: &[String],
    opts: DedupeOptions,
    explain: bool,
    render_config: RenderConfig,
) -> Result<()> {
    let result_set = dedupe_set(summary, bullets, opts, explain)?;

    print(&result_set, render_config);
    Ok(())
}

/// Run bullets fallback command
pub fn run_fallback(summary: &str, want: usize, render_config: RenderConfig) -> Result<()> {
    let result_set = fallback_set(summary, want);

    print(&result_set, render_config);
    Ok(())
}

/// Run bullets similarity command
pub fn run_similarity(a: &str, b: &str, sim: f64, render_config: RenderConfig) -> Result<()> {
    let mut result_set = ResultSet::new();
    result_set.push(similarity_item(a, b, sim));

    print(&result_set, render_config);
    Ok(())
}
