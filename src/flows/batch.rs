//! Batch flow - takeaways for many model outputs at once
//!
//! Files are processed independently (in parallel with the `parallel`
//! feature); output keeps the order of the arguments. A file that cannot be
//! read becomes an error item and does not stop the batch.

use std::path::{Path, PathBuf};

use anyhow::Result;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{info, warn};

use crate::core::input::{read_input, InputSource};
use crate::core::model::{ResultItem, ResultSet};
use crate::core::render::{RenderConfig, Renderer};
use crate::flows::takeaways::{takeaways_for, TakeawayPolicy};

/// Result items for one file: summary and bullets, or a single error
pub fn takeaways_for_file(
    path: &Path,
    summary_lines: usize,
    policy: &TakeawayPolicy,
) -> Vec<ResultItem> {
    let source = InputSource::File(path.to_path_buf());
    let label = source.label();

    match read_input(&source) {
        Ok(input) => {
            let takeaways = takeaways_for(&input.content, summary_lines, policy);
            let mut items = takeaways.to_result_items(Some(label.as_str()));
            if let Some(summary) = items.first_mut() {
                summary.meta.truncated = input.truncated;
                summary
                    .errors
                    .extend(input.warnings.iter().map(|w| w.to_item_error()));
            }
            items
        }
        Err(err) => {
            warn!("{}", err);
            vec![ResultItem::error(err.to_item_error()).with_path(&label)]
        }
    }
}

/// Takeaways for every file, in argument order
pub fn batch_takeaways(
    paths: &[PathBuf],
    summary_lines: usize,
    policy: &TakeawayPolicy,
) -> ResultSet {
    #[cfg(feature = "parallel")]
    let per_file: Vec<Vec<ResultItem>> = paths
        .par_iter()
        .map(|path| takeaways_for_file(path, summary_lines, policy))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let per_file: Vec<Vec<ResultItem>> = paths
        .iter()
        .map(|path| takeaways_for_file(path, summary_lines, policy))
        .collect();

    let mut result_set = ResultSet::new();
    for items in per_file {
        result_set.extend(items);
    }
    result_set
}

/// Run the batch command
pub fn run_batch(
    paths: &[PathBuf],
    summary_lines: usize,
    policy: &TakeawayPolicy,
    render_config: RenderConfig,
) -> Result<()> {
    info!("Processing {} file(s)", paths.len());
    let result_set = batch_takeaways(paths, summary_lines, policy);

    let renderer = Renderer::with_config(render_config);
    println!("{}", renderer.render(&result_set));

    Ok(())
}
