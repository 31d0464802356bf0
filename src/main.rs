//! takeaways - summaries and key-takeaway bullets from LLM rewrite output
//!
//! takeaways provides:
//! - Bullet extraction, normalization, dedupe and fallback synthesis
//! - Jekyll post rendering and social drafts
//! - Keyword auto-tagging and relevance scoring
//! - Unified output format (jsonl/json/md/raw)

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use takeaways::cli;

/// Diagnostics go to stderr so stdout stays machine-readable
fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    cli::run(cli)
}
