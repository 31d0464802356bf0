//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::bullets::dedupe::check_similarity;
use crate::config::Config;
use crate::core::input::InputSource;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::flows::post::{post_timestamp, PostRequest};
use crate::flows::takeaways::TakeawayPolicy;

/// takeaways - summaries and key-takeaway bullets from LLM rewrite output.
#[derive(Parser, Debug)]
#[command(name = "takeaways")]
#[command(
    author,
    version,
    about,
    long_about = r#"takeaways turns raw LLM rewrite output into a summary plus a short,
deduplicated list of key-takeaway bullets, and renders posts and social drafts
from them.

Each command prints a ResultSet in the selected format (default: jsonl).

Output formats:
- jsonl: one JSON object per line (best for piping into tools/LLMs)
- json: a single JSON array
- md: human-friendly Markdown
- raw: text payloads only

Examples:
    takeaways run rewrite.txt
    takeaways bullets extract rewrite.txt
    takeaways bullets dedupe --summary "Costs rose." "Costs rose" "Margins shrink"
    takeaways post rewrite.txt --title "Chip prices" --link https://example.com/a --out site
    takeaways batch out/*.txt
"#
)]
pub struct Cli {
    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw\n\n\
Tip: Prefer jsonl when you want stable, line-oriented output for piping and prompts."
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(
        long,
        global = true,
        long_help = "Pretty-print JSON and JSONL output with indentation for human readability.\n\n\
Has no effect on md/raw formats."
    )]
    pub pretty: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Only log errors to stderr. Results are still printed to stdout.\n\n\
RUST_LOG, when set, takes precedence."
    )]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Log debug diagnostics to stderr, including every bullet dropped by dedupe\n\
and why.\n\nRUST_LOG, when set, takes precedence."
    )]
    pub verbose: bool,

    /// Configuration file (YAML).
    #[arg(
        long,
        global = true,
        env = "TAKEAWAYS_CONFIG",
        value_name = "PATH",
        long_help = "YAML configuration file: tag buckets, hashtags, platforms, site settings\n\
and takeaway knobs.\n\n\
If omitted, takeaways.yaml in the working directory is used when present. A named\n\
file that does not exist falls back to defaults with a warning; a file that does not\n\
parse is an error."
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the configured takeaway knobs
#[derive(Args, Debug, Clone, Default)]
pub struct PolicyArgs {
    /// Maximum bullets kept after dedupe.
    #[arg(long, value_name = "N")]
    pub max_count: Option<usize>,

    /// Near-duplicate threshold in [0, 1].
    #[arg(long, value_name = "F", value_parser = parse_similarity)]
    pub sim: Option<f64>,

    /// Leading lines of model output used as the summary.
    #[arg(long, value_name = "N")]
    pub summary_lines: Option<usize>,
}

impl PolicyArgs {
    /// Config values with command-line overrides applied
    pub fn resolve(&self, config: &Config) -> (TakeawayPolicy, usize) {
        let mut policy = config.takeaways.policy();
        if let Some(max_count) = self.max_count {
            policy.dedupe.max_count = max_count;
        }
        if let Some(sim) = self.sim {
            policy.dedupe.sim = sim;
        }
        let summary_lines = self
            .summary_lines
            .unwrap_or(config.takeaways.summary_lines);
        (policy, summary_lines)
    }
}

/// Parse a similarity threshold, rejecting values outside [0, 1]
pub fn parse_similarity(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    check_similarity(value)
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Bullet primitives: extract, normalize, dedupe, fallback, similarity.
    #[command(
        long_about = "Run one step of the takeaway chain on its own.\n\n\
Examples:\n\
  takeaways bullets extract rewrite.txt\n\
  takeaways bullets normalize \"Costs, rose!\"\n\
  takeaways bullets similarity \"Costs rise\" \"cost rises\"\n"
    )]
    Bullets {
        #[command(subcommand)]
        action: BulletCommands,
    },

    /// Full chain: summary plus deduplicated bullets.
    #[command(
        long_about = "Derive the summary from the leading lines of the model output, extract\n\
list-marker bullets (or synthesize them from the summary), dedupe them, and fall back\n\
to summary fragments when nothing survives.\n\n\
Emits one summary item followed by one item per bullet. source_mode tells which stage\n\
produced the bullets (extracted, synthesized, backstop).\n\n\
Examples:\n\
  takeaways run rewrite.txt\n\
  cat rewrite.txt | takeaways run --summary-lines 3\n"
    )]
    Run {
        /// Model output file ("-" or omitted for stdin).
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Render a Jekyll post from model output.
    #[command(
        long_about = "Render front matter and a Markdown body (summary, Key takeaways, source\n\
link). Prints the post, or with --out writes it to DIR/_posts/<date>-<slug>.md.\n\n\
Examples:\n\
  takeaways post rewrite.txt --title \"Chip prices\" --link https://example.com/a\n\
  takeaways post rewrite.txt --title \"Chip prices\" --link https://example.com/a --date 2025-09-18 --out site\n"
    )]
    Post {
        /// Model output file ("-" or omitted for stdin).
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Post title.
        #[arg(long)]
        title: String,

        /// Source article link.
        #[arg(long, value_name = "URL")]
        link: String,

        /// Post date (YYYY-MM-DD); defaults to now.
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,

        /// Site directory to write the post into.
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Social drafts for the enabled platforms.
    #[command(
        long_about = "Format twitter, facebook, instagram, tiktok and plain-document drafts from\n\
the summary and bullets. Platforms and hashtags come from the config file.\n"
    )]
    Drafts {
        /// Model output file ("-" or omitted for stdin).
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Article title.
        #[arg(long)]
        title: String,

        /// Source article link.
        #[arg(long, value_name = "URL")]
        link: String,

        #[command(flatten)]
        policy: PolicyArgs,
    },

    /// Auto-tags for a text from the configured buckets.
    Tags {
        /// Text to tag.
        text: String,
    },

    /// Relevance score of an article against the configured keywords.
    #[command(
        long_about = "Score the title plus a snippet of the article body: +1 per include keyword,\n\
-2 per exclude keyword. kept is true when the score reaches min_score.\n\n\
An unreadable snippet file is not fatal; the title is scored alone and the item\n\
carries the read error.\n"
    )]
    Score {
        /// Article title.
        #[arg(long)]
        title: String,

        /// Article body file; its leading sentences are scored.
        #[arg(long, value_name = "FILE")]
        snippet: Option<PathBuf>,
    },

    /// Run the full chain on many files.
    #[command(
        long_about = "Run the full chain on every FILE. Output keeps argument order; a file that\n\
cannot be read becomes an error item and the batch continues.\n\n\
Built with the `parallel` feature, files are processed concurrently.\n"
    )]
    Batch {
        /// Model output files.
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        policy: PolicyArgs,
    },
}

#[derive(Subcommand, Debug)]
pub enum BulletCommands {
    /// Bullets behind list markers (-, *, •, 1.).
    Extract {
        /// Model output file ("-" or omitted for stdin).
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Comparison form of a text.
    Normalize {
        /// Text to normalize.
        text: String,
    },

    /// Drop bullets that restate the summary or each other.
    #[command(
        long_about = "Keep bullets in order, dropping any that is contained in, contains, or is\n\
similar to a summary sentence, or similar to a bullet kept earlier. Stops once\n\
--max-count bullets are kept.\n\n\
With --explain every bullet is emitted with its verdict.\n"
    )]
    Dedupe {
        /// Summary the bullets are checked against.
        #[arg(long)]
        summary: String,

        /// Maximum bullets kept.
        #[arg(long, value_name = "N")]
        max_count: Option<usize>,

        /// Near-duplicate threshold in [0, 1].
        #[arg(long, value_name = "F", value_parser = parse_similarity)]
        sim: Option<f64>,

        /// Emit every bullet with its verdict.
        #[arg(long)]
        explain: bool,

        /// Candidate bullets.
        #[arg(value_name = "BULLET")]
        bullets: Vec<String>,
    },

    /// Bullets synthesized from summary sentences.
    Fallback {
        /// Summary to split.
        #[arg(long)]
        summary: String,

        /// Number of bullets wanted (default: backstop_want from config, 3).
        #[arg(long, value_name = "N")]
        want: Option<usize>,
    },

    /// Normalized fuzzy ratio of two strings.
    Similarity {
        a: String,
        b: String,

        /// Threshold reported as near_duplicate.
        #[arg(long, value_name = "F", value_parser = parse_similarity)]
        sim: Option<f64>,
    },
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<()> {
    // Parse output format
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let config = Config::resolve(cli.config.as_deref())?;

    match cli.command {
        Commands::Bullets { action } => match action {
            BulletCommands::Extract { file } => crate::bullets::api::run_extract(
                &InputSource::from_arg(file.as_deref()),
                render_config,
            ),
            BulletCommands::Normalize { text } => {
                crate::bullets::api::run_normalize(&text, render_config)
            }
            BulletCommands::Dedupe {
                summary,
                max_count,
                sim,
                explain,
                bullets,
            } => {
                let mut opts = config.takeaways.policy().dedupe;
                opts.max_count = max_count.unwrap_or(opts.max_count);
                opts.sim = sim.unwrap_or(opts.sim);
                crate::bullets::api::run_dedupe(&summary, &bullets, opts, explain, render_config)
            }
            BulletCommands::Fallback { summary, want } => crate::bullets::api::run_fallback(
                &summary,
                want.unwrap_or(config.takeaways.backstop_want),
                render_config,
            ),
            BulletCommands::Similarity { a, b, sim } => crate::bullets::api::run_similarity(
                &a,
                &b,
                sim.unwrap_or(config.takeaways.sim),
                render_config,
            ),
        },

        Commands::Run { file, policy } => {
            let (policy, summary_lines) = policy.resolve(&config);
            crate::flows::takeaways::run_takeaways(
                &InputSource::from_arg(file.as_deref()),
                summary_lines,
                &policy,
                render_config,
            )
        }

        Commands::Post {
            file,
            title,
            link,
            date,
            out,
            policy,
        } => {
            let (policy, summary_lines) = policy.resolve(&config);
            let request = PostRequest {
                title: &title,
                link: &link,
                date: post_timestamp(date),
                summary_lines,
                policy,
            };
            crate::flows::post::run_post(
                &InputSource::from_arg(file.as_deref()),
                &request,
                out.as_deref(),
                &config,
                render_config,
            )
        }

        Commands::Drafts {
            file,
            title,
            link,
            policy,
        } => {
            let (policy, summary_lines) = policy.resolve(&config);
            crate::flows::social::run_drafts(
                &InputSource::from_arg(file.as_deref()),
                &title,
                &link,
                &config,
                summary_lines,
                &policy,
                render_config,
            )
        }

        Commands::Tags { text } => crate::flows::tags::run_tags(&text, &config, render_config),

        Commands::Score { title, snippet } => {
            let snippet = snippet.map(InputSource::File);
            crate::flows::tags::run_score(&title, snippet.as_ref(), &config, render_config)
        }

        Commands::Batch { files, policy } => {
            let (policy, summary_lines) = policy.resolve(&config);
            crate::flows::batch::run_batch(&files, summary_lines, &policy, render_config)
        }
    }
}
