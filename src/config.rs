//! Configuration file
//!
//! A YAML file, every key optional. A missing file means defaults; a file
//! that exists but does not parse is an error.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::bullets::dedupe::check_similarity;
use crate::bullets::DedupeOptions;
use crate::core::error::{FailOpen, TakeawayError};
use crate::flows::takeaways::TakeawayPolicy;

/// File looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "takeaways.yaml";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub brand_name: Option<String>,

    /// List, string or map of hashtags (see `flows::social::normalize_hashtags`)
    pub hashtags: Value,

    /// Bucket name -> keywords, in file order
    pub tag_buckets: Mapping,

    pub revenue_filter: RevenueFilterConfig,

    /// Map, list or string of platforms (see `flows::social::normalize_platforms`)
    pub platforms: Value,

    pub site: SiteConfig,

    pub takeaways: PolicyConfig,
}

/// Keyword scoring for relevance filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueFilterConfig {
    pub include_keywords: Vec<String>,
    pub exclude_keywords: Vec<String>,
    pub min_score: i64,
}

impl Default for RevenueFilterConfig {
    fn default() -> Self {
        Self {
            include_keywords: Vec::new(),
            exclude_keywords: Vec::new(),
            min_score: 2,
        }
    }
}

/// Static site settings for post rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    /// Permalink pattern; `:title`, `:year`, `:month`, `:day` are expanded
    pub permalink: String,
    pub layout: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://example.com".to_string(),
            permalink: "/blog/:title/".to_string(),
            layout: "posts".to_string(),
        }
    }
}

/// Pipeline knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub seed_want: usize,
    pub max_count: usize,
    pub sim: f64,
    pub backstop_want: usize,
    pub summary_lines: usize,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        let policy = TakeawayPolicy::default();
        Self {
            seed_want: policy.seed_want,
            max_count: policy.dedupe.max_count,
            sim: policy.dedupe.sim,
            backstop_want: policy.backstop_want,
            summary_lines: crate::flows::takeaways::DEFAULT_SUMMARY_LINES,
        }
    }
}

impl PolicyConfig {
    pub fn policy(&self) -> TakeawayPolicy {
        TakeawayPolicy {
            seed_want: self.seed_want,
            dedupe: DedupeOptions {
                max_count: self.max_count,
                sim: self.sim,
            },
            backstop_want: self.backstop_want,
        }
    }
}

/// A named group of keywords used for auto-tagging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagBucket {
    pub name: String,
    pub keywords: Vec<String>,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self, TakeawayError> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                TakeawayError::ConfigMissing {
                    path: path.to_path_buf(),
                }
            } else {
                TakeawayError::InputRead {
                    label: path.display().to_string(),
                    source,
                }
            }
        })?;

        Self::parse(&content, path)
    }

    /// Parse configuration text; `origin` is only used in errors
    pub fn parse(content: &str, origin: &Path) -> Result<Self, TakeawayError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config =
            serde_yaml::from_str(content).map_err(|source| TakeawayError::ConfigParse {
                path: origin.to_path_buf(),
                source,
            })?;
        check_similarity(config.takeaways.sim).map_err(|reason| {
            TakeawayError::InvalidArgument(format!(
                "{}: takeaways.sim: {}",
                origin.display(),
                reason
            ))
        })?;
        debug!("Loaded config from {}", origin.display());
        Ok(config)
    }

    /// Resolve the config for a run.
    ///
    /// An explicitly named file that does not exist falls back to defaults
    /// with a warning. Without a name, `takeaways.yaml` in the working
    /// directory is used when present.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, TakeawayError> {
        match explicit {
            Some(path) => match Self::load(path) {
                Err(err @ TakeawayError::ConfigMissing { .. }) => {
                    let missing: Result<Self, TakeawayError> = Err(err);
                    Ok(missing.fail_open("loading config", Self::default()))
                }
                other => other,
            },
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load(path)
                } else {
                    debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Tag buckets in file order. A bucket value may be a list of keywords or
    /// a single keyword string.
    pub fn tag_buckets(&self) -> Vec<TagBucket> {
        self.tag_buckets
            .iter()
            .filter_map(|(name, keywords)| {
                let name = scalar_to_string(name)?;
                let keywords = match keywords {
                    Value::Sequence(items) => items.iter().filter_map(scalar_to_string).collect(),
                    other => scalar_to_string(other).into_iter().collect(),
                };
                Some(TagBucket { name, keywords })
            })
            .collect()
    }
}

/// String form of a YAML scalar; `None` for null, sequences and mappings
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
