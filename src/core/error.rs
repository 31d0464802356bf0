//! Error kinds and the explicit fail-open helper
//!
//! The bullet pipeline itself is total and never fails. Everything that touches
//! the outside world (config, input files, post output) reports a
//! `TakeawayError`, and callers that want to keep going on failure say so
//! through [`FailOpen`] instead of discarding the error.

use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use crate::core::model::ItemError;

/// Domain errors raised around the bullet pipeline
#[derive(Debug, Error)]
pub enum TakeawayError {
    #[error("config file not found: {}", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to read {label}: {source}")]
    InputRead {
        label: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write post {}: {source}", path.display())]
    PostWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl TakeawayError {
    /// Stable machine-readable code, used in error result items
    pub fn code(&self) -> &'static str {
        match self {
            TakeawayError::ConfigMissing { .. } => "CONFIG_MISSING",
            TakeawayError::ConfigParse { .. } => "CONFIG_PARSE",
            TakeawayError::InputRead { .. } => "INPUT_READ",
            TakeawayError::PostWrite { .. } => "POST_WRITE",
            TakeawayError::FrontMatter(_) => "FRONT_MATTER",
            TakeawayError::InvalidArgument(_) => "INVALID_ARGUMENT",
        }
    }

    /// Convert into an error entry for a result item
    pub fn to_item_error(&self) -> ItemError {
        ItemError::new(self.code(), self.to_string())
    }
}

/// Turn a failure into a documented default value.
///
/// The error is always logged at warn level with `context`, so a fail-open
/// path stays visible in the logs.
pub trait FailOpen<T> {
    fn fail_open(self, context: &str, default: T) -> T;
}

impl<T, E: std::fmt::Display> FailOpen<T> for Result<T, E> {
    fn fail_open(self, context: &str, default: T) -> T {
        match self {
            Ok(value) => value,
            Err(err) => {
                warn!("{}: {} (continuing with default)", context, err);
                default
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fail_open_passes_value_through() {
        let ok: Result<u32, String> = Ok(7);
        assert_eq!(ok.fail_open("reading", 0), 7);
    }

    #[test]
    fn test_fail_open_uses_default() {
        let err: Result<u32, String> = Err("boom".to_string());
        assert_eq!(err.fail_open("reading", 3), 3);
    }

    #[test]
    fn test_error_codes() {
        let err = TakeawayError::InvalidArgument("sim".into());
        assert_eq!(err.code(), "INVALID_ARGUMENT");
        assert!(err.to_string().contains("sim"));

        let missing = TakeawayError::ConfigMissing {
            path: PathBuf::from("takeaways.yaml"),
        };
        let item = missing.to_item_error();
        assert_eq!(item.code, "CONFIG_MISSING");
        assert!(item.message.contains("takeaways.yaml"));
    }
}
