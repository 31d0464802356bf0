//! Flows module - Operations built on the bullet core
//!
//! Provides:
//! - takeaways: summary + deduplicated bullets from model output
//! - batch: takeaways for many files
//! - post: Jekyll post rendering and writing
//! - social: per-platform social drafts
//! - tags: auto-tagging and relevance scoring

pub mod batch;
pub mod post;
pub mod social;
pub mod tags;
pub mod takeaways;
