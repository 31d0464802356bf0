//! Key-takeaway extraction and cleanup for LLM rewrite output
//!
//! The bullet core lives in [`bullets`]; [`flows`] builds summaries, posts,
//! social drafts and tags on top of it.

pub mod bullets;
pub mod cli;
pub mod config;
pub mod core;
pub mod flows;
