//! Core module - Contains the fundamental data structures and utilities
//!
//! This module provides:
//! - Unified result model (ResultItem)
//! - Rendering functions for different output formats
//! - Input reading (stdin or file, lossy and size-capped)
//! - Error types and fail-open helpers
//! - Common utilities

pub mod error;
pub mod input;
pub mod model;
pub mod render;
pub mod util;
