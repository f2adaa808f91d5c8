//! errors.rs - Custom error types for the regex-replacer-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific error kinds that callers (the CLI, the Python binding) can map
//! onto their own failure surfaces.
//!
//! License: MIT OR Apache-2.0

use thiserror::Error;

/// All error kinds produced by `regex-replacer-core`.
///
/// Marked `#[non_exhaustive]` so new variants can be added without breaking
/// downstream matches.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ReplacerError {
    #[error("Failed to compile replacement rule '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Rule '{0}': pattern length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Failed to build worker pool: {0}")]
    ThreadPoolError(String),

    #[error("Invalid rule configuration: {0}")]
    ConfigError(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    #[error("A critical system error occurred: {0}")]
    AnyhowWrapper(#[from] anyhow::Error),

    #[error("A fatal error occurred: {0}")]
    Fatal(String),
}

impl From<rayon::ThreadPoolBuildError> for ReplacerError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        ReplacerError::ThreadPoolError(e.to_string())
    }
}
