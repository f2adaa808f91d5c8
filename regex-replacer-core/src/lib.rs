// regex-replacer-core/src/lib.rs
//! # regex_replacer Core Library
//!
//! `regex-replacer-core` applies an ordered chain of regular-expression rules to
//! batches of texts. Each rule rewrites the output of the rule before it using
//! "replace all" semantics. Batches run either on the calling thread or on a
//! rayon pool, and the output always keeps the input order.
//!
//! The library performs no I/O beyond loading rule files; the CLI and the
//! Python extension are thin front ends over it.
//!
//! ## Modules
//!
//! * `config`: `ReplacementRule`s and `ReplacerConfig`, YAML loading, validation and filtering.
//! * `compiler`: Compiles a chain into `CompiledRules`, with a process-wide cache.
//! * `engine`: The `TextTransformer` trait used by the front ends.
//! * `replacer`: `RegexReplacer`, the batch executor.
//! * `stats`: Per-rule counters and the batch `ReplacementSummary`.
//! * `headless`: One-shot convenience functions.
//! * `errors`: The `ReplacerError` enum.
//!
//! ## Usage Example
//!
//! ```rust
//! use regex_replacer_core::RegexReplacer;
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let replacer = RegexReplacer::from_pairs([(r"\d+", "-"), (r"[a-z]+", "+")], 0)?;
//!     let out = replacer.transform(vec!["abc123def".to_string()], false);
//!     assert_eq!(out, vec!["+-+".to_string()]);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return `anyhow::Result` with context attached. The
//! underlying kinds are described by [`ReplacerError`].
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod compiler;
pub mod config;
pub mod engine;
pub mod errors;
pub mod headless;
pub mod replacer;
pub mod stats;

/// Re-exports the rule configuration types.
pub use config::{
    replacement_references,
    validate_rules,
    GroupRef,
    ReplacementRule,
    ReplacerConfig,
    DEFAULT_RULES_FILE,
    MAX_PATTERN_LENGTH,
};

pub use errors::ReplacerError;

pub use engine::TextTransformer;

pub use replacer::RegexReplacer;

/// Re-exports counters reported by `transform_with_stats`.
pub use stats::{truncate_for_log, ReplacementSummary, RuleStats};

pub use headless::{headless_replace_batch, headless_replace_string};

pub use compiler::{compile_rules, get_or_compile_rules, CompiledRule, CompiledRules};
