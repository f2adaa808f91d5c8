// regex-replacer-core/src/engine.rs
//! Defines the `TextTransformer` trait.
//!
//! The CLI and the Python binding drive text rewriting through this trait so
//! that the front ends do not depend on how a chain is executed.
//!
//! License: MIT OR Apache-2.0

use crate::compiler::CompiledRules;
use crate::config::ReplacerConfig;
use crate::stats::RuleStats;

/// Rewrites single texts with a compiled rule chain.
pub trait TextTransformer: Send + Sync {
    /// Applies the whole chain to `text`.
    fn transform_text(&self, text: &str) -> String;

    /// Applies the whole chain to `text` and reports, for every rule in
    /// chain order, how many matches it replaced.
    fn transform_text_with_stats(&self, text: &str) -> (String, Vec<RuleStats>);

    /// The compiled chain used by this transformer.
    fn compiled_rules(&self) -> &CompiledRules;

    /// The configuration the chain was compiled from.
    fn get_rules(&self) -> &ReplacerConfig;
}
