// File: regex-replacer-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for one-shot use of the replacer, without keeping an
//! instance around.

use anyhow::Result;

use crate::config::ReplacerConfig;
use crate::engine::TextTransformer;
use crate::replacer::RegexReplacer;

/// Rewrites a single string with `config`'s chain.
pub fn headless_replace_string(config: ReplacerConfig, input: &str) -> Result<String> {
    let replacer = RegexReplacer::new(config)?;
    Ok(replacer.transform_text(input))
}

/// Rewrites a batch with `config`'s chain, honoring `config.jobs`.
pub fn headless_replace_batch(config: ReplacerConfig, texts: Vec<String>, single_thread: bool) -> Result<Vec<String>> {
    let replacer = RegexReplacer::new(config)?;
    Ok(replacer.transform(texts, single_thread))
}
