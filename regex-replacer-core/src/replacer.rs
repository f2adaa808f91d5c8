// regex-replacer-core/src/replacer.rs
//! The `RegexReplacer`: runs an ordered rule chain over batches of texts,
//! either on the calling thread or on a rayon pool.
//! License: MIT OR Apache-2.0

use std::borrow::Cow;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use regex::Captures;

use crate::compiler::{get_or_compile_rules, CompiledRule, CompiledRules};
use crate::config::ReplacerConfig;
use crate::engine::TextTransformer;
use crate::errors::ReplacerError;
use crate::stats::{log_rule_application_debug, ReplacementSummary, RuleStats};

/// Applies a compiled chain to texts.
///
/// The replacer is immutable once built and can be shared between threads.
/// With `n_jobs > 1` it owns a dedicated pool of exactly `n_jobs` workers;
/// otherwise parallel batches use rayon's global pool.
#[derive(Debug)]
pub struct RegexReplacer {
    compiled_rules: Arc<CompiledRules>,
    config: ReplacerConfig,
    n_jobs: usize,
    pool: Option<ThreadPool>,
}

impl RegexReplacer {
    /// Builds a replacer using `config.jobs` as the pool size.
    pub fn new(config: ReplacerConfig) -> Result<Self> {
        let n_jobs = config.jobs.unwrap_or(0);
        Self::with_jobs(config, n_jobs)
    }

    pub fn with_jobs(config: ReplacerConfig, n_jobs: usize) -> Result<Self> {
        let compiled_rules = get_or_compile_rules(&config)
            .context("Failed to compile replacement rules for RegexReplacer")?;

        let pool = if n_jobs > 1 {
            debug!("Building dedicated pool with {} workers.", n_jobs);
            let pool = ThreadPoolBuilder::new()
                .num_threads(n_jobs)
                .thread_name(|i| format!("regex-replacer-{}", i))
                .build()
                .map_err(ReplacerError::from)?;
            Some(pool)
        } else {
            None
        };

        info!("RegexReplacer ready with {} rule(s), n_jobs={}.", compiled_rules.len(), n_jobs);
        Ok(Self {
            compiled_rules,
            config,
            n_jobs,
            pool,
        })
    }

    /// Builds a replacer from ordered `(pattern, replacement)` pairs.
    pub fn from_pairs<P, R>(pairs: impl IntoIterator<Item = (P, R)>, n_jobs: usize) -> Result<Self>
    where
        P: AsRef<str>,
        R: AsRef<str>,
    {
        Self::with_jobs(ReplacerConfig::from_pairs(pairs), n_jobs)
    }

    pub fn n_jobs(&self) -> usize {
        self.n_jobs
    }

    /// Number of active rules in the chain.
    pub fn len(&self) -> usize {
        self.compiled_rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled_rules.is_empty()
    }

    /// Rewrites every text of the batch. Output order matches input order.
    pub fn transform(&self, texts: Vec<String>, single_thread: bool) -> Vec<String> {
        if single_thread || texts.len() < 2 {
            return texts.into_iter().map(|t| self.apply_rules(t)).collect();
        }
        self.in_pool(|| texts.into_par_iter().map(|t| self.apply_rules(t)).collect())
    }

    /// Same as `transform`, also aggregating per-rule counters over the batch.
    pub fn transform_with_stats(&self, texts: Vec<String>, single_thread: bool) -> (Vec<String>, ReplacementSummary) {
        let per_text: Vec<(String, bool, Vec<RuleStats>)> = if single_thread || texts.len() < 2 {
            texts.into_iter().map(|t| self.apply_rules_counting(t)).collect()
        } else {
            self.in_pool(|| texts.into_par_iter().map(|t| self.apply_rules_counting(t)).collect())
        };

        let mut summary = ReplacementSummary::for_rules(self.compiled_rules.rules.iter().map(|r| r.name.as_str()));
        let mut outputs = Vec::with_capacity(per_text.len());
        for (output, changed, stats) in per_text {
            summary.record(changed, &stats);
            outputs.push(output);
        }
        (outputs, summary)
    }

    fn in_pool<T, F>(&self, op: F) -> T
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }

    fn apply_rules(&self, text: String) -> String {
        let mut res = text;
        for rule in &self.compiled_rules.rules {
            let replaced = match rule.regex.replace_all(&res, rule.replace_with.as_str()) {
                Cow::Borrowed(_) => None,
                Cow::Owned(s) => Some(s),
            };
            if let Some(s) = replaced {
                res = s;
            }
        }
        res
    }

    fn apply_rules_counting(&self, text: String) -> (String, bool, Vec<RuleStats>) {
        let mut res = text.clone();
        let mut stats = Vec::with_capacity(self.compiled_rules.len());
        for rule in &self.compiled_rules.rules {
            let (replaced, occurrences) = replace_all_counting(rule, &res);
            if let Some(s) = replaced {
                log_rule_application_debug(&rule.name, occurrences, &res, &s);
                res = s;
            }
            stats.push(RuleStats {
                rule_name: rule.name.clone(),
                occurrences,
                texts_changed: usize::from(occurrences > 0),
            });
        }
        let changed = res != text;
        (res, changed, stats)
    }
}

/// `replace_all` that also counts matches. Returns `None` when nothing matched.
fn replace_all_counting(rule: &CompiledRule, haystack: &str) -> (Option<String>, usize) {
    let mut occurrences = 0usize;
    let out = rule.regex.replace_all(haystack, |caps: &Captures<'_>| {
        occurrences += 1;
        let mut dst = String::new();
        caps.expand(&rule.replace_with, &mut dst);
        dst
    });
    match out {
        Cow::Borrowed(_) => (None, occurrences),
        Cow::Owned(s) => (Some(s), occurrences),
    }
}

impl TextTransformer for RegexReplacer {
    fn transform_text(&self, text: &str) -> String {
        self.apply_rules(text.to_string())
    }

    fn transform_text_with_stats(&self, text: &str) -> (String, Vec<RuleStats>) {
        let (output, _, stats) = self.apply_rules_counting(text.to_string());
        (output, stats)
    }

    fn compiled_rules(&self) -> &CompiledRules {
        &self.compiled_rules
    }

    fn get_rules(&self) -> &ReplacerConfig {
        &self.config
    }
}
