//! compiler.rs - Compiles rule chains and caches the result.
//!
//! Converts a `ReplacerConfig` into `CompiledRules`, keeping chain order.
//! A process-wide cache shares the compiled chain between replacers that are
//! alive at the same time. It holds only weak references, so a chain is freed
//! once its last replacer is dropped.
//!
//! License: MIT OR Apache-2.0

use anyhow::Result;
use lazy_static::lazy_static;
use log::debug;
use regex::{Regex, RegexBuilder};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock, Weak};

use crate::config::{ReplacementRule, ReplacerConfig};
use crate::errors::ReplacerError;

/// Size limit for a single compiled program.
const REGEX_SIZE_LIMIT: usize = 10 * (1 << 20);

/// A compiled link of the chain.
#[derive(Debug)]
pub struct CompiledRule {
    /// Name of the source rule, used in stats and logs.
    pub name: String,
    /// The compiled pattern, with the rule's flags applied.
    pub regex: Regex,
    /// Replacement template, expanded against each match.
    pub replace_with: String,
}

/// The compiled chain, in application order.
#[derive(Debug, Default)]
pub struct CompiledRules {
    /// Enabled rules only, in chain order.
    pub rules: Vec<CompiledRule>,
}

impl CompiledRules {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Chains sharing a `hash_config` bucket. The full rule list is kept so a
/// hash collision never serves another chain's regexes.
type CacheBucket = Vec<(Vec<ReplacementRule>, Weak<CompiledRules>)>;

lazy_static! {
    /// Compiled chains keyed by `hash_config`.
    static ref COMPILED_RULES_CACHE: RwLock<HashMap<u64, CacheBucket>> = RwLock::new(HashMap::new());
}

/// Hashes the ordered rule list. Order is part of the key: the same rules in a
/// different order produce different output.
fn hash_config(config: &ReplacerConfig) -> u64 {
    let mut hasher = DefaultHasher::new();
    config.rules.hash(&mut hasher);
    hasher.finish()
}

/// Compiles rules in order. Disabled rules are skipped; every failing rule is
/// reported in one error.
pub fn compile_rules(rules_to_compile: Vec<ReplacementRule>) -> Result<CompiledRules, ReplacerError> {
    debug!("Starting compilation of {} rules.", rules_to_compile.len());

    let mut compiled_rules = Vec::with_capacity(rules_to_compile.len());
    let mut compilation_errors = Vec::new();

    for rule in rules_to_compile {
        if !rule.is_enabled() {
            debug!("Skipping disabled rule '{}'.", rule.name);
            continue;
        }

        let regex_result = RegexBuilder::new(&rule.pattern)
            .case_insensitive(rule.case_insensitive)
            .multi_line(rule.multiline)
            .dot_matches_new_line(rule.dot_matches_new_line)
            .size_limit(REGEX_SIZE_LIMIT)
            .build();

        match regex_result {
            Ok(regex) => {
                log::debug!(
                    target: "regex_replacer_core::compiler",
                    "Rule '{}' compiled successfully.",
                    &rule.name
                );
                compiled_rules.push(CompiledRule {
                    name: rule.name,
                    regex,
                    replace_with: rule.replace_with,
                });
            }
            Err(e) => compilation_errors.push(ReplacerError::RuleCompilationError(rule.name, e)),
        }
    }

    if !compilation_errors.is_empty() {
        let error_message = compilation_errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("\n");
        return Err(ReplacerError::Fatal(format!(
            "Failed to compile {} rule(s):\n{}",
            compilation_errors.len(),
            error_message
        )));
    }

    debug!("Finished compiling rules. Total compiled: {}.", compiled_rules.len());
    Ok(CompiledRules { rules: compiled_rules })
}

/// Returns the compiled chain for `config`, compiling and caching it when no
/// live replacer already holds it.
pub fn get_or_compile_rules(config: &ReplacerConfig) -> Result<Arc<CompiledRules>> {
    let cache_key = hash_config(config);

    {
        let cache = COMPILED_RULES_CACHE.read().unwrap_or_else(|e| e.into_inner());
        if let Some(rules) = cache.get(&cache_key).and_then(|bucket| lookup(bucket, &config.rules)) {
            debug!("Serving compiled rules from cache for key: {}", cache_key);
            return Ok(rules);
        }
    }

    debug!("Compiled rules not found in cache. Compiling now.");
    let compiled = Arc::new(compile_rules(config.rules.clone())?);

    let mut cache = COMPILED_RULES_CACHE.write().unwrap_or_else(|e| e.into_inner());
    // Another thread may have compiled the same chain meanwhile.
    if let Some(rules) = cache.get(&cache_key).and_then(|bucket| lookup(bucket, &config.rules)) {
        return Ok(rules);
    }
    prune_dead_entries(&mut cache);
    cache
        .entry(cache_key)
        .or_default()
        .push((config.rules.clone(), Arc::downgrade(&compiled)));

    debug!("Successfully compiled and cached rules for key: {}", cache_key);
    Ok(compiled)
}

fn lookup(bucket: &CacheBucket, rules: &[ReplacementRule]) -> Option<Arc<CompiledRules>> {
    bucket
        .iter()
        .filter(|(cached, _)| cached.as_slice() == rules)
        .find_map(|(_, weak)| weak.upgrade())
}

/// Drops entries whose chain is no longer held by any replacer.
fn prune_dead_entries(cache: &mut HashMap<u64, CacheBucket>) {
    cache.retain(|_, bucket| {
        bucket.retain(|(_, weak)| weak.strong_count() > 0);
        !bucket.is_empty()
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_skips_disabled_rules() {
        let mut rules = vec![
            ReplacementRule::from_pair("keep", "a", "b"),
            ReplacementRule::from_pair("drop", "c", "d"),
        ];
        rules[1].enabled = Some(false);
        let compiled = compile_rules(rules).unwrap();
        assert_eq!(compiled.len(), 1);
        assert_eq!(compiled.rules[0].name, "keep");
    }

    #[test]
    fn test_compile_reports_every_failure() {
        let rules = vec![
            ReplacementRule::from_pair("bad_one", "(", ""),
            ReplacementRule::from_pair("good", "x", ""),
            ReplacementRule::from_pair("bad_two", "[", ""),
        ];
        let err = compile_rules(rules).unwrap_err().to_string();
        assert!(err.contains("Failed to compile 2 rule(s)"));
        assert!(err.contains("bad_one"));
        assert!(err.contains("bad_two"));
    }

    #[test]
    fn test_compile_accepts_long_valid_pattern() {
        let alternatives: Vec<String> = (b'a'..=b'z')
            .flat_map(|a| (b'a'..=b'j').map(move |b| format!("{}{}", a as char, b as char)))
            .collect();
        let pattern = format!("(?:{})", alternatives.join("|"));
        assert!(pattern.len() > crate::config::MAX_PATTERN_LENGTH);

        let compiled = compile_rules(vec![ReplacementRule::from_pair("long", &pattern, "X")]).unwrap();
        assert_eq!(compiled.rules[0].regex.replace_all("ab zz ze", "X"), "X zz X");
    }

    #[test]
    fn test_case_insensitive_flag() {
        let mut rule = ReplacementRule::from_pair("ci", "hello", "bye");
        rule.case_insensitive = true;
        let compiled = compile_rules(vec![rule]).unwrap();
        assert!(compiled.rules[0].regex.is_match("HeLLo"));
    }

    #[test]
    fn test_cache_returns_shared_instance_and_respects_order() {
        let config = ReplacerConfig::from_pairs([("cache_a", "1"), ("cache_b", "2")]);
        let first = get_or_compile_rules(&config).unwrap();
        let second = get_or_compile_rules(&config).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let mut reversed = config.clone();
        reversed.rules.reverse();
        let third = get_or_compile_rules(&reversed).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.rules[0].name, "rule_1");
    }

    fn cached_entries_with_pattern_prefix(prefix: &str) -> usize {
        let cache = COMPILED_RULES_CACHE.read().unwrap_or_else(|e| e.into_inner());
        cache
            .values()
            .flatten()
            .filter(|(rules, _)| rules.iter().any(|r| r.pattern.starts_with(prefix)))
            .count()
    }

    #[test]
    fn test_cache_releases_dropped_chains() {
        for i in 0..200 {
            let config = ReplacerConfig::from_pairs([(format!("cache_release_{}", i), "x")]);
            let compiled = get_or_compile_rules(&config).unwrap();
            drop(compiled);
        }
        // Each insert prunes dead chains, so at most the last one remains.
        assert!(cached_entries_with_pattern_prefix("cache_release_") <= 1);
    }

    #[test]
    fn test_cache_recompiles_after_drop() {
        let config = ReplacerConfig::from_pairs([("cache_recompile", "y")]);
        let first = get_or_compile_rules(&config).unwrap();
        let weak = Arc::downgrade(&first);
        drop(first);
        assert!(weak.upgrade().is_none());

        let second = get_or_compile_rules(&config).unwrap();
        assert_eq!(second.rules[0].regex.as_str(), "cache_recompile");
    }

    #[test]
    fn test_lookup_compares_full_rule_list() {
        let kept = Arc::new(compile_rules(vec![ReplacementRule::from_pair("a", "one", "")]).unwrap());
        let bucket: CacheBucket = vec![(vec![ReplacementRule::from_pair("a", "one", "")], Arc::downgrade(&kept))];

        assert!(lookup(&bucket, &[ReplacementRule::from_pair("a", "one", "")]).is_some());
        assert!(lookup(&bucket, &[ReplacementRule::from_pair("a", "two", "")]).is_none());
    }
}
