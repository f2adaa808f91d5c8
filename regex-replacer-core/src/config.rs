//! Configuration management for `regex-replacer-core`.
//!
//! This module defines the rule structures consumed by the replacer. It handles
//! YAML (de)serialization and provides utilities for loading, combining, filtering
//! and validating rule chains. Rule order is significant everywhere: every rule
//! rewrites the output of the rule before it.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::errors::ReplacerError;

/// Maximum pattern length accepted from rule files and `--rule` values.
/// Pairs passed programmatically are bounded only by the compiled size limit.
pub const MAX_PATTERN_LENGTH: usize = 500;

/// File name looked up in the default configuration directories.
pub const DEFAULT_RULES_FILE: &str = "rules.yaml";

/// A single link in the rule chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplacementRule {
    /// Unique identifier for the rule (e.g., "collapse_digits").
    pub name: String,
    /// Human-readable description of what the rule rewrites.
    pub description: Option<String>,
    /// The regex pattern string.
    pub pattern: String,
    /// Replacement template. Supports `$1`, `${1}`, `$name`, `${name}` and `$$`.
    pub replace_with: String,
    /// If true, letters match regardless of case.
    pub case_insensitive: bool,
    /// If true, `^` and `$` match at line boundaries.
    pub multiline: bool,
    /// If true, the dot character `.` in regex will match newlines.
    pub dot_matches_new_line: bool,
    /// If true, the rule is dropped unless explicitly enabled.
    pub opt_in: bool,
    /// Explicit override for enabling/disabling the rule.
    pub enabled: Option<bool>,
}

impl Default for ReplacementRule {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            pattern: String::new(),
            replace_with: String::new(),
            case_insensitive: false,
            multiline: false,
            dot_matches_new_line: false,
            opt_in: false,
            enabled: None,
        }
    }
}

impl ReplacementRule {
    /// Builds an anonymous rule from a bare pattern/replacement pair.
    pub fn from_pair(name: impl Into<String>, pattern: &str, replace_with: &str) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.to_string(),
            replace_with: replace_with.to_string(),
            ..Default::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }
}

/// Top-level configuration: an ordered rule chain plus the optional pool size.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReplacerConfig {
    /// Rules, applied in order.
    #[serde(default)]
    pub rules: Vec<ReplacementRule>,
    /// Worker thread count for parallel batches (`0`/`1` = shared pool).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl ReplacerConfig {
    /// Builds a config from ordered `(pattern, replacement)` pairs.
    ///
    /// Rules are named `rule_0`, `rule_1`, ... in input order. No validation is
    /// performed here; invalid patterns surface when the rules are compiled.
    pub fn from_pairs<P, R>(pairs: impl IntoIterator<Item = (P, R)>) -> Self
    where
        P: AsRef<str>,
        R: AsRef<str>,
    {
        let rules = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (p, r))| ReplacementRule::from_pair(format!("rule_{}", i), p.as_ref(), r.as_ref()))
            .collect();
        Self { rules, jobs: None }
    }

    /// Loads and validates a rule chain from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading replacement rules from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&text)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
        info!("Loaded {} rules from file {}.", config.rules.len(), path.display());
        Ok(config)
    }

    /// Parses and validates a rule chain from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: ReplacerConfig = serde_yml::from_str(text).context("Failed to parse rules YAML")?;
        validate_rules(&config.rules)?;
        Ok(config)
    }

    /// Candidate locations for the user's default rules file, in lookup order.
    pub fn default_config_candidates() -> Vec<PathBuf> {
        [
            dirs::home_dir().map(|p| p.join(".regex_replacer")),
            dirs::config_dir().map(|p| p.join("regex_replacer")),
        ]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(DEFAULT_RULES_FILE))
        .collect()
    }

    /// First existing default rules file, if any.
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_candidates().into_iter().find(|p| p.is_file())
    }

    /// Loads the default rules file. A missing file is not an error.
    pub fn load_default() -> Result<Option<Self>> {
        match Self::default_config_path() {
            Some(path) => Self::load_from_file(&path).map(Some),
            None => {
                debug!("No default rules file found.");
                Ok(None)
            }
        }
    }

    /// Appends `other`'s rules after this chain.
    ///
    /// A rule whose name already exists replaces the earlier rule at the earlier
    /// rule's position. `other.jobs` wins when set.
    pub fn append(&mut self, other: ReplacerConfig) {
        debug!("Appending {} rules to a chain of {}.", other.rules.len(), self.rules.len());
        for rule in other.rules {
            match self.rules.iter_mut().find(|r| r.name == rule.name) {
                Some(existing) => {
                    debug!("Rule '{}' overridden in place.", rule.name);
                    *existing = rule;
                }
                None => self.rules.push(rule),
            }
        }
        if other.jobs.is_some() {
            self.jobs = other.jobs;
        }
    }

    /// Filters active rules based on enable/disable lists provided via CLI.
    ///
    /// Disabled names are removed. Opt-in rules stay only when enabled by name.
    /// Naming a rule in `enable_rules` also clears an `enabled: false` override.
    pub fn set_active_rules(&mut self, enable_rules: &[String], disable_rules: &[String]) {
        let enable_set: HashSet<&str> = enable_rules.iter().map(String::as_str).collect();
        let disable_set: HashSet<&str> = disable_rules.iter().map(String::as_str).collect();

        debug!("Initial rules count before filtering: {}", self.rules.len());

        let all_rule_names: HashSet<&str> = self.rules.iter().map(|r| r.name.as_str()).collect();

        for rule_name in enable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `enable_rules` list does not exist.", rule_name);
        }

        for rule_name in disable_set.difference(&all_rule_names) {
            warn!("Rule '{}' in `disable_rules` list does not exist.", rule_name);
        }

        self.rules.retain(|rule| {
            let name = rule.name.as_str();
            !disable_set.contains(name) && (!rule.opt_in || enable_set.contains(name))
        });

        for rule in self.rules.iter_mut() {
            if enable_set.contains(rule.name.as_str()) {
                rule.enabled = Some(true);
            }
        }

        debug!("Final active rules count after filtering: {}", self.rules.len());
    }

    /// Names of the rules that will actually run, in order.
    pub fn active_rule_names(&self) -> Vec<&str> {
        self.rules.iter().filter(|r| r.is_enabled()).map(|r| r.name.as_str()).collect()
    }
}

/// A capture group referenced from a replacement template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupRef {
    Index(usize),
    Name(String),
}

/// Extracts every group reference from a replacement template.
///
/// Mirrors the expansion syntax of `regex::Captures::expand`: `$$` is a literal
/// dollar, `${...}` is braced, and an unbraced name is the longest run of
/// `[_0-9A-Za-z]`. Names made of digits only are group indices.
pub fn replacement_references(template: &str) -> Vec<GroupRef> {
    let bytes = template.as_bytes();
    let mut refs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        match bytes.get(i + 1) {
            Some(b'$') => {
                i += 2;
            }
            Some(b'{') => match template[i + 2..].find('}') {
                Some(close) => {
                    let name = &template[i + 2..i + 2 + close];
                    if !name.is_empty() {
                        refs.push(to_group_ref(name));
                    }
                    i += close + 3;
                }
                None => i += 1,
            },
            _ => {
                let start = i + 1;
                let len = template[start..]
                    .bytes()
                    .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                    .count();
                if len > 0 {
                    refs.push(to_group_ref(&template[start..start + len]));
                }
                i = start + len;
            }
        }
    }
    refs
}

fn to_group_ref(name: &str) -> GroupRef {
    match name.parse::<usize>() {
        Ok(index) => GroupRef::Index(index),
        Err(_) => GroupRef::Name(name.to_string()),
    }
}

/// Validates rule integrity: names, pattern length, regex syntax and the
/// capture groups referenced by each replacement. All problems are reported
/// together.
pub fn validate_rules(rules: &[ReplacementRule]) -> Result<()> {
    let mut rule_names = HashSet::new();
    let mut errors = Vec::new();

    for rule in rules {
        if rule.name.is_empty() {
            errors.push("A rule has an empty `name` field.".to_string());
        } else if !rule_names.insert(rule.name.clone()) {
            errors.push(format!("Duplicate rule name found: '{}'.", rule.name));
        }

        if rule.pattern.is_empty() {
            errors.push(format!("Rule '{}' has an empty `pattern` field.", rule.name));
            continue;
        }

        if rule.pattern.len() > MAX_PATTERN_LENGTH {
            errors.push(
                ReplacerError::PatternLengthExceeded(rule.name.clone(), rule.pattern.len(), MAX_PATTERN_LENGTH)
                    .to_string(),
            );
            continue;
        }

        let regex = match Regex::new(&rule.pattern) {
            Ok(re) => re,
            Err(e) => {
                errors.push(format!("Rule '{}' has an invalid regex pattern: {}", rule.name, e));
                continue;
            }
        };

        let group_names: HashSet<&str> = regex.capture_names().flatten().collect();
        for group in replacement_references(&rule.replace_with) {
            match group {
                GroupRef::Index(n) if n >= regex.captures_len() => errors.push(format!(
                    "Rule '{}': replacement references non-existent capture group '${}'.",
                    rule.name, n
                )),
                GroupRef::Name(ref name) if !group_names.contains(name.as_str()) => errors.push(format!(
                    "Rule '{}': replacement references non-existent named group '{}'.",
                    rule.name, name
                )),
                _ => {}
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ReplacerError::ConfigError(format!("Rule validation failed:\n{}", errors.join("\n"))).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_preserves_order_and_names() {
        let config = ReplacerConfig::from_pairs([(r"\d+", "-"), (r"[a-z]+", "+")]);
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0].name, "rule_0");
        assert_eq!(config.rules[0].pattern, r"\d+");
        assert_eq!(config.rules[1].name, "rule_1");
        assert_eq!(config.rules[1].replace_with, "+");
    }

    #[test]
    fn test_replacement_references() {
        assert_eq!(
            replacement_references("$1-${2}-$name-${other}"),
            vec![
                GroupRef::Index(1),
                GroupRef::Index(2),
                GroupRef::Name("name".to_string()),
                GroupRef::Name("other".to_string()),
            ]
        );
        assert!(replacement_references("cost: $$5").is_empty());
        assert!(replacement_references("trailing $").is_empty());
    }

    #[test]
    fn test_validate_rejects_missing_group() {
        let rules = vec![ReplacementRule::from_pair("r", r"(\d+)", "$2")];
        let err = validate_rules(&rules).unwrap_err().to_string();
        assert!(err.contains("non-existent capture group '$2'"));
    }

    #[test]
    fn test_validate_rejects_long_pattern() {
        let long = "a".repeat(MAX_PATTERN_LENGTH + 1);
        let err = validate_rules(&[ReplacementRule::from_pair("long", &long, "")]).unwrap_err().to_string();
        assert!(err.contains("Rule 'long': pattern length (501) exceeds maximum allowed (500)"));
    }

    #[test]
    fn test_validate_accepts_named_group() {
        let rules = vec![ReplacementRule::from_pair("r", r"(?P<year>\d{4})", "${year}")];
        assert!(validate_rules(&rules).is_ok());
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let rules = vec![
            ReplacementRule::from_pair("dup", "a", ""),
            ReplacementRule::from_pair("dup", "b", ""),
            ReplacementRule::from_pair("bad", "(", ""),
            ReplacementRule::from_pair("", "c", ""),
        ];
        let err = validate_rules(&rules).unwrap_err().to_string();
        assert!(err.contains("Duplicate rule name found: 'dup'"));
        assert!(err.contains("Rule 'bad' has an invalid regex pattern"));
        assert!(err.contains("empty `name`"));
    }

    #[test]
    fn test_append_overrides_in_place() {
        let mut base = ReplacerConfig::from_pairs([("a", "1"), ("b", "2")]);
        let mut extra = ReplacerConfig::from_pairs([("A", "x")]);
        extra.rules.push(ReplacementRule::from_pair("tail", "z", "9"));
        extra.jobs = Some(4);
        base.append(extra);

        let names: Vec<&str> = base.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["rule_0", "rule_1", "tail"]);
        assert_eq!(base.rules[0].pattern, "A");
        assert_eq!(base.jobs, Some(4));
    }

    #[test]
    fn test_set_active_rules_opt_in() {
        let mut config = ReplacerConfig::from_pairs([("a", ""), ("b", ""), ("c", "")]);
        config.rules[1].opt_in = true;
        config.rules[2].enabled = Some(false);

        let mut filtered = config.clone();
        filtered.set_active_rules(&[], &["rule_0".to_string()]);
        assert_eq!(filtered.active_rule_names(), Vec::<&str>::new());
        assert_eq!(filtered.rules.len(), 1);

        config.set_active_rules(&["rule_1".to_string(), "rule_2".to_string()], &[]);
        assert_eq!(config.active_rule_names(), vec!["rule_0", "rule_1", "rule_2"]);
    }
}
