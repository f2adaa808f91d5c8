// regex-replacer/src/utils/rules.rs
//! Assembles the effective rule chain from CLI arguments.

use anyhow::{anyhow, bail, Context, Result};
use log::debug;

use regex_replacer_core::{validate_rules, ReplacementRule, ReplacerConfig};

use crate::cli::RuleArgs;

/// Separator between pattern and replacement in `--rule` values.
pub const INLINE_SEPARATOR: &str = "=>";

/// Parses `PATTERN=>REPLACEMENT`, splitting on the first separator.
pub fn parse_inline_rule(value: &str) -> Result<(String, String)> {
    let (pattern, replacement) = value
        .split_once(INLINE_SEPARATOR)
        .ok_or_else(|| anyhow!("Inline rule '{}' is missing the '{}' separator.", value, INLINE_SEPARATOR))?;
    if pattern.is_empty() {
        bail!("Inline rule '{}' has an empty pattern.", value);
    }
    Ok((pattern.to_string(), replacement.to_string()))
}

/// Builds the chain: file rules (or the default rules file) first, then the
/// inline rules in the order given, then enable/disable filtering.
pub fn build_config(args: &RuleArgs) -> Result<ReplacerConfig> {
    let mut config = match &args.rules {
        Some(path) => ReplacerConfig::load_from_file(path)?,
        None if args.inline.is_empty() => ReplacerConfig::load_default()?.ok_or_else(|| {
            anyhow!(
                "No rules given. Pass --rules FILE or --rule 'PATTERN=>REPLACEMENT', or create {}.",
                ReplacerConfig::default_config_candidates()
                    .first()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "~/.regex_replacer/rules.yaml".to_string())
            )
        })?,
        None => ReplacerConfig::default(),
    };

    if !args.inline.is_empty() {
        let rules = args
            .inline
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let (pattern, replacement) = parse_inline_rule(value)?;
                Ok(ReplacementRule::from_pair(format!("inline_{}", i), &pattern, &replacement))
            })
            .collect::<Result<Vec<_>>>()?;
        validate_rules(&rules).context("Invalid --rule value")?;
        debug!("Appending {} inline rule(s).", rules.len());
        config.append(ReplacerConfig { rules, jobs: None });
    }

    config.set_active_rules(&args.enable, &args.disable);
    if args.jobs.is_some() {
        config.jobs = args.jobs;
    }
    Ok(config)
}
