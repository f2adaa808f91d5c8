// regex-replacer-core/src/stats.rs
//! Per-rule replacement counters and the batch summary built from them,
//! plus helpers that keep raw input text out of debug logs.

use lazy_static::lazy_static;
use log::{debug, log_enabled, Level};
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Whether raw text may appear in debug logs. Read once from the environment.
    static ref TEXT_DEBUG_ALLOWED: bool = {
        std::env::var("REGEX_REPLACER_ALLOW_DEBUG_TEXT")
            .map(|s| s.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    };
}

/// Counters for a single rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RuleStats {
    pub rule_name: String,
    /// Number of matches replaced by this rule.
    pub occurrences: usize,
    /// Number of texts in which this rule replaced at least one match.
    pub texts_changed: usize,
}

impl RuleStats {
    pub fn new(rule_name: impl Into<String>) -> Self {
        Self {
            rule_name: rule_name.into(),
            ..Default::default()
        }
    }
}

/// Aggregated counters for a batch, one `RuleStats` per rule in chain order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ReplacementSummary {
    pub texts_processed: usize,
    /// Texts whose final output differs from the input.
    pub texts_changed: usize,
    pub rules: Vec<RuleStats>,
}

impl ReplacementSummary {
    /// An empty summary with a zeroed entry for every rule name.
    pub fn for_rules<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            texts_processed: 0,
            texts_changed: 0,
            rules: names.into_iter().map(RuleStats::new).collect(),
        }
    }

    /// Folds the per-rule stats of one processed text into the summary.
    pub fn record(&mut self, changed: bool, per_rule: &[RuleStats]) {
        self.texts_processed += 1;
        if changed {
            self.texts_changed += 1;
        }
        self.add_rule_stats(per_rule);
    }

    /// Adds `other` into `self`. Rules are matched by name; unknown names are
    /// appended in `other`'s order.
    pub fn merge(&mut self, other: &ReplacementSummary) {
        self.texts_processed += other.texts_processed;
        self.texts_changed += other.texts_changed;
        self.add_rule_stats(&other.rules);
    }

    fn add_rule_stats(&mut self, per_rule: &[RuleStats]) {
        for stats in per_rule {
            match self.rules.iter_mut().find(|r| r.rule_name == stats.rule_name) {
                Some(existing) => {
                    existing.occurrences += stats.occurrences;
                    existing.texts_changed += stats.texts_changed;
                }
                None => self.rules.push(stats.clone()),
            }
        }
    }

    /// Total replacements across all rules.
    pub fn total_occurrences(&self) -> usize {
        self.rules.iter().map(|r| r.occurrences).sum()
    }
}

/// Masks text for logging unless `REGEX_REPLACER_ALLOW_DEBUG_TEXT=true`.
pub fn truncate_for_log(s: &str) -> String {
    if *TEXT_DEBUG_ALLOWED {
        s.to_string()
    } else {
        format!("[TEXT: {} chars]", s.chars().count())
    }
}

pub fn log_rule_application_debug(rule_name: &str, occurrences: usize, before: &str, after: &str) {
    if !log_enabled!(Level::Debug) {
        return;
    }
    debug!(
        "Rule '{}' replaced {} match(es): '{}' -> '{}'",
        rule_name,
        occurrences,
        truncate_for_log(before),
        truncate_for_log(after)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_masks_by_default() {
        // The variable is unset in the test environment.
        assert_eq!(truncate_for_log("héllo"), "[TEXT: 5 chars]");
    }

    #[test]
    fn test_record_and_merge() {
        let mut a = ReplacementSummary::for_rules(["digits", "letters"]);
        a.record(
            true,
            &[
                RuleStats { rule_name: "digits".into(), occurrences: 2, texts_changed: 1 },
                RuleStats { rule_name: "letters".into(), occurrences: 0, texts_changed: 0 },
            ],
        );
        a.record(false, &[]);

        let mut b = ReplacementSummary::for_rules(["digits", "letters"]);
        b.record(true, &[RuleStats { rule_name: "letters".into(), occurrences: 3, texts_changed: 1 }]);

        a.merge(&b);
        assert_eq!(a.texts_processed, 3);
        assert_eq!(a.texts_changed, 2);
        assert_eq!(a.rules[0], RuleStats { rule_name: "digits".into(), occurrences: 2, texts_changed: 1 });
        assert_eq!(a.rules[1], RuleStats { rule_name: "letters".into(), occurrences: 3, texts_changed: 1 });
        assert_eq!(a.total_occurrences(), 5);
    }
}
