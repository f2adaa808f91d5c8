// regex-replacer-core/tests/replacer_tests.rs
//! Batch behavior of `RegexReplacer`: ordering, determinism across execution
//! modes, dedicated pools and aggregated statistics.

use anyhow::Result;
use test_log::test;

use regex_replacer_core::{ReplacerConfig, RegexReplacer, TextTransformer};

fn corpus(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("Doc {} has id {} and mail user{}@host{}.org  end", i, i * 7, i, i % 5))
        .collect()
}

fn normalizer(n_jobs: usize) -> Result<RegexReplacer> {
    RegexReplacer::from_pairs(
        [
            (r"[\w.]+@[\w.]+", "<email>"),
            (r"\d+", "<num>"),
            (r"\s+", " "),
            (r"(?i)doc", "document"),
        ],
        n_jobs,
    )
}

#[test]
fn test_parallel_and_sequential_agree() -> Result<()> {
    let replacer = normalizer(4)?;
    let texts = corpus(500);
    let sequential = replacer.transform(texts.clone(), true);
    let parallel = replacer.transform(texts, false);
    assert_eq!(sequential, parallel);
    assert_eq!(sequential[3], "document <num> has id <num> and mail <email> end");
    Ok(())
}

#[test]
fn test_output_order_matches_input() -> Result<()> {
    let replacer = RegexReplacer::from_pairs([("x", "y")], 3)?;
    let texts: Vec<String> = (0..1000).map(|i| format!("{}x", i)).collect();
    let out = replacer.transform(texts, false);
    for (i, s) in out.iter().enumerate() {
        assert_eq!(s, &format!("{}y", i));
    }
    Ok(())
}

#[test]
fn test_many_replacers_with_dedicated_pools() -> Result<()> {
    // Each replacer owns its pool; building several must not fail.
    let a = normalizer(2)?;
    let b = normalizer(3)?;
    assert_eq!(a.n_jobs(), 2);
    assert_eq!(b.n_jobs(), 3);
    assert_eq!(a.transform(corpus(10), false), b.transform(corpus(10), false));
    Ok(())
}

#[test]
fn test_shared_across_threads() -> Result<()> {
    let replacer = std::sync::Arc::new(normalizer(2)?);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let r = std::sync::Arc::clone(&replacer);
            std::thread::spawn(move || r.transform(corpus(50), false))
        })
        .collect();
    let expected = replacer.transform(corpus(50), true);
    for h in handles {
        assert_eq!(h.join().expect("worker panicked"), expected);
    }
    Ok(())
}

#[test]
fn test_transform_with_stats_aggregates() -> Result<()> {
    let replacer = RegexReplacer::from_pairs([(r"\d", "#"), ("q", "Q")], 2)?;
    let texts = vec!["a1".to_string(), "none".to_string(), "22q".to_string()];
    let (out, summary) = replacer.transform_with_stats(texts, false);

    assert_eq!(out, vec!["a#", "none", "##Q"]);
    assert_eq!(summary.texts_processed, 3);
    assert_eq!(summary.texts_changed, 2);
    assert_eq!(summary.rules[0].rule_name, "rule_0");
    assert_eq!(summary.rules[0].occurrences, 3);
    assert_eq!(summary.rules[0].texts_changed, 2);
    assert_eq!(summary.rules[1].occurrences, 1);
    assert_eq!(summary.total_occurrences(), 4);
    Ok(())
}

#[test]
fn test_disabled_rules_do_not_run() -> Result<()> {
    let mut config = ReplacerConfig::from_pairs([("a", "b"), ("b", "c")]);
    config.rules[1].enabled = Some(false);
    let replacer = RegexReplacer::new(config)?;
    assert_eq!(replacer.len(), 1);
    assert_eq!(replacer.transform_text("aaa"), "bbb");
    assert_eq!(replacer.get_rules().rules.len(), 2);
    Ok(())
}

#[test]
fn test_multiline_and_dotall_flags() -> Result<()> {
    let mut config = ReplacerConfig::from_pairs([("^#.*$", ""), ("<a>.*</a>", "[tag]")]);
    config.rules[0].multiline = true;
    config.rules[1].dot_matches_new_line = true;
    let replacer = RegexReplacer::new(config)?;
    assert_eq!(replacer.transform_text("# c1\nkeep\n# c2"), "\nkeep\n");
    assert_eq!(replacer.transform_text("<a>x\ny</a>"), "[tag]");
    Ok(())
}
