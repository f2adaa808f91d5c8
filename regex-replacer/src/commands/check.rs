//! `check` command: validates a rules file and prints the chain.

use anyhow::{anyhow, Result};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use std::io::{self, Write};

use regex_replacer_core::{compile_rules, ReplacementRule, ReplacerConfig};

use crate::cli::CheckCommand;

fn flags(rule: &ReplacementRule) -> String {
    let mut flags = Vec::new();
    if rule.case_insensitive {
        flags.push("i");
    }
    if rule.multiline {
        flags.push("m");
    }
    if rule.dot_matches_new_line {
        flags.push("s");
    }
    if rule.opt_in {
        flags.push("opt-in");
    }
    if !rule.is_enabled() {
        flags.push("disabled");
    }
    if flags.is_empty() {
        "-".to_string()
    } else {
        flags.join(",")
    }
}

/// Builds the table listing a chain in application order.
pub fn build_rules_table(config: &ReplacerConfig) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .force_no_tty();

    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Rule").add_attribute(Attribute::Bold),
        Cell::new("Pattern").add_attribute(Attribute::Bold),
        Cell::new("Replacement").add_attribute(Attribute::Bold),
        Cell::new("Flags").add_attribute(Attribute::Bold),
    ]);

    for (position, rule) in config.rules.iter().enumerate() {
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(&rule.name),
            Cell::new(&rule.pattern),
            Cell::new(format!("{:?}", rule.replace_with)),
            Cell::new(flags(rule)),
        ]);
    }
    table
}

pub fn run_check(cmd: CheckCommand) -> Result<()> {
    let path = match cmd.path {
        Some(path) => path,
        None => ReplacerConfig::default_config_path()
            .ok_or_else(|| anyhow!("No rules file given and no default rules file found."))?,
    };

    let config = ReplacerConfig::load_from_file(&path)?;
    // Size limits are only enforced at compile time.
    compile_rules(config.rules.clone())?;

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    writeln!(writer, "{}", build_rules_table(&config))?;
    writeln!(writer, "{}: {} rule(s) OK.", path.display(), config.rules.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_rendering() {
        let mut rule = ReplacementRule::from_pair("r", "a", "b");
        assert_eq!(flags(&rule), "-");
        rule.case_insensitive = true;
        rule.enabled = Some(false);
        assert_eq!(flags(&rule), "i,disabled");
    }

    #[test]
    fn test_rules_table_lists_every_rule() {
        let config = ReplacerConfig::from_pairs([("alpha", "1"), ("beta", "2")]);
        let rendered = build_rules_table(&config).to_string();
        assert!(rendered.contains("rule_0"));
        assert!(rendered.contains("beta"));
        assert!(rendered.contains("\"2\""));
    }
}
