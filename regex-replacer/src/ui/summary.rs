// regex-replacer/src/ui/summary.rs
//! Renders a `ReplacementSummary` as a table.

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use std::io::{self, Write};

use regex_replacer_core::ReplacementSummary;

/// Builds the per-rule table. Colors are only applied when `supports_color` is set.
pub fn build_summary_table(summary: &ReplacementSummary, supports_color: bool) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    if !supports_color {
        table.force_no_tty();
    }

    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Rule").add_attribute(Attribute::Bold),
        Cell::new("Replacements").add_attribute(Attribute::Bold),
        Cell::new("Texts changed").add_attribute(Attribute::Bold),
    ]);

    for (position, rule) in summary.rules.iter().enumerate() {
        let count_cell = if rule.occurrences > 0 {
            Cell::new(rule.occurrences).fg(Color::Green)
        } else {
            Cell::new(rule.occurrences)
        };
        table.add_row(vec![
            Cell::new(position + 1),
            Cell::new(&rule.rule_name),
            count_cell,
            Cell::new(rule.texts_changed),
        ]);
    }

    table
}

/// Writes the table followed by a totals line.
pub fn print_summary<W: Write>(summary: &ReplacementSummary, writer: &mut W, supports_color: bool) -> io::Result<()> {
    if summary.rules.is_empty() {
        writeln!(writer, "No rules were applied.")?;
        return Ok(());
    }
    writeln!(writer, "{}", build_summary_table(summary, supports_color))?;
    writeln!(
        writer,
        "{} replacement(s) across {} of {} text(s).",
        summary.total_occurrences(),
        summary.texts_changed,
        summary.texts_processed
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex_replacer_core::RuleStats;

    #[test]
    fn test_print_summary_lists_rules_in_order() {
        let summary = ReplacementSummary {
            texts_processed: 4,
            texts_changed: 2,
            rules: vec![
                RuleStats { rule_name: "urls".into(), occurrences: 3, texts_changed: 2 },
                RuleStats { rule_name: "digits".into(), occurrences: 0, texts_changed: 0 },
            ],
        };
        let mut buf = Vec::new();
        print_summary(&summary, &mut buf, false).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let urls = out.find("urls").unwrap();
        let digits = out.find("digits").unwrap();
        assert!(urls < digits);
        assert!(out.contains("3 replacement(s) across 2 of 4 text(s)."));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn test_print_summary_without_rules() {
        let mut buf = Vec::new();
        print_summary(&ReplacementSummary::default(), &mut buf, false).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "No rules were applied.\n");
    }
}
