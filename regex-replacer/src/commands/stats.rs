//! `stats` command: reports per-rule replacement counts without emitting text.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::info;
use serde::Serialize;
use std::io::{self, Write};

use regex_replacer_core::{RegexReplacer, ReplacementSummary};

use crate::cli::StatsCommand;
use crate::ui::summary;
use crate::utils::input::{read_input, source_name, split_documents};
use crate::utils::rules::build_config;

/// JSON document printed by `stats --json`.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub source: String,
    pub n_jobs: usize,
    #[serde(flatten)]
    pub summary: ReplacementSummary,
}

pub fn run_stats(cmd: StatsCommand) -> Result<()> {
    info!("Starting stats operation.");
    let config = build_config(&cmd.rule_args)?;
    let replacer = RegexReplacer::new(config)?;

    let documents = split_documents(read_input(&cmd.input)?, cmd.input.whole);
    let (_, totals) = replacer.transform_with_stats(documents, cmd.rule_args.single_thread);

    let stdout = io::stdout();
    let mut writer = stdout.lock();
    if cmd.json {
        let report = StatsReport {
            source: source_name(&cmd.input),
            n_jobs: replacer.n_jobs(),
            summary: totals,
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize stats report")?;
        writeln!(writer, "{}", json)?;
    } else {
        summary::print_summary(&totals, &mut writer, stdout.is_terminal())?;
    }
    Ok(())
}
