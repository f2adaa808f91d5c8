//! `replace` command: rewrites documents with the rule chain.

use anyhow::{Context, Result};
use is_terminal::IsTerminal;
use log::{debug, info};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;

use regex_replacer_core::{RegexReplacer, ReplacementSummary, TextTransformer};

use crate::cli::ReplaceCommand;
use crate::ui::{output_format, summary};
use crate::utils::input::{open_reader, read_input, split_documents};
use crate::utils::rules::build_config;

/// Helper for printing info messages to stderr.
pub fn info_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_info_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Helper for printing warning messages to stderr.
pub fn warn_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_warn_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

/// Helper for printing error messages to stderr.
pub fn error_msg(msg: impl AsRef<str>) {
    let stderr_supports_color = io::stderr().is_terminal();
    let _ = output_format::print_error_message(&mut io::stderr(), msg.as_ref(), stderr_supports_color);
}

fn open_output(path: Option<&PathBuf>, quiet: bool) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            if !quiet {
                info_msg(format!("Writing rewritten content to file: {}", path.display()));
            }
            let file = File::create(path).with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

pub fn run_replace(cmd: ReplaceCommand, quiet: bool) -> Result<()> {
    info!("Starting replace operation.");
    let config = build_config(&cmd.rule_args)?;
    let replacer = RegexReplacer::new(config)?;
    if replacer.is_empty() && !quiet {
        warn_msg("No active rules; input will be copied unchanged.");
    }
    let mut writer = open_output(cmd.output.as_ref(), quiet)?;

    let totals = if cmd.line_buffered {
        run_line_buffered(&cmd, &replacer, &mut writer)?
    } else {
        run_batch(&cmd, &replacer, &mut writer)?
    };
    writer.flush().context("Failed to flush output")?;

    if cmd.summary && !quiet {
        let stderr_supports_color = io::stderr().is_terminal();
        summary::print_summary(&totals, &mut io::stderr(), stderr_supports_color)?;
    }

    info!("Replace operation completed.");
    Ok(())
}

fn run_batch(cmd: &ReplaceCommand, replacer: &RegexReplacer, writer: &mut dyn Write) -> Result<ReplacementSummary> {
    let content = read_input(&cmd.input)?;
    let documents = split_documents(content, cmd.input.whole);
    debug!("Processing {} document(s).", documents.len());

    let single_thread = cmd.rule_args.single_thread;
    let (outputs, summary) = if cmd.summary {
        replacer.transform_with_stats(documents, single_thread)
    } else {
        (replacer.transform(documents, single_thread), ReplacementSummary::default())
    };

    if cmd.input.whole {
        for doc in &outputs {
            write!(writer, "{}", doc)?;
        }
    } else {
        for doc in &outputs {
            writeln!(writer, "{}", doc)?;
        }
    }
    Ok(summary)
}

/// Streams line by line through the `TextTransformer` interface, flushing after
/// every line so downstream readers see output immediately.
fn run_line_buffered(
    cmd: &ReplaceCommand,
    transformer: &dyn TextTransformer,
    writer: &mut dyn Write,
) -> Result<ReplacementSummary> {
    let reader = open_reader(&cmd.input)?;
    let mut summary = ReplacementSummary::for_rules(transformer.compiled_rules().rules.iter().map(|r| r.name.as_str()));

    for line in reader.lines() {
        let line = line.context("Failed to read input line")?;
        let output = if cmd.summary {
            let (output, stats) = transformer.transform_text_with_stats(&line);
            summary.record(output != line, &stats);
            output
        } else {
            transformer.transform_text(&line)
        };
        writeln!(writer, "{}", output)?;
        writer.flush()?;
    }
    Ok(summary)
}
