//! This file defines the command-line interface (CLI) for the regex-replacer
//! application, including all available commands and their arguments.
//! License: MIT OR Apache-2.0

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "regex-replacer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Rewrite text with an ordered chain of regex rules",
    long_about = "regex-replacer applies an ordered list of regular-expression rules to text. Every rule replaces all of its matches in the output of the previous rule. Input is treated as one document per line (or as a single document with --whole) and documents are processed in parallel.",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', help = "Suppress all informational and debug messages.", global = true)]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG for this tool's crates)
    #[arg(long, short = 'd', help = "Enable debug logging.", global = true)]
    pub debug: bool,

    /// Explicitly disable debug logging, even if RUST_LOG is set to DEBUG
    #[arg(long = "disable-debug", help = "Disable debug logging, overriding RUST_LOG.", global = true)]
    pub disable_debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `regex-replacer` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrites an input file or stdin with the rule chain.
    #[command(about = "Rewrites an input file or stdin with the rule chain.")]
    Replace(ReplaceCommand),

    /// Counts what each rule would replace without writing rewritten text.
    #[command(about = "Counts what each rule would replace without writing rewritten text.")]
    Stats(StatsCommand),

    /// Validates a rules file and lists its rules in application order.
    #[command(about = "Validates a rules file and lists its rules in application order.")]
    Check(CheckCommand),
}

/// Rule selection shared by `replace` and `stats`.
#[derive(Args, Debug, Clone, Default)]
pub struct RuleArgs {
    /// Path to a YAML rules file.
    #[arg(long = "rules", value_name = "FILE", help = "Path to a YAML rules file.")]
    pub rules: Option<PathBuf>,

    /// Inline rule, appended after file rules in the order given.
    #[arg(
        long = "rule",
        short = 'r',
        value_name = "PATTERN=>REPLACEMENT",
        help = "Inline rule 'PATTERN=>REPLACEMENT' (repeatable, applied after file rules)."
    )]
    pub inline: Vec<String>,

    /// Explicitly enable these rule names (comma-separated).
    #[arg(long, short = 'e', value_delimiter = ',', help = "Enable these rule names, including opt-in rules (comma-separated).")]
    pub enable: Vec<String>,

    /// Explicitly disable these rule names (comma-separated).
    #[arg(long, short = 'x', value_delimiter = ',', help = "Disable these rule names (comma-separated).")]
    pub disable: Vec<String>,

    /// Worker threads for parallel processing.
    #[arg(long, short = 'j', value_name = "N", env = "REGEX_REPLACER_JOBS", help = "Worker threads (0 or 1 uses the shared pool sized to the CPU count).")]
    pub jobs: Option<usize>,

    /// Process documents on the main thread only.
    #[arg(long = "single-thread", help = "Process documents sequentially on the main thread.")]
    pub single_thread: bool,
}

/// Where documents come from and how input is split into them.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Path to an input file (reads from stdin if not provided).
    #[arg(long, short = 'i', value_name = "FILE", help = "Read input from a specified file instead of stdin.")]
    pub input_file: Option<PathBuf>,

    /// Treat the whole input as one document.
    #[arg(long = "whole", help = "Treat the whole input as a single document instead of one per line. Line mode writes LF line endings; --whole keeps the input's line endings.")]
    pub whole: bool,
}

/// Arguments for the `replace` command.
#[derive(Parser, Debug)]
pub struct ReplaceCommand {
    #[command(flatten)]
    pub rule_args: RuleArgs,

    #[command(flatten)]
    pub input: InputArgs,

    /// Write rewritten output to this file instead of stdout.
    #[arg(long, short = 'o', value_name = "FILE", help = "Write output to a specified file instead of stdout.")]
    pub output: Option<PathBuf>,

    /// Process input line by line as it arrives.
    #[arg(long = "line-buffered", conflicts_with = "whole", help = "Process input line by line as it arrives (useful for pipes).")]
    pub line_buffered: bool,

    /// Print a per-rule summary to stderr.
    #[arg(long = "summary", help = "Print a per-rule replacement summary to stderr.")]
    pub summary: bool,
}

/// Arguments for the `stats` command.
#[derive(Parser, Debug)]
pub struct StatsCommand {
    #[command(flatten)]
    pub rule_args: RuleArgs,

    #[command(flatten)]
    pub input: InputArgs,

    /// Print the summary as JSON to stdout.
    #[arg(long = "json", help = "Print the summary as JSON to stdout.")]
    pub json: bool,
}

/// Arguments for the `check` command.
#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// The rules file to validate (defaults to the user's rules file).
    #[arg(value_name = "FILE", help = "The YAML rules file to validate.")]
    pub path: Option<PathBuf>,
}
